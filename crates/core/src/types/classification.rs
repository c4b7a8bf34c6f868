//! Catalog classification enums.
//!
//! Stored in lowercase (`"toys"`, `"unisex"`) to match the persisted product
//! format.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a classification value from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseClassificationError {
    /// Which classification was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Toys,
    Clothes,
    Supplies,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 3] = [Self::Toys, Self::Clothes, Self::Supplies];

    /// The persisted lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Toys => "toys",
            Self::Clothes => "clothes",
            Self::Supplies => "supplies",
        }
    }

    /// Capitalized label for headings and filter options.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Toys => "Toys",
            Self::Clothes => "Clothes",
            Self::Supplies => "Supplies",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toys" => Ok(Self::Toys),
            "clothes" => Ok(Self::Clothes),
            "supplies" => Ok(Self::Supplies),
            _ => Err(ParseClassificationError {
                kind: "category",
                value: s.to_owned(),
            }),
        }
    }
}

/// Target gender of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unisex,
}

impl Gender {
    /// All genders, in display order.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unisex];

    /// The persisted lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unisex => "unisex",
        }
    }

    /// Capitalized label for filter options.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unisex => "Unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unisex" => Ok(Self::Unisex),
            _ => Err(ParseClassificationError {
                kind: "gender",
                value: s.to_owned(),
            }),
        }
    }
}
