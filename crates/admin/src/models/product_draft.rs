//! Product form state.
//!
//! A [`ProductDraft`] is everything the admin product form edits before an ID
//! exists. The default value is the empty form.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use toyshop_core::{
    Category, DEFAULT_PRODUCT_CODE, DEFAULT_SIZE_NAME, Gender, Price, Product, ProductId,
    SizeVariant,
};

/// Age range preselected on a new product.
pub const DEFAULT_AGE_RANGE: &str = "0-3 years";

/// Editable product fields.
///
/// Deserializing fills missing fields from the empty form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub code: String,
    pub sizes: Vec<SizeVariant>,
    pub age_range: String,
    pub description: String,
    pub images: Vec<String>,
    pub category: Category,
    pub gender: Gender,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: Price::ZERO,
            code: DEFAULT_PRODUCT_CODE.to_string(),
            sizes: vec![SizeVariant::new(DEFAULT_SIZE_NAME, 0)],
            age_range: DEFAULT_AGE_RANGE.to_string(),
            description: String::new(),
            images: Vec::new(),
            category: Category::default(),
            gender: Gender::default(),
        }
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            price: product.price,
            code: product.code,
            sizes: product.sizes,
            age_range: product.age_range,
            description: product.description,
            images: product.images,
            category: product.category,
            gender: product.gender,
        }
    }
}

impl ProductDraft {
    /// Attach an image. Returns `false` if the same image is already attached.
    pub fn add_image(&mut self, data_url: impl Into<String>) -> bool {
        let data_url = data_url.into();
        if self.images.contains(&data_url) {
            return false;
        }
        self.images.push(data_url);
        true
    }

    /// Detach the image at `index`.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Append a size row.
    pub fn add_size(&mut self, name: impl Into<String>, count: u32) {
        self.sizes.push(SizeVariant::new(name, count));
    }

    /// Remove the size row at `index`.
    pub fn remove_size(&mut self, index: usize) -> Option<SizeVariant> {
        (index < self.sizes.len()).then(|| self.sizes.remove(index))
    }

    /// Check every field, collecting all problems rather than stopping at the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` listing each invalid field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.push(DraftField::Name, "Product name is required");
        }
        if self.description.trim().is_empty() {
            errors.push(DraftField::Description, "Description is required");
        }
        if self.images.is_empty() {
            errors.push(DraftField::Images, "At least one image is required");
        }
        if self.age_range.trim().is_empty() {
            errors.push(DraftField::AgeRange, "Age range is required");
        }
        if self.price.is_negative() {
            errors.push(DraftField::Price, "Price cannot be negative");
        }

        if self.sizes.is_empty() {
            errors.push(DraftField::Sizes, "At least one size is required");
        } else if self.sizes.iter().any(|s| s.name.trim().is_empty()) {
            errors.push(DraftField::Sizes, "Size name is required");
        } else {
            let mut seen = HashSet::new();
            if !self.sizes.iter().all(|s| seen.insert(s.name.trim())) {
                errors.push(DraftField::Sizes, "Size names must be unique");
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Turn the draft into a stored product with the given ID.
    ///
    /// Text fields are trimmed and an empty code becomes `N/A`.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        let code = self.code.trim();
        Product {
            id,
            name: self.name.trim().to_string(),
            price: self.price,
            code: if code.is_empty() {
                DEFAULT_PRODUCT_CODE.to_string()
            } else {
                code.to_string()
            },
            sizes: self
                .sizes
                .into_iter()
                .map(|s| SizeVariant::new(s.name.trim(), s.count))
                .collect(),
            age_range: self.age_range.trim().to_string(),
            description: self.description.trim().to_string(),
            images: self.images,
            category: self.category,
            gender: self.gender,
        }
    }
}

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Description,
    Images,
    AgeRange,
    Price,
    Sizes,
}

impl DraftField {
    /// The field's form key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Images => "images",
            Self::AgeRange => "ageRange",
            Self::Price => "price",
            Self::Sizes => "sizes",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: DraftField,
    pub message: &'static str,
}

/// All problems found in a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: DraftField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Whether no problems were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every recorded problem, in form order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The message for `field`, if it is invalid.
    #[must_use]
    pub fn message_for(&self, field: DraftField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
