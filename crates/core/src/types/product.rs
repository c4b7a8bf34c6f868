//! Product and size variant types.

use serde::{Deserialize, Serialize};

use super::{Category, Gender, Price, ProductId};

/// Default product code for products without a catalog code.
pub const DEFAULT_PRODUCT_CODE: &str = "N/A";

/// Name of the single size variant created for one-size products.
pub const DEFAULT_SIZE_NAME: &str = "Default";

/// A named stock-keeping unit within a product (e.g. "S", "M", "Default").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    /// Size name, unique within its product.
    pub name: String,
    /// Units available for this size.
    pub count: u32,
}

impl SizeVariant {
    /// Create a new size variant.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A catalog product.
///
/// Persisted as part of the whole `products` list with camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub code: String,
    pub sizes: Vec<SizeVariant>,
    pub age_range: String,
    pub description: String,
    /// Encoded image data (data URLs), in display order.
    pub images: Vec<String>,
    pub category: Category,
    pub gender: Gender,
}

impl Product {
    /// Look up a size variant by name.
    #[must_use]
    pub fn size(&self, name: &str) -> Option<&SizeVariant> {
        self.sizes.iter().find(|size| size.name == name)
    }

    /// Units available for the named size, if the size exists.
    #[must_use]
    pub fn stock_for(&self, size: &str) -> Option<u32> {
        self.size(size).map(|s| s.count)
    }

    /// Total units across all sizes.
    #[must_use]
    pub fn total_inventory(&self) -> u64 {
        self.sizes.iter().map(|size| u64::from(size.count)).sum()
    }

    /// Whether every size is at zero. A product without sizes counts as
    /// out of stock.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.sizes.iter().all(|size| size.count == 0)
    }

    /// Whether size names are unique within this product.
    #[must_use]
    pub fn has_unique_size_names(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.sizes.iter().all(|size| seen.insert(size.name.as_str()))
    }

    /// The first image, used as the catalog thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
