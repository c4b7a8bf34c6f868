//! Cart line item type.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A cart line.
///
/// Holds a copy of the product taken when the line was added, so the stock
/// counts inside it are a snapshot rather than live inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    pub selected_size: String,
}

impl CartItem {
    /// Create a new cart line from a product snapshot.
    #[must_use]
    pub fn new(product: Product, quantity: u32, selected_size: impl Into<String>) -> Self {
        Self {
            product,
            quantity,
            selected_size: selected_size.into(),
        }
    }

    /// Whether this line is for the given product and size.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: &str) -> bool {
        self.product.id == *product_id && self.selected_size == size
    }

    /// Stock count of the selected size in the snapshot.
    #[must_use]
    pub fn snapshot_stock(&self) -> Option<u32> {
        self.product.stock_for(&self.selected_size)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
