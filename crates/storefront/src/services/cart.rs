//! Cart reconciliation service.
//!
//! Keeps cart lines consistent with the stock snapshot each line carries.
//! Every mutation is checked against that snapshot, never against live
//! inventory, and rejected mutations leave both memory and storage
//! untouched. The full list is persisted after each accepted change.
//!
//! Nothing here is transactional against stock: two carts (or two tabs)
//! validating against stale snapshots can both succeed and jointly oversell.

use thiserror::Error;
use tracing::instrument;

use toyshop_core::storage::{StorageEvent, keys};
use toyshop_core::{CartItem, KeyValueStore, Price, Product};

use crate::db::{CartRepository, RepositoryError};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product has no size with this name.
    #[error("size '{size}' is not available for this product")]
    SizeNotFound {
        /// The requested size.
        size: String,
    },

    /// More units requested than the snapshot has in stock.
    #[error("not enough inventory: requested {requested}, available {available}")]
    InsufficientStock {
        /// Quantity the line would hold after the change.
        requested: u32,
        /// Stock count in the snapshot.
        available: u32,
    },

    /// No cart line at this position.
    #[error("no cart item at index {index} (cart has {len})")]
    IndexOutOfBounds {
        /// The requested position.
        index: usize,
        /// Number of lines in the cart.
        len: usize,
    },

    /// Persisting the cart failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Check `quantity` against the snapshot's count for `size`.
fn check_stock(product: &Product, size: &str, quantity: u32) -> Result<(), CartError> {
    let available = product
        .stock_for(size)
        .ok_or_else(|| CartError::SizeNotFound {
            size: size.to_owned(),
        })?;
    if available < quantity {
        return Err(CartError::InsufficientStock {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

/// The cart of one tab.
///
/// Holds the in-memory line list and writes it through to storage.
#[derive(Debug)]
pub struct CartService<S> {
    repo: CartRepository<S>,
    items: Vec<CartItem>,
}

impl<S: KeyValueStore> CartService<S> {
    /// Load the cart from storage.
    ///
    /// A corrupt or unreadable cart is logged and replaced by an empty one.
    #[must_use]
    pub fn load(store: S) -> Self {
        let mut cart = Self {
            repo: CartRepository::new(store),
            items: Vec::new(),
        };
        cart.reload();
        cart
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of cart lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of quantity times unit price across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add `quantity` units of `selected_size` from a product snapshot.
    ///
    /// If a line for the same product and size exists, the quantities are
    /// summed and the total is checked against this same snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity`, `CartError::SizeNotFound`, or
    /// `CartError::InsufficientStock` without changing the cart, or
    /// `CartError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: u32,
        selected_size: &str,
    ) -> Result<(), CartError> {
        let result = self.try_add(product, quantity, selected_size);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "add to cart rejected");
        }
        result
    }

    fn try_add(
        &mut self,
        product: &Product,
        quantity: u32,
        selected_size: &str,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        check_stock(product, selected_size, quantity)?;

        let mut updated = self.items.clone();
        let existing = updated
            .iter_mut()
            .find(|item| item.matches(&product.id, selected_size));

        match existing {
            Some(item) => {
                let combined = item.quantity.saturating_add(quantity);
                check_stock(product, selected_size, combined)?;
                item.quantity = combined;
            }
            None => updated.push(CartItem::new(product.clone(), quantity, selected_size)),
        }

        self.commit(updated)
    }

    /// Set the quantity of the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::IndexOutOfBounds`, `CartError::InvalidQuantity`,
    /// `CartError::SizeNotFound`, or `CartError::InsufficientStock` without
    /// changing the cart, or `CartError::Storage` if persisting fails.
    #[instrument(skip(self))]
    pub fn update_item(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        let result = self.try_update(index, quantity);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "cart update rejected");
        }
        result
    }

    fn try_update(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        let len = self.items.len();
        let item = self
            .items
            .get(index)
            .ok_or(CartError::IndexOutOfBounds { index, len })?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        check_stock(&item.product, &item.selected_size, quantity)?;

        let mut updated = self.items.clone();
        if let Some(line) = updated.get_mut(index) {
            line.quantity = quantity;
        }
        self.commit(updated)
    }

    /// Remove the line at `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::IndexOutOfBounds` without changing the cart, or
    /// `CartError::Storage` if persisting fails.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, index: usize) -> Result<CartItem, CartError> {
        let len = self.items.len();
        if index >= len {
            let err = CartError::IndexOutOfBounds { index, len };
            tracing::warn!(error = %err, "cart removal rejected");
            return Err(err);
        }

        let mut updated = self.items.clone();
        let removed = updated.remove(index);
        self.commit(updated)?;
        Ok(removed)
    }

    /// Empty the cart and remove it from storage.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the persisted cart cannot be removed.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.repo.clear()?;
        self.items.clear();
        tracing::info!("cart cleared");
        Ok(())
    }

    /// Replace in-memory state with the persisted cart.
    ///
    /// Last writer wins: whatever another tab stored overwrites this tab's
    /// lines. Unreadable state resets the cart to empty.
    pub fn reload(&mut self) {
        self.items = match self.repo.load() {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "failed to load cart, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(lines = self.items.len(), "cart loaded");
    }

    /// React to a change made by another tab. Returns whether the cart was
    /// reloaded.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) -> bool {
        if event.affects(keys::CART) {
            self.reload();
            true
        } else {
            false
        }
    }

    fn commit(&mut self, updated: Vec<CartItem>) -> Result<(), CartError> {
        self.repo.save(&updated)?;
        self.items = updated;
        Ok(())
    }
}
