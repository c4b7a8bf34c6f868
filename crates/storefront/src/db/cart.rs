//! Cart repository.

use toyshop_core::storage::keys;
use toyshop_core::{CartItem, JsonStore, KeyValueStore};

use super::RepositoryError;

/// Repository for the persisted cart list.
#[derive(Debug)]
pub struct CartRepository<S> {
    store: JsonStore<S>,
}

impl<S: KeyValueStore> CartRepository<S> {
    /// Create a new cart repository.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store: JsonStore::new(store),
        }
    }

    /// Load the persisted cart. An absent cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Decode` if the stored cart is corrupt.
    pub fn load(&self) -> Result<Vec<CartItem>, RepositoryError> {
        self.store.load_or_default(keys::CART)
    }

    /// Replace the persisted cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cart cannot be encoded or written.
    pub fn save(&self, items: &[CartItem]) -> Result<(), RepositoryError> {
        self.store.save(keys::CART, items)
    }

    /// Remove the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the removal fails.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        self.store.delete(keys::CART)
    }
}
