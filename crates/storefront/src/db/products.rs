//! Read-only product catalog repository.

use toyshop_core::storage::keys;
use toyshop_core::{JsonStore, KeyValueStore, Product, ProductId};

use super::RepositoryError;

/// Read access to the product list maintained by the admin console.
#[derive(Debug)]
pub struct ProductRepository<S> {
    store: JsonStore<S>,
}

impl<S: KeyValueStore> ProductRepository<S> {
    /// Create a new product repository.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store: JsonStore::new(store),
        }
    }

    /// All products in stored order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Decode` if the stored list is corrupt.
    pub fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        self.store.load_or_default(keys::PRODUCTS)
    }

    /// A single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Decode` if the stored list is corrupt.
    pub fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.list()?.into_iter().find(|product| product.id == *id))
    }
}
