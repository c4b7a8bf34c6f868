//! Product catalog repository.
//!
//! The catalog is one JSON list. Every write loads the whole list, changes
//! it, and stores it back; there are no partial updates.

use toyshop_core::storage::keys;
use toyshop_core::{JsonStore, KeyValueStore, Product, ProductId};

use super::RepositoryError;
use crate::models::ProductDraft;

/// Repository for product CRUD.
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
        Ok(self.list()?.into_iter().find(|p| p.id == *id))
    }

    /// Append a new product with a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn add(&self, draft: ProductDraft) -> Result<Product, RepositoryError> {
        let mut added = self.add_many(vec![draft])?;
        Ok(added.remove(0))
    }

    /// Append several products in one write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn add_many(&self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>, RepositoryError> {
        let created: Vec<Product> = drafts
            .into_iter()
            .map(|draft| draft.into_product(ProductId::generate()))
            .collect();

        self.store
            .apply(keys::PRODUCTS, |products: &mut Vec<Product>| {
                products.extend(created.iter().cloned());
                Ok(())
            })?;

        Ok(created)
    }

    /// Replace the stored product with the same ID. Returns `false` (and
    /// writes nothing new) if no such product exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn update(&self, product: Product) -> Result<bool, RepositoryError> {
        self.store
            .apply(keys::PRODUCTS, |products: &mut Vec<Product>| {
                Ok(products
                    .iter_mut()
                    .find(|p| p.id == product.id)
                    .map(|slot| *slot = product)
                    .is_some())
            })
    }

    /// Delete a product. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        self.store
            .apply(keys::PRODUCTS, |products: &mut Vec<Product>| {
                let before = products.len();
                products.retain(|p| p.id != *id);
                Ok(products.len() != before)
            })
    }
}
