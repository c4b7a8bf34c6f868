//! Product administration.
//!
//! Validates form drafts before they reach the repository.

use thiserror::Error;
use tracing::{info, instrument, warn};

use toyshop_core::{KeyValueStore, Product, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{ProductDraft, ValidationErrors};

/// Errors that can occur when changing the catalog.
#[derive(Debug, Error)]
pub enum ProductError {
    /// The draft failed form validation.
    #[error("invalid product: {0}")]
    Validation(#[from] ValidationErrors),

    /// No product with this ID.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Product CRUD with validation.
#[derive(Debug)]
pub struct ProductService<S> {
    products: ProductRepository<S>,
}

impl<S: KeyValueStore> ProductService<S> {
    /// Create a new product service.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            products: ProductRepository::new(store),
        }
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Storage` if the list cannot be read.
    pub fn list(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.products.list()?)
    }

    /// A product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` for an unknown ID.
    pub fn get(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.products
            .get(id)?
            .ok_or_else(|| ProductError::NotFound(id.clone()))
    }

    /// Validate and add a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation` if the draft is invalid, or
    /// `ProductError::Storage`.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        if let Err(errors) = draft.validate() {
            warn!(%errors, "product rejected");
            return Err(errors.into());
        }
        let product = self.products.add(draft)?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Validate and add several products in one write. Nothing is written
    /// unless every draft is valid.
    ///
    /// # Errors
    ///
    /// Returns the first draft's `ProductError::Validation`, or
    /// `ProductError::Storage`.
    #[instrument(skip_all, fields(count = drafts.len()))]
    pub fn create_many(&self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>, ProductError> {
        for draft in &drafts {
            if let Err(errors) = draft.validate() {
                warn!(name = %draft.name, %errors, "product batch rejected");
                return Err(errors.into());
            }
        }
        let products = self.products.add_many(drafts)?;
        info!(count = products.len(), "products created");
        Ok(products)
    }

    /// Validate a draft and store it over the product with `id`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Validation`, `ProductError::NotFound` if no
    /// product has `id`, or `ProductError::Storage`.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Product, ProductError> {
        if let Err(errors) = draft.validate() {
            warn!(%errors, "product update rejected");
            return Err(errors.into());
        }
        let product = draft.into_product(id.clone());
        if !self.products.update(product.clone())? {
            warn!("product update rejected: unknown id");
            return Err(ProductError::NotFound(id.clone()));
        }
        info!("product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product has `id`, or
    /// `ProductError::Storage`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        if !self.products.delete(id)? {
            warn!("product delete rejected: unknown id");
            return Err(ProductError::NotFound(id.clone()));
        }
        info!("product deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use toyshop_core::{LocalStorage, SizeVariant, StorageTab};

    use super::*;

    fn service() -> ProductService<StorageTab> {
        ProductService::new(LocalStorage::new().open_tab())
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "Soft and cuddly".to_string(),
            images: vec!["data:image/png;base64,AAAA".to_string()],
            sizes: vec![SizeVariant::new("S", 3), SizeVariant::new("M", 0)],
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let service = service();
        let a = service.create(draft("Bear")).unwrap();
        let b = service.create(draft("Bear")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_services_on_one_store_keep_every_product() {
        let tab = LocalStorage::new().open_tab();
        let workers: Vec<_> = (0..2)
            .map(|_| {
                let service = ProductService::new(tab.clone());
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        service.create(draft("Bear")).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(ProductService::new(tab).list().unwrap().len(), 200);
    }

    #[test]
    fn test_invalid_draft_is_not_stored() {
        let service = service();
        let err = service.create(ProductDraft::default()).unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_many_is_all_or_nothing() {
        let service = service();
        let err = service
            .create_many(vec![draft("Bear"), ProductDraft::default()])
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
        assert!(service.list().unwrap().is_empty());

        let created = service
            .create_many(vec![draft("Bear"), draft("Duck")])
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(service.list().unwrap(), created);
    }

    #[test]
    fn test_update_replaces_fields_and_keeps_id() {
        let service = service();
        let product = service.create(draft("Bear")).unwrap();

        let mut edit = ProductDraft::from(product.clone());
        edit.name = "Big Bear".to_string();
        let updated = service.update(&product.id, edit).unwrap();

        assert_eq!(updated.id, product.id);
        assert_eq!(service.get(&product.id).unwrap().name, "Big Bear");
    }

    #[test]
    fn test_update_unknown_id() {
        let service = service();
        let err = service
            .update(&ProductId::new("missing"), draft("Bear"))
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(_)));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let service = service();
        let product = service.create(draft("Bear")).unwrap();

        service.delete(&product.id).unwrap();
        assert!(matches!(
            service.delete(&product.id),
            Err(ProductError::NotFound(_))
        ));
        assert!(matches!(
            service.get(&product.id),
            Err(ProductError::NotFound(_))
        ));
    }
}
