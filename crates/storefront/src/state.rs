//! Per-tab storefront state.

use toyshop_core::storage::StorageEvent;
use toyshop_core::{KeyValueStore, ProductId};

use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::services::cart::CartService;
use crate::services::catalog::Catalog;
use crate::services::checkout::{self, CheckoutLink};

/// Everything one storefront tab holds in memory: the catalog it browses
/// and its cart, both loaded from the same store.
#[derive(Debug)]
pub struct Storefront<S> {
    config: StorefrontConfig,
    catalog: Catalog<S>,
    cart: CartService<S>,
}

impl<S: KeyValueStore + Clone> Storefront<S> {
    /// Load catalog and cart from `store`.
    #[must_use]
    pub fn load(config: StorefrontConfig, store: S) -> Self {
        Self {
            config,
            catalog: Catalog::load(store.clone()),
            cart: CartService::load(store),
        }
    }

    /// Storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// The product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartService<S> {
        &self.cart
    }

    /// Mutable access to the cart.
    pub fn cart_mut(&mut self) -> &mut CartService<S> {
        &mut self.cart
    }

    /// Add a catalog product to the cart, using the catalog's current copy
    /// as the stock snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product, or the cart's
    /// rejection.
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: u32, size: &str) -> Result<()> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product {product_id}")))?;
        self.cart.add_to_cart(product, quantity, size)?;
        Ok(())
    }

    /// Build the WhatsApp checkout link for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` if the cart is empty.
    pub fn checkout(&self) -> Result<CheckoutLink> {
        Ok(checkout::checkout(self.cart.items(), &self.config.checkout)?)
    }

    /// Apply a change made by another tab. Returns whether anything was
    /// reloaded.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) -> bool {
        let catalog = self.catalog.handle_storage_event(event);
        let cart = self.cart.handle_storage_event(event);
        catalog || cart
    }

    /// Apply every event in `events`. Returns how many caused a reload.
    pub fn sync<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = StorageEvent>,
    {
        events
            .into_iter()
            .filter(|event| self.handle_storage_event(event))
            .count()
    }
}
