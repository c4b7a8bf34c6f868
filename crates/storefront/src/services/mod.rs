//! Storefront business logic.
//!
//! - [`cart`] - Cart lines checked against per-size stock snapshots
//! - [`catalog`] - Product search, facet filters, and category grouping
//! - [`checkout`] - WhatsApp order message and deep link

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use cart::{CartError, CartService};
pub use catalog::{Catalog, CatalogFilter, CatalogView, CategoryGroup, Facets};
pub use checkout::{CheckoutError, CheckoutLink};
