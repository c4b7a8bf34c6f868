//! Storefront access to local key/value storage.
//!
//! # Keys
//!
//! The storefront reads the product catalog written by the admin console and
//! owns the cart:
//!
//! - `products` - read only from this crate
//! - `cart` - cart line items, rewritten whole after every change
//!
//! All values are JSON documents; see [`toyshop_core::storage`].

pub mod cart;
pub mod products;

pub use cart::CartRepository;
pub use products::ProductRepository;
pub use toyshop_core::StorageError as RepositoryError;
