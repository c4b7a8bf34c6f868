//! Toyshop Storefront library.
//!
//! Customer-facing logic: browsing the catalog, keeping a cart consistent
//! with stock snapshots, and checking out through WhatsApp. Each
//! [`state::Storefront`] models one browser tab over a shared key/value
//! store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub use config::StorefrontConfig;
pub use error::AppError;
pub use state::Storefront;
