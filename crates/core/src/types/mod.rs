//! Core types for Toyshop.
//!
//! This module provides type-safe wrappers and records for the catalog,
//! cart, and admin login domain.

pub mod cart;
pub mod classification;
pub mod device;
pub mod id;
pub mod price;
pub mod product;

pub use cart::CartItem;
pub use classification::{Category, Gender, ParseClassificationError};
pub use device::{AuthDevice, AuthState, MAX_AUTH_DEVICES};
pub use id::*;
pub use price::{DEFAULT_CURRENCY_SYMBOL, Price};
pub use product::{DEFAULT_PRODUCT_CODE, DEFAULT_SIZE_NAME, Product, SizeVariant};
