//! Toyshop Admin library.
//!
//! The admin console: product management, stock dashboards, and the
//! shared-credential login that limits how many devices may be signed in at
//! once.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use config::{AdminConfig, AdminCredentials};
pub use error::AppError;
pub use models::ProductDraft;
