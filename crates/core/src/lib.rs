//! Toyshop Core - Shared types and storage library.
//!
//! This crate provides common types used across all Toyshop components:
//! - `storefront` - Customer catalog, cart, and checkout
//! - `admin` - Product management and device-limited admin login
//! - `cli` - Command-line front end over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains types, traits, and the in-memory storage backend
//! only - no file or network I/O. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, cart lines, login devices, IDs, and prices
//! - [`storage`] - Key/value store trait, typed JSON access, in-memory tabs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod storage;
pub mod types;

pub use storage::{JsonStore, KeyValueStore, LocalStorage, StorageError, StorageTab};
pub use types::*;
