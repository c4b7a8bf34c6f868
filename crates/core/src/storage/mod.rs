//! Key/value persistence abstraction.
//!
//! All state (products, cart, admin login) lives in a flat string key/value
//! store holding JSON documents. The [`KeyValueStore`] trait is the only
//! seam: production code runs against a file or browser-like backend, tests
//! against [`LocalStorage`].
//!
//! # Keys
//!
//! | Key | Shape |
//! |---|---|
//! | `isAuthenticated` | `"true"` or absent |
//! | `deviceId` | opaque string, generated once |
//! | `authDevices` | list of `{deviceId, lastLogin}` |
//! | `products` | list of products |
//! | `cart` | list of cart items |

mod json;
mod memory;

use std::sync::{Arc, Mutex};

use thiserror::Error;

pub use json::JsonStore;
pub use memory::{LocalStorage, StorageEvent, StorageEvents, StorageTab, TabId};

/// Well-known storage keys.
pub mod keys {
    /// Persisted admin login flag (`"true"` or absent).
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";

    /// This installation's device fingerprint.
    pub const DEVICE_ID: &str = "deviceId";

    /// Admin login device allow-list.
    pub const AUTH_DEVICES: &str = "authDevices";

    /// Whole product catalog.
    pub const PRODUCTS: &str = "products";

    /// Cart line items.
    pub const CART: &str = "cart";
}

/// Errors from a storage backend or from (de)serializing stored values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("failed to decode stored value for '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Whether the error is a corrupt stored value rather than a backend
    /// failure.
    #[must_use]
    pub const fn is_corrupt_data(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// A string key/value store with browser local-storage semantics.
///
/// Methods take `&self` so a store can be shared; implementations provide
/// their own interior mutability.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Lock shared by every handle onto this backend, taken around
    /// read-modify-write sequences. `None` if the backend has none.
    fn apply_lock(&self) -> Option<Arc<Mutex<()>>> {
        None
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn apply_lock(&self) -> Option<Arc<Mutex<()>>> {
        (**self).apply_lock()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn apply_lock(&self) -> Option<Arc<Mutex<()>>> {
        (**self).apply_lock()
    }
}
