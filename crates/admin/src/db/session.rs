//! Admin login flag and device identity storage.

use toyshop_core::storage::keys;
use toyshop_core::{DeviceId, KeyValueStore};

use super::RepositoryError;

/// Stored value of the login flag.
const AUTHENTICATED: &str = "true";

/// Repository for the per-installation login state.
#[derive(Debug)]
pub struct SessionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the login flag is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the store cannot be read.
    pub fn is_flagged(&self) -> Result<bool, RepositoryError> {
        Ok(self.store.get(keys::IS_AUTHENTICATED)?.as_deref() == Some(AUTHENTICATED))
    }

    /// Set the login flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the store cannot be written.
    pub fn set_flag(&self) -> Result<(), RepositoryError> {
        self.store.set(keys::IS_AUTHENTICATED, AUTHENTICATED)
    }

    /// Clear the login flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the store cannot be written.
    pub fn clear_flag(&self) -> Result<(), RepositoryError> {
        self.store.remove(keys::IS_AUTHENTICATED)
    }

    /// The persisted device id, if one was generated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the store cannot be read.
    pub fn device_id(&self) -> Result<Option<DeviceId>, RepositoryError> {
        Ok(self
            .store
            .get(keys::DEVICE_ID)?
            .filter(|id| !id.is_empty())
            .map(DeviceId::from))
    }

    /// Persist the device id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the store cannot be written.
    pub fn save_device_id(&self, device_id: &DeviceId) -> Result<(), RepositoryError> {
        self.store.set(keys::DEVICE_ID, device_id.as_str())
    }
}
