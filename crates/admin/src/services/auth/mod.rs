//! Admin authentication service.
//!
//! One shared username/password pair guards the admin console. A successful
//! login also registers the current device on an allow-list of at most
//! [`AdminConfig::max_devices`] entries; a device that is not listed cannot
//! log in while the list is full.

mod clock;
mod error;
mod fingerprint;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, INVALID_CREDENTIALS_MESSAGE};
pub use fingerprint::{FingerprintProvider, ScreenSize, StaticFingerprint, generate_device_id};

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use toyshop_core::{AuthDevice, AuthState, DeviceId, KeyValueStore};

use crate::config::AdminConfig;
use crate::db::devices::{DeviceRepository, Registration};
use crate::db::session::SessionRepository;

/// Login form check: both fields must be filled in.
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if either is empty.
pub fn require_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() {
        warn!("login form rejected: missing credentials");
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}

/// Admin authentication service.
pub struct AuthService<S> {
    config: AdminConfig,
    session: SessionRepository<S>,
    devices: DeviceRepository<S>,
    fingerprint: Arc<dyn FingerprintProvider>,
    clock: Arc<dyn Clock>,
}

impl<S> std::fmt::Debug for AuthService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore + Clone> AuthService<S> {
    /// Create an authentication service using the system clock.
    #[must_use]
    pub fn new(config: AdminConfig, store: S, fingerprint: Arc<dyn FingerprintProvider>) -> Self {
        Self {
            config,
            session: SessionRepository::new(store.clone()),
            devices: DeviceRepository::new(store),
            fingerprint,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// This installation's device id, generating and persisting one on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the id cannot be read or stored.
    pub fn current_device_id(&self) -> Result<DeviceId, AuthError> {
        if let Some(id) = self.session.device_id()? {
            return Ok(id);
        }
        let id = generate_device_id(self.fingerprint.as_ref());
        self.session.save_device_id(&id)?;
        info!(device_id = %id, "generated device id");
        Ok(id)
    }

    /// Attempt to log in.
    ///
    /// Returns `Ok(false)` for any mismatch, blank input included. On success
    /// the login flag is set and this device is added to (or refreshed on)
    /// the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DeviceLimitReached` if the allow-list is full and
    /// this device is not on it (nothing is written), or `AuthError::Storage`.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if !self.config.credentials.matches(username, password) {
            warn!("login rejected: invalid credentials");
            return Ok(false);
        }

        let device_id = self.current_device_id()?;
        let max = self.config.max_devices;
        match self.devices.register(device_id.clone(), self.clock.now(), max)? {
            Registration::LimitReached { max } => {
                warn!(device_id = %device_id, max, "login rejected: device limit reached");
                return Err(AuthError::DeviceLimitReached { max });
            }
            Registration::Added => info!(device_id = %device_id, "new device registered"),
            Registration::Refreshed => info!(device_id = %device_id, "device login refreshed"),
        }

        self.session.set_flag()?;
        info!("admin logged in");
        Ok(true)
    }

    /// Log out and free this device's allow-list slot.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if storage cannot be updated.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear_flag()?;
        if let Some(device_id) = self.session.device_id()? {
            let removed = self.devices.remove(&device_id)?;
            info!(device_id = %device_id, removed, "admin logged out");
        } else {
            info!("admin logged out");
        }
        Ok(())
    }

    /// Whether the login flag is set and this device is on the allow-list.
    ///
    /// Unreadable storage counts as logged out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match self.check_authenticated() {
            Ok(authenticated) => authenticated,
            Err(e) => {
                error!(error = %e, "failed to read auth state; treating as logged out");
                false
            }
        }
    }

    fn check_authenticated(&self) -> Result<bool, AuthError> {
        if !self.session.is_flagged()? {
            return Ok(false);
        }
        let Some(device_id) = self.session.device_id()? else {
            return Ok(false);
        };
        Ok(self.devices.contains(&device_id)?)
    }

    /// Current authentication state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        AuthState {
            is_authenticated: self.is_authenticated(),
        }
    }

    /// Devices on the allow-list, most recent login first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the list cannot be read.
    pub fn devices(&self) -> Result<Vec<AuthDevice>, AuthError> {
        Ok(self.devices.list()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use toyshop_core::storage::keys;
    use toyshop_core::{LocalStorage, StorageTab};

    use super::*;
    use crate::config::AdminCredentials;

    fn fingerprint() -> Arc<dyn FingerprintProvider> {
        Arc::new(StaticFingerprint::new(
            "test-agent",
            ScreenSize {
                width: 800,
                height: 600,
            },
        ))
    }

    fn service(storage: &LocalStorage, clock: &Arc<ManualClock>) -> AuthService<StorageTab> {
        let config = AdminConfig::new(AdminCredentials::new("admin", "pw"));
        AuthService::new(config, storage.open_tab(), fingerprint()).with_clock(clock.clone())
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ))
    }

    #[test]
    fn test_login_success_sets_state() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());

        assert!(!auth.is_authenticated());
        assert!(auth.login("admin", "pw").unwrap());
        assert!(auth.is_authenticated());
        assert_eq!(auth.devices().unwrap().len(), 1);
    }

    #[test]
    fn test_wrong_password_returns_false() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());

        assert!(!auth.login("admin", "nope").unwrap());
        assert!(!auth.is_authenticated());
        assert!(auth.devices().unwrap().is_empty());
    }

    #[test]
    fn test_blank_input_is_a_mismatch() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());

        assert!(!auth.login("", "").unwrap());
        assert!(!auth.login(" ", "pw").unwrap());
        assert!(!auth.is_authenticated());
        assert!(auth.devices().unwrap().is_empty());
    }

    #[test]
    fn test_require_credentials() {
        assert!(require_credentials("admin", "pw").is_ok());
        assert!(require_credentials(" ", "pw").is_ok());
        assert!(matches!(
            require_credentials("", "pw"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            require_credentials("admin", ""),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_device_limit_blocks_new_device() {
        let clock = clock();
        let storage = LocalStorage::new();
        let repo = DeviceRepository::new(storage.open_tab());
        for i in 0..5 {
            repo.add(DeviceId::new(format!("other-{i}")), clock.now(), 5)
                .unwrap();
            clock.advance(Duration::seconds(1));
        }

        let auth = service(&storage, &clock);
        let err = auth.login("admin", "pw").unwrap_err();

        assert!(matches!(err, AuthError::DeviceLimitReached { max: 5 }));
        assert!(!auth.is_authenticated());
        assert_eq!(auth.devices().unwrap().len(), 5);
        let flag = storage.open_tab().get(keys::IS_AUTHENTICATED).unwrap();
        assert!(flag.is_none());
    }

    #[test]
    fn test_logout_frees_slot() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());
        auth.login("admin", "pw").unwrap();

        auth.logout().unwrap();

        assert!(!auth.is_authenticated());
        assert!(auth.devices().unwrap().is_empty());
    }

    #[test]
    fn test_flag_without_listed_device_is_not_authenticated() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());
        auth.login("admin", "pw").unwrap();

        let device_id = auth.current_device_id().unwrap();
        DeviceRepository::new(storage.open_tab())
            .remove(&device_id)
            .unwrap();

        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_corrupt_device_list_reads_as_logged_out() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());
        auth.login("admin", "pw").unwrap();

        storage
            .open_tab()
            .set(keys::AUTH_DEVICES, "not json")
            .unwrap();

        assert!(!auth.state().is_authenticated);
    }

    #[test]
    fn test_device_id_is_stable() {
        let storage = LocalStorage::new();
        let auth = service(&storage, &clock());

        let first = auth.current_device_id().unwrap();
        let second = auth.current_device_id().unwrap();
        assert_eq!(first, second);
    }
}
