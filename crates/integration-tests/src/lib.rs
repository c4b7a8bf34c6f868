//! Integration tests for Toyshop.
//!
//! Scenarios span crates: the admin side writes products and logins, the
//! storefront side browses and checks out, and several tabs share one
//! in-memory [`LocalStorage`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p toyshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_sync` - Admin product writes reaching open storefront tabs
//! - `cart_tabs` - Cart persistence and last-writer-wins between tabs
//! - `admin_login` - Device-limited login across installations
//! - `checkout` - Cart to WhatsApp order link

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use toyshop_admin::services::auth::{AuthService, ManualClock, ScreenSize, StaticFingerprint};
use toyshop_admin::services::products::ProductService;
use toyshop_admin::{AdminConfig, AdminCredentials, ProductDraft};
use toyshop_core::storage::keys;
use toyshop_core::{
    DeviceId, KeyValueStore, LocalStorage, Price, SizeVariant, StorageError, StorageTab,
};
use toyshop_storefront::{Storefront, StorefrontConfig};

/// Admin username used by every fixture.
pub const ADMIN_USERNAME: &str = "admin";
/// Admin password used by every fixture.
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// One shared storage plus helpers for opening storefront and admin views
/// onto it.
#[derive(Debug)]
pub struct TestShop {
    storage: LocalStorage,
    clock: Arc<ManualClock>,
}

impl Default for TestShop {
    fn default() -> Self {
        Self::new()
    }
}

impl TestShop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: LocalStorage::new(),
            clock: Arc::new(ManualClock::new(epoch())),
        }
    }

    /// The shared storage.
    #[must_use]
    pub const fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// The clock every auth service uses.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// A new tab onto the shared storage.
    #[must_use]
    pub fn tab(&self) -> StorageTab {
        self.storage.open_tab()
    }

    /// Admin product management in its own tab.
    #[must_use]
    pub fn products(&self) -> ProductService<StorageTab> {
        ProductService::new(self.tab())
    }

    /// Storefront over `tab` with default configuration.
    #[must_use]
    pub fn storefront(&self, tab: StorageTab) -> Storefront<StorageTab> {
        Storefront::load(StorefrontConfig::default(), tab)
    }

    /// Admin login service for a browser identified by `user_agent`.
    #[must_use]
    pub fn auth(&self, user_agent: &str) -> AuthService<StorageTab> {
        let fingerprint = StaticFingerprint::new(
            user_agent,
            ScreenSize {
                width: 1280,
                height: 720,
            },
        );
        AuthService::new(admin_config(), self.tab(), Arc::new(fingerprint))
            .with_clock(self.clock.clone())
    }

    /// Forget this installation's device id so the next login generates a
    /// new one, as a fresh browser would.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be removed.
    pub fn new_device(&self) -> Result<(), StorageError> {
        self.tab().remove(keys::DEVICE_ID)
    }

    /// Make `device_id` the current installation's id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be written.
    pub fn use_device(&self, device_id: &DeviceId) -> Result<(), StorageError> {
        self.tab().set(keys::DEVICE_ID, device_id.as_str())
    }
}

/// Admin configuration with the fixture credentials and default limit.
#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig::new(AdminCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD))
}

/// A valid product draft with the given sizes and price in cents.
#[must_use]
pub fn draft(name: &str, sizes: &[(&str, u32)], cents: i64) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: format!("{name} for testing"),
        price: Price::from_cents(cents),
        images: vec!["data:image/png;base64,iVBORw0KGgo=".to_string()],
        sizes: sizes
            .iter()
            .map(|&(size, count)| SizeVariant::new(size, count))
            .collect(),
        ..ProductDraft::default()
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}
