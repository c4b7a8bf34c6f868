//! Authentication state and trusted device types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DeviceId;

/// Maximum number of devices allowed to hold an admin login at once.
pub const MAX_AUTH_DEVICES: usize = 5;

/// A device on the admin login allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDevice {
    pub device_id: DeviceId,
    /// Persisted as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_login: DateTime<Utc>,
}

impl AuthDevice {
    /// Create a new allow-list entry.
    #[must_use]
    pub const fn new(device_id: DeviceId, last_login: DateTime<Utc>) -> Self {
        Self {
            device_id,
            last_login,
        }
    }
}

/// Derived admin authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
}
