//! Login device allow-list repository.

use chrono::{DateTime, Utc};

use toyshop_core::storage::keys;
use toyshop_core::{AuthDevice, DeviceId, JsonStore, KeyValueStore};

use super::RepositoryError;

/// Outcome of registering a device under a capacity limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The device was already listed; its login time was refreshed.
    Refreshed,
    /// The device was added.
    Added,
    /// The list is full and the device is not on it; nothing changed.
    LimitReached {
        /// The capacity that was hit.
        max: usize,
    },
}

/// Insert `device_id` with `now` as its login time.
///
/// Any existing entry for the id is dropped first, the list is sorted by most
/// recent login, and anything beyond `capacity` is evicted. Returns the
/// evicted entries.
pub fn insert_device(
    devices: &mut Vec<AuthDevice>,
    device_id: DeviceId,
    now: DateTime<Utc>,
    capacity: usize,
) -> Vec<AuthDevice> {
    devices.retain(|d| d.device_id != device_id);
    devices.push(AuthDevice::new(device_id, now));
    // Stable: equal timestamps keep insertion order.
    devices.sort_by(|a, b| b.last_login.cmp(&a.last_login));
    if devices.len() > capacity {
        devices.split_off(capacity)
    } else {
        Vec::new()
    }
}

/// Repository for the admin login allow-list.
#[derive(Debug)]
pub struct DeviceRepository<S> {
    store: JsonStore<S>,
}

impl<S: KeyValueStore> DeviceRepository<S> {
    /// Create a new device repository.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store: JsonStore::new(store),
        }
    }

    /// Devices on the allow-list, most recent login first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Decode` if the stored list is corrupt.
    pub fn list(&self) -> Result<Vec<AuthDevice>, RepositoryError> {
        self.store.load_or_default(keys::AUTH_DEVICES)
    }

    /// Whether the device is on the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Decode` if the stored list is corrupt.
    pub fn contains(&self, device_id: &DeviceId) -> Result<bool, RepositoryError> {
        Ok(self.list()?.iter().any(|d| d.device_id == *device_id))
    }

    /// Add or refresh a device, evicting the least recently logged-in
    /// entries beyond `capacity`. Returns the evicted entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn add(
        &self,
        device_id: DeviceId,
        now: DateTime<Utc>,
        capacity: usize,
    ) -> Result<Vec<AuthDevice>, RepositoryError> {
        self.store
            .apply(keys::AUTH_DEVICES, |devices: &mut Vec<AuthDevice>| {
                Ok(insert_device(devices, device_id, now, capacity))
            })
    }

    /// Register a device only if it is already listed or there is room.
    ///
    /// Check and insert happen in one read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn register(
        &self,
        device_id: DeviceId,
        now: DateTime<Utc>,
        capacity: usize,
    ) -> Result<Registration, RepositoryError> {
        self.store
            .apply(keys::AUTH_DEVICES, |devices: &mut Vec<AuthDevice>| {
                let known = devices.iter().any(|d| d.device_id == device_id);
                if !known && devices.len() >= capacity {
                    return Ok(Registration::LimitReached { max: capacity });
                }
                insert_device(devices, device_id, now, capacity);
                Ok(if known {
                    Registration::Refreshed
                } else {
                    Registration::Added
                })
            })
    }

    /// Remove a device. Returns whether it was listed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list cannot be read or written.
    pub fn remove(&self, device_id: &DeviceId) -> Result<bool, RepositoryError> {
        self.store
            .apply(keys::AUTH_DEVICES, |devices: &mut Vec<AuthDevice>| {
                let before = devices.len();
                devices.retain(|d| d.device_id != *device_id);
                Ok(devices.len() != before)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{Duration, TimeZone};
    use toyshop_core::LocalStorage;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    fn repo() -> DeviceRepository<toyshop_core::StorageTab> {
        DeviceRepository::new(LocalStorage::new().open_tab())
    }

    #[test]
    fn test_six_distinct_devices_keep_five_most_recent() {
        let repo = repo();
        for i in 0..6 {
            repo.add(DeviceId::new(format!("device-{i}")), at(i), 5)
                .unwrap();
        }

        let devices = repo.list().unwrap();
        let ids: Vec<&str> = devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["device-5", "device-4", "device-3", "device-2", "device-1"]
        );
    }

    #[test]
    fn test_add_existing_device_refreshes_login() {
        let repo = repo();
        repo.add(DeviceId::new("a"), at(0), 5).unwrap();
        repo.add(DeviceId::new("b"), at(1), 5).unwrap();
        repo.add(DeviceId::new("a"), at(2), 5).unwrap();

        let devices = repo.list().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_id.as_str(), "a");
        assert_eq!(devices[0].last_login, at(2));
    }

    #[test]
    fn test_insert_returns_evicted() {
        let mut devices = vec![
            AuthDevice::new(DeviceId::new("old"), at(0)),
            AuthDevice::new(DeviceId::new("newer"), at(10)),
        ];

        let evicted = insert_device(&mut devices, DeviceId::new("new"), at(20), 2);

        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].device_id.as_str(), "old");
    }

    #[test]
    fn test_register_refuses_new_device_when_full() {
        let repo = repo();
        for i in 0..5 {
            repo.add(DeviceId::new(format!("device-{i}")), at(i), 5)
                .unwrap();
        }

        let outcome = repo
            .register(DeviceId::new("intruder"), at(100), 5)
            .unwrap();
        assert_eq!(outcome, Registration::LimitReached { max: 5 });
        assert!(!repo.contains(&DeviceId::new("intruder")).unwrap());
        assert_eq!(repo.list().unwrap().len(), 5);

        let outcome = repo
            .register(DeviceId::new("device-0"), at(100) + Duration::seconds(1), 5)
            .unwrap();
        assert_eq!(outcome, Registration::Refreshed);
    }

    #[test]
    fn test_remove() {
        let repo = repo();
        repo.add(DeviceId::new("a"), at(0), 5).unwrap();

        assert!(repo.remove(&DeviceId::new("a")).unwrap());
        assert!(!repo.remove(&DeviceId::new("a")).unwrap());
        assert!(repo.list().unwrap().is_empty());
    }
}
