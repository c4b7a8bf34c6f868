//! Typed JSON access on top of a [`KeyValueStore`].

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{KeyValueStore, StorageError};

/// JSON document access with serialized read-modify-write.
///
/// Every [`apply`](Self::apply) runs under the backend's
/// [`apply_lock`](KeyValueStore::apply_lock), so in-process mutations through
/// any handle onto the same storage cannot interleave their read and write.
/// Backends without one get a lock shared by this `JsonStore` and its
/// clones. Writers in other processes are not covered; the last write wins.
pub struct JsonStore<S> {
    store: S,
    apply_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> JsonStore<S> {
    /// Wrap a key/value store.
    #[must_use]
    pub fn new(store: S) -> Self {
        let apply_lock = store.apply_lock().unwrap_or_default();
        Self { store, apply_lock }
    }

    /// The underlying key/value store.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.store
    }

    /// Read and decode a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Decode` if the stored JSON does not match `T`,
    /// or a backend error.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.to_owned(),
                source,
            })
    }

    /// Read and decode a value, falling back to `T::default()` when absent.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StorageError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Encode and write a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Encode` if `value` cannot be serialized, or a
    /// backend error.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    /// Remove a value.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the removal fails.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key)
    }

    /// Read-modify-write a document under the store's apply lock.
    ///
    /// Loads `key` (or `T::default()`), runs `f` on it, and writes the result
    /// back only if `f` succeeds. A failed `f` leaves storage untouched.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error converted into `E`.
    pub fn apply<T, R, E, F>(&self, key: &str, f: F) -> Result<R, E>
    where
        T: DeserializeOwned + Serialize + Default,
        E: From<StorageError>,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let _guard = self
            .apply_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut document: T = self.load_or_default(key)?;
        let result = f(&mut document)?;
        self.save(key, &document)?;
        Ok(result)
    }
}

impl<S: KeyValueStore + Clone> Clone for JsonStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            apply_lock: Arc::clone(&self.apply_lock),
        }
    }
}

impl<S> std::fmt::Debug for JsonStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;

    #[test]
    fn test_load_missing_is_none() {
        let store = JsonStore::new(LocalStorage::new().open_tab());
        let value: Option<Vec<u32>> = store.load("missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_load_corrupt_is_decode_error() {
        let tab = LocalStorage::new().open_tab();
        tab.set("numbers", "{not json").unwrap();
        let store = JsonStore::new(tab);

        let err = store.load::<Vec<u32>>("numbers").unwrap_err();
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn test_apply_writes_on_success() {
        let store = JsonStore::new(LocalStorage::new().open_tab());
        let len = store
            .apply("numbers", |numbers: &mut Vec<u32>| {
                numbers.push(7);
                Ok::<_, StorageError>(numbers.len())
            })
            .unwrap();

        assert_eq!(len, 1);
        assert_eq!(store.load::<Vec<u32>>("numbers").unwrap(), Some(vec![7]));
    }

    #[test]
    fn test_apply_serialized_across_stores_on_one_backend() {
        let storage = LocalStorage::new();
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let store = JsonStore::new(storage.open_tab());
                std::thread::spawn(move || {
                    for i in 0..100_u32 {
                        store
                            .apply("numbers", |numbers: &mut Vec<u32>| {
                                numbers.push(i);
                                Ok::<_, StorageError>(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let store = JsonStore::new(storage.open_tab());
        assert_eq!(store.load::<Vec<u32>>("numbers").unwrap().unwrap().len(), 400);
    }

    #[test]
    fn test_clone_shares_apply_lock() {
        let store = JsonStore::new(LocalStorage::new().open_tab());
        let clone = store.clone();
        assert!(Arc::ptr_eq(&store.apply_lock, &clone.apply_lock));
    }

    #[test]
    fn test_apply_skips_write_on_failure() {
        let store = JsonStore::new(LocalStorage::new().open_tab());
        store.save("numbers", &vec![1_u32]).unwrap();

        let result = store.apply("numbers", |numbers: &mut Vec<u32>| {
            numbers.clear();
            Err::<(), _>(StorageError::Backend("rejected".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.load::<Vec<u32>>("numbers").unwrap(), Some(vec![1]));
    }
}
