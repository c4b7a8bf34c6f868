//! JSON file-backed key/value store.
//!
//! The whole map is one JSON object on disk, loaded on open and rewritten on
//! every change, so state survives between `toyshop` invocations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use toyshop_core::{KeyValueStore, StorageError};

/// A key/value store persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    apply_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the file exists but cannot be read
    /// or is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| backend(&path, &e))?;
            let entries: BTreeMap<String, String> =
                serde_json::from_str(&contents).map_err(|e| backend(&path, &e))?;
            debug!(path = %path.display(), keys = entries.len(), "loaded data file");
            entries
        } else {
            debug!(path = %path.display(), "data file not found, starting fresh");
            BTreeMap::new()
        };

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                entries: Mutex::new(entries),
                apply_lock: Arc::default(),
            }),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the map atomically via a temp file.
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let path = &self.inner.path;
        let json = serde_json::to_string_pretty(entries).map_err(|e| backend(path, &e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| backend(path, &e))?;
        }
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(|e| backend(path, &e))?;
        std::fs::rename(&temp_path, path).map_err(|e| backend(path, &e))?;

        debug!(path = %path.display(), keys = entries.len(), "flushed data file");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();
        let mut updated = entries.clone();
        updated.insert(key.to_owned(), value.to_owned());
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn apply_lock(&self) -> Option<Arc<Mutex<()>>> {
        Some(Arc::clone(&self.inner.apply_lock))
    }
}

fn backend(path: &Path, err: &dyn std::fmt::Display) -> StorageError {
    StorageError::Backend(format!("{}: {err}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;
    use toyshop_core::JsonStore;

    use super::*;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("data.json")).unwrap();

        assert_eq!(store.get("cart").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        let store = FileStore::open(&path).unwrap();
        store.set("cart", "[]").unwrap();
        store.set("deviceId", "abc").unwrap();
        store.remove("deviceId").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("deviceId").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");

        FileStore::open(&path).unwrap().set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_clones_serialize_read_modify_write() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("data.json")).unwrap();

        let writers: Vec<_> = (0..2)
            .map(|_| {
                let json = JsonStore::new(store.clone());
                std::thread::spawn(move || {
                    for i in 0..50_u32 {
                        json.apply("numbers", |numbers: &mut Vec<u32>| {
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

        let numbers: Vec<u32> = JsonStore::new(&store).load("numbers").unwrap().unwrap();
        assert_eq!(numbers.len(), 100);
    }

    #[test]
    fn test_corrupt_file_is_backend_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
