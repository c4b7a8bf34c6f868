//! In-memory shared storage with per-tab change notifications.
//!
//! [`LocalStorage`] models the browser substrate: one map shared by any
//! number of tabs. Each [`StorageTab`] is an independent handle; a write
//! through one tab notifies every *other* tab, the way the browser `storage`
//! event does. There is no locking across tabs and no merge, so concurrent
//! writers simply overwrite each other.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use super::{KeyValueStore, StorageError};

/// Buffered change notifications per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Identifies one tab (handle) onto a [`LocalStorage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    /// Origin used for synthetic events not caused by any tab.
    pub const EXTERNAL: Self = Self(0);

    /// The raw tab number.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// A change made to shared storage by some tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The changed key, or `None` when the whole store was cleared (or
    /// events were missed and everything must be reloaded).
    pub key: Option<String>,
    /// The tab that made the change.
    pub origin: TabId,
}

impl StorageEvent {
    /// Event telling listeners to reload everything.
    #[must_use]
    pub const fn resync() -> Self {
        Self {
            key: None,
            origin: TabId::EXTERNAL,
        }
    }

    /// Whether state stored under `key` may have changed.
    #[must_use]
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|changed| changed == key)
    }
}

struct Shared {
    entries: Mutex<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    next_tab: AtomicU64,
    apply_lock: Arc<Mutex<()>>,
}

/// Shared in-memory key/value storage.
///
/// Cloning yields another reference to the same storage.
#[derive(Clone)]
pub struct LocalStorage {
    shared: Arc<Shared>,
}

impl LocalStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(BTreeMap::new()),
                events,
                next_tab: AtomicU64::new(1),
                apply_lock: Arc::default(),
            }),
        }
    }

    /// Create storage pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        storage
            .entries()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        storage
    }

    /// Open a new tab onto this storage.
    #[must_use]
    pub fn open_tab(&self) -> StorageTab {
        let id = TabId(self.shared.next_tab.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(tab = %id, "opened storage tab");
        StorageTab {
            storage: self.clone(),
            id,
        }
    }

    /// Copy of every entry currently stored.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries().clone()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.shared
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: StorageEvent) {
        // No subscribers is not an error.
        let _ = self.shared.events.send(event);
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorage")
            .field("keys", &self.len())
            .finish_non_exhaustive()
    }
}

/// One tab's handle onto a [`LocalStorage`].
#[derive(Clone, Debug)]
pub struct StorageTab {
    storage: LocalStorage,
    id: TabId,
}

impl StorageTab {
    /// This tab's id.
    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    /// The shared storage behind this tab.
    #[must_use]
    pub const fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Subscribe to changes made by other tabs.
    #[must_use]
    pub fn subscribe(&self) -> StorageEvents {
        StorageEvents {
            receiver: self.storage.shared.events.subscribe(),
            tab: self.id,
        }
    }

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Never fails for in-memory storage; the signature matches the
    /// fallible store operations.
    pub fn clear(&self) -> Result<(), StorageError> {
        let had_entries = {
            let mut entries = self.storage.entries();
            let had_entries = !entries.is_empty();
            entries.clear();
            had_entries
        };
        if had_entries {
            self.storage.publish(StorageEvent {
                key: None,
                origin: self.id,
            });
        }
        Ok(())
    }

    fn changed(&self, key: &str) {
        self.storage.publish(StorageEvent {
            key: Some(key.to_owned()),
            origin: self.id,
        });
    }
}

impl KeyValueStore for StorageTab {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self
            .storage
            .entries()
            .insert(key.to_owned(), value.to_owned());
        if previous.as_deref() != Some(value) {
            self.changed(key);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let previous = self.storage.entries().remove(key);
        if previous.is_some() {
            self.changed(key);
        }
        Ok(())
    }

    fn apply_lock(&self) -> Option<Arc<Mutex<()>>> {
        Some(Arc::clone(&self.storage.shared.apply_lock))
    }
}

/// Stream of storage changes made by tabs other than the subscriber.
#[derive(Debug)]
pub struct StorageEvents {
    receiver: broadcast::Receiver<StorageEvent>,
    tab: TabId,
}

impl StorageEvents {
    /// Next pending event, without waiting.
    ///
    /// If the subscriber fell behind and events were dropped, a
    /// [`StorageEvent::resync`] is returned so the listener reloads
    /// everything.
    pub fn try_next(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.origin == self.tab => {}
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(tab = %self.tab, missed, "storage events dropped, resyncing");
                    return Some(StorageEvent::resync());
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Every pending event, without waiting.
    pub fn drain(&mut self) -> Vec<StorageEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Wait for the next event. Returns `None` once the storage is gone.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.tab => {}
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(tab = %self.tab, missed, "storage events dropped, resyncing");
                    return Some(StorageEvent::resync());
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_share_entries() {
        let storage = LocalStorage::new();
        let a = storage.open_tab();
        let b = storage.open_tab();

        a.set("cart", "[]").unwrap();
        assert_eq!(b.get("cart").unwrap().as_deref(), Some("[]"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_tabs_share_apply_lock() {
        let storage = LocalStorage::new();
        let a = storage.open_tab().apply_lock().unwrap();
        let b = storage.open_tab().apply_lock().unwrap();
        let other = LocalStorage::new().open_tab().apply_lock().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn test_events_skip_own_tab() {
        let storage = LocalStorage::new();
        let a = storage.open_tab();
        let b = storage.open_tab();
        let mut a_events = a.subscribe();
        let mut b_events = b.subscribe();

        a.set("cart", "[]").unwrap();

        assert!(a_events.try_next().is_none());
        let event = b_events.try_next().unwrap();
        assert_eq!(event.key.as_deref(), Some("cart"));
        assert_eq!(event.origin, a.id());
    }

    #[test]
    fn test_unchanged_writes_do_not_notify() {
        let storage = LocalStorage::new();
        let a = storage.open_tab();
        let mut b_events = storage.open_tab().subscribe();

        a.set("k", "v").unwrap();
        a.set("k", "v").unwrap();
        a.remove("missing").unwrap();

        assert_eq!(b_events.drain().len(), 1);
    }

    #[test]
    fn test_clear_sends_keyless_event() {
        let storage = LocalStorage::with_entries([("cart", "[]")]);
        let a = storage.open_tab();
        let mut b_events = storage.open_tab().subscribe();

        a.clear().unwrap();

        let event = b_events.try_next().unwrap();
        assert!(event.key.is_none());
        assert!(event.affects("products"));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_lagging_subscriber_resyncs() {
        let storage = LocalStorage::new();
        let a = storage.open_tab();
        let mut b_events = storage.open_tab().subscribe();

        for i in 0..(EVENT_CAPACITY + 10) {
            a.set("counter", &i.to_string()).unwrap();
        }

        assert_eq!(b_events.try_next(), Some(StorageEvent::resync()));
    }

    #[tokio::test]
    async fn test_recv_waits_for_other_tab() {
        let storage = LocalStorage::new();
        let a = storage.open_tab();
        let mut b_events = storage.open_tab().subscribe();

        let writer = tokio::spawn(async move {
            a.set("products", "[]").unwrap();
        });

        let event = b_events.recv().await.unwrap();
        writer.await.unwrap();
        assert!(event.affects("products"));
        assert!(!event.affects("cart"));
    }
}
