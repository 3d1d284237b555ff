//! # Listener registry - authoritative key → worker bookkeeping.
//!
//! The registry owns the only shared mutable state in the crate: a forward
//! map (key → entry) and a reverse map (worker → key), guarded by a single
//! `RwLock` so the pair always updates atomically together.
//!
//! ## Rules
//! - At most one live entry per key at any instant
//! - `lookup` never returns a dead handle: entries whose worker has finished
//!   are treated as absent and evicted by the next `insert` for that key (or
//!   by the worker's monitor calling `remove_by_worker`)
//! - All removal operations are idempotent
//! - Reads are copy-on-read snapshots; the write lock is held only for map
//!   mutation, never across worker I/O

use std::collections::HashMap;
use std::time::SystemTime;

use tokio::sync::RwLock;

use crate::listeners::{ListenerHandle, ListenerKey, StoreId, WorkerId};

/// One registered listener. Owned exclusively by the registry; immutable
/// (a change is remove + insert).
#[derive(Clone)]
pub(crate) struct ListenerEntry {
    /// Handle to the worker serving the slot.
    pub handle: ListenerHandle,
    /// When the worker was registered.
    pub started_at: SystemTime,
}

/// Why an insert was refused.
#[derive(Debug)]
pub(crate) enum InsertError {
    /// A live entry already occupies the key; the occupant's handle is
    /// returned so the caller can resolve the race by reusing it.
    AlreadyPresent(ListenerHandle),
    /// The per-store cap is reached.
    CapacityExceeded {
        /// Configured `max_listeners_per_store`.
        limit: usize,
    },
}

struct Maps {
    forward: HashMap<ListenerKey, ListenerEntry>,
    reverse: HashMap<WorkerId, ListenerKey>,
}

/// Authoritative, race-free index of live listeners.
pub(crate) struct Registry {
    maps: RwLock<Maps>,
    cap: Option<usize>,
}

impl Registry {
    /// Creates an empty registry with an optional per-store cap.
    pub(crate) fn new(cap: Option<usize>) -> Self {
        Self {
            maps: RwLock::new(Maps {
                forward: HashMap::new(),
                reverse: HashMap::new(),
            }),
            cap,
        }
    }

    /// Returns the live handle for a key, if any.
    pub(crate) async fn lookup(&self, key: &ListenerKey) -> Option<ListenerHandle> {
        let maps = self.maps.read().await;
        maps.forward
            .get(key)
            .filter(|entry| entry.handle.is_alive())
            .map(|entry| entry.handle.clone())
    }

    /// Records a freshly spawned worker under its key.
    ///
    /// Fails with [`InsertError::AlreadyPresent`] when a live entry occupies
    /// the key. A dead entry that its monitor has not yet reaped is evicted
    /// in the same critical section, so a respawn never observes a stale
    /// occupant.
    pub(crate) async fn insert(&self, handle: ListenerHandle) -> Result<(), InsertError> {
        let key = handle.key().clone();
        let mut maps = self.maps.write().await;

        if let Some(existing) = maps.forward.get(&key) {
            if existing.handle.is_alive() {
                return Err(InsertError::AlreadyPresent(existing.handle.clone()));
            }
            let stale = existing.handle.worker();
            maps.forward.remove(&key);
            maps.reverse.remove(&stale);
        }

        if let Some(limit) = self.cap {
            let live = maps
                .forward
                .values()
                .filter(|e| e.handle.key().store() == key.store() && e.handle.is_alive())
                .count();
            if live >= limit {
                return Err(InsertError::CapacityExceeded { limit });
            }
        }

        maps.reverse.insert(handle.worker(), key.clone());
        maps.forward.insert(
            key,
            ListenerEntry {
                handle,
                started_at: SystemTime::now(),
            },
        );
        Ok(())
    }

    /// Removes the entry belonging to a worker, returning the key it freed.
    ///
    /// O(1) via the reverse map; used by termination observation. Idempotent:
    /// removing an absent worker is a no-op returning `None`.
    pub(crate) async fn remove_by_worker(&self, worker: WorkerId) -> Option<ListenerKey> {
        let mut maps = self.maps.write().await;
        let key = maps.reverse.remove(&worker)?;

        let occupant = maps
            .forward
            .get(&key)
            .map(|entry| entry.handle.worker());
        if occupant == Some(worker) {
            maps.forward.remove(&key);
        }
        Some(key)
    }

    /// Removes whatever entry occupies a key. Idempotent.
    ///
    /// Stop paths prefer [`Registry::remove_by_worker`], which cannot clip a
    /// respawned occupant that took the key over in the meantime.
    #[allow(dead_code)]
    pub(crate) async fn remove_by_key(&self, key: &ListenerKey) -> Option<ListenerEntry> {
        let mut maps = self.maps.write().await;
        let entry = maps.forward.remove(key)?;
        maps.reverse.remove(&entry.handle.worker());
        Some(entry)
    }

    /// Consistent point-in-time copy of all live entries for one store.
    pub(crate) async fn snapshot(&self, store: &StoreId) -> Vec<ListenerEntry> {
        let maps = self.maps.read().await;
        maps.forward
            .values()
            .filter(|e| e.handle.key().store() == store && e.handle.is_alive())
            .cloned()
            .collect()
    }

    /// Live entries matching one `(store, stream)` pair; sweep pre-pass.
    pub(crate) async fn snapshot_stream(
        &self,
        store: &StoreId,
        stream: &str,
    ) -> Vec<ListenerEntry> {
        let maps = self.maps.read().await;
        maps.forward
            .values()
            .filter(|e| {
                let key = e.handle.key();
                key.store() == store && key.stream() == stream && e.handle.is_alive()
            })
            .cloned()
            .collect()
    }

    /// All live entries across every store; shutdown support.
    pub(crate) async fn snapshot_all(&self) -> Vec<ListenerEntry> {
        let maps = self.maps.read().await;
        maps.forward
            .values()
            .filter(|e| e.handle.is_alive())
            .cloned()
            .collect()
    }

    /// Sorted key strings of entries still alive; stuck-listener report.
    pub(crate) async fn alive_keys(&self) -> Vec<String> {
        let maps = self.maps.read().await;
        let mut keys: Vec<String> = maps
            .forward
            .values()
            .filter(|e| e.handle.is_alive())
            .map(|e| e.handle.key().to_string())
            .collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    fn entry_for(store: &str, stream: &str, sub: &str) -> (ListenerHandle, CancellationToken) {
        let key = ListenerKey::new(store.into(), stream, sub.into());
        let done = CancellationToken::new();
        let handle =
            ListenerHandle::new(WorkerId::next(), key, CancellationToken::new(), done.clone());
        (handle, done)
    }

    #[tokio::test]
    async fn insert_refuses_live_duplicates() {
        let registry = Registry::new(None);
        let (first, _done) = entry_for("t", "s", "sub");
        registry.insert(first.clone()).await.expect("first insert");

        let (second, _done2) = entry_for("t", "s", "sub");
        match registry.insert(second).await {
            Err(InsertError::AlreadyPresent(winner)) => assert_eq!(winner, first),
            _ => panic!("expected AlreadyPresent"),
        }
    }

    #[tokio::test]
    async fn dead_entries_are_evicted_on_insert() {
        let registry = Registry::new(None);
        let (first, done) = entry_for("t", "s", "sub");
        registry.insert(first.clone()).await.expect("first insert");

        done.cancel();
        assert!(registry.lookup(first.key()).await.is_none());

        let (second, _done2) = entry_for("t", "s", "sub");
        registry.insert(second.clone()).await.expect("respawn insert");

        let found = registry.lookup(second.key()).await.expect("live handle");
        assert_eq!(found, second);
        // The stale worker's reverse entry is gone too.
        assert!(registry.remove_by_worker(first.worker()).await.is_none());
    }

    #[tokio::test]
    async fn removal_is_idempotent_both_ways() {
        let registry = Registry::new(None);
        let (handle, _done) = entry_for("t", "s", "sub");
        registry.insert(handle.clone()).await.expect("insert");

        assert!(registry.remove_by_worker(handle.worker()).await.is_some());
        assert!(registry.remove_by_worker(handle.worker()).await.is_none());
        assert!(registry.remove_by_key(handle.key()).await.is_none());
    }

    #[tokio::test]
    async fn snapshots_are_scoped_per_store() {
        let registry = Registry::new(None);
        let (a, _da) = entry_for("t1", "s1", "sub-a");
        let (b, _db) = entry_for("t1", "s2", "sub-b");
        let (c, _dc) = entry_for("t2", "s1", "sub-c");
        for h in [a, b, c] {
            registry.insert(h).await.expect("insert");
        }

        assert_eq!(registry.snapshot(&"t1".into()).await.len(), 2);
        assert_eq!(registry.snapshot(&"t2".into()).await.len(), 1);
        assert_eq!(registry.snapshot(&"t3".into()).await.len(), 0);
        assert_eq!(registry.snapshot_stream(&"t1".into(), "s1").await.len(), 1);
    }

    #[tokio::test]
    async fn cap_applies_per_store_to_live_entries() {
        let registry = Registry::new(Some(2));
        let (a, _da) = entry_for("t", "s1", "sub");
        let (b, done_b) = entry_for("t", "s2", "sub");
        registry.insert(a).await.expect("insert a");
        registry.insert(b).await.expect("insert b");

        let (c, _dc) = entry_for("t", "s3", "sub");
        assert!(matches!(
            registry.insert(c).await,
            Err(InsertError::CapacityExceeded { limit: 2 })
        ));

        // Other stores are unaffected by t's cap.
        let (other, _do) = entry_for("u", "s1", "sub");
        registry.insert(other).await.expect("other store");

        // A dead entry frees its slot.
        done_b.cancel();
        let (d, _dd) = entry_for("t", "s4", "sub");
        registry.insert(d).await.expect("slot freed");
    }
}
