//! # Worker identity, caller handles, and introspection results.
//!
//! [`WorkerId`] is drawn from a global monotonic counter; a respawned listener
//! always carries a fresh id, so a handle from before a crash never compares
//! equal to the handle of the replacement worker.
//!
//! [`ListenerHandle`] is the opaque value returned by `start_listener`. It is
//! cheap to clone and carries two cancellation tokens:
//! - `cancel`: cooperative stop signal owned by the supervisor's lifecycle
//! - `done`: flipped the instant the worker future completes (the worker holds
//!   a `DropGuard`, so normal exit, panic, and abort all flip it)
//!
//! Liveness checks and stop confirmation are both reads of `done`; no registry
//! access is required to answer `is_alive`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use tokio_util::sync::CancellationToken;

use crate::listeners::{ListenerKey, StoreId, SubscriberId};

/// Global counter for worker identities.
static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of one spawned worker.
///
/// Never reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u64);

impl WorkerId {
    /// Allocates the next worker id.
    pub(crate) fn next() -> Self {
        Self(NEXT_WORKER_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Constructs an id from a raw value (tests and diagnostics).
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a running (or finished) listener worker.
///
/// Returned by `start_listener`; accepted by `stop_listener`. Clones all
/// refer to the same worker. Handles compare equal by [`WorkerId`].
#[derive(Clone)]
pub struct ListenerHandle {
    worker: WorkerId,
    key: ListenerKey,
    cancel: CancellationToken,
    done: CancellationToken,
}

impl ListenerHandle {
    pub(crate) fn new(
        worker: WorkerId,
        key: ListenerKey,
        cancel: CancellationToken,
        done: CancellationToken,
    ) -> Self {
        Self {
            worker,
            key,
            cancel,
            done,
        }
    }

    /// Identity of the worker behind this handle.
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    /// The key this worker serves.
    pub fn key(&self) -> &ListenerKey {
        &self.key
    }

    /// True while the worker future has not completed.
    ///
    /// Flips to false the moment the worker exits for any reason (clean stop,
    /// feed end, panic) and never flips back.
    pub fn is_alive(&self) -> bool {
        !self.done.is_cancelled()
    }

    /// Completes once the worker has terminated.
    ///
    /// Resolves immediately if the worker is already gone.
    pub async fn terminated(&self) {
        self.done.cancelled().await;
    }

    /// Requests cooperative termination of the worker.
    pub(crate) fn request_stop(&self) {
        self.cancel.cancel();
    }
}

impl PartialEq for ListenerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.worker == other.worker
    }
}

impl Eq for ListenerHandle {}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("worker", &self.worker)
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// One row of `list_listeners` output.
#[derive(Debug, Clone)]
pub struct ListenerInfo {
    /// Store component of the key.
    pub store_id: StoreId,
    /// Stream component of the key.
    pub stream_id: String,
    /// Subscriber component of the key.
    pub subscriber: SubscriberId,
    /// Identity of the live worker serving the slot.
    pub worker: WorkerId,
    /// When the worker was registered.
    pub started_at: SystemTime,
}

/// Aggregate counters computed from one registry snapshot.
#[derive(Debug, Clone, Default)]
pub struct ListenerStats {
    /// Number of live listeners in the snapshot.
    pub total_listeners: usize,
    /// Live listener count per store id.
    pub listeners_by_store: HashMap<StoreId, usize>,
    /// Distinct stream ids among the live listeners (duplicates collapsed).
    pub active_streams: HashSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_ids_are_unique_and_ordered() {
        let a = WorkerId::next();
        let b = WorkerId::next();
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn handle_liveness_follows_done_token() {
        let key = ListenerKey::new("t".into(), "s", "sub".into());
        let done = CancellationToken::new();
        let handle =
            ListenerHandle::new(WorkerId::next(), key, CancellationToken::new(), done.clone());

        assert!(handle.is_alive());
        done.cancel();
        assert!(!handle.is_alive());
    }

    #[test]
    fn handles_compare_by_worker_identity() {
        let key = ListenerKey::new("t".into(), "s", "sub".into());
        let h1 = ListenerHandle::new(
            WorkerId::next(),
            key.clone(),
            CancellationToken::new(),
            CancellationToken::new(),
        );
        let h2 = h1.clone();
        let h3 = ListenerHandle::new(
            WorkerId::next(),
            key,
            CancellationToken::new(),
            CancellationToken::new(),
        );

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }
}
