//! # Runtime events emitted by the supervisor and listener workers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Listener lifecycle**: spawn flow (starting, started, reused, stopped, crashed)
//! - **Stream management**: sweep and shutdown progress
//! - **Observer plumbing**: overflow and panic reports from observer workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! worker id, key components and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::listeners::WorkerId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Listener lifecycle ===
    /// A listener spawn attempt is underway (pre-subscribe).
    ///
    /// Sets: `store`, `stream`, `subscriber`, `at`, `seq`.
    ListenerStarting,

    /// A worker was spawned and registered for its key.
    ///
    /// Sets: `worker`, `store`, `stream`, `subscriber`, `at`, `seq`.
    ListenerStarted,

    /// A `start_listener` call resolved to an already-live worker (dedup).
    ///
    /// Sets: `worker`, `store`, `stream`, `subscriber`, `at`, `seq`.
    ListenerReused,

    /// Termination of a specific worker was requested.
    ///
    /// Sets: `worker`, `at`, `seq`.
    ListenerStopRequested,

    /// A worker terminated and its registry entry was removed.
    ///
    /// Sets: `worker`, `store`, `stream`, `subscriber`, `at`, `seq`.
    ListenerStopped,

    /// A worker terminated by panicking; its entry was removed.
    ///
    /// Sets: `worker`, `reason`, `at`, `seq`.
    ListenerCrashed,

    /// The upstream feed ended; the worker is exiting on its own.
    ///
    /// Sets: `worker`, `stream`, `at`, `seq`.
    FeedEnded,

    // === Stream management ===
    /// A `stop_listeners_for_stream` sweep finished.
    ///
    /// Sets: `store`, `stream`, `reason` (swept count), `at`, `seq`.
    StreamSwept,

    /// Supervisor shutdown was requested.
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All workers stopped within the configured grace period.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// Grace period exceeded; some workers did not stop in time.
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,

    // === Observer plumbing ===
    /// An observer dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason` (observer name and cause), `at`, `seq`.
    ObserverOverflow,

    /// An observer panicked while processing an event.
    ///
    /// Sets: `reason` (observer name and panic info), `at`, `seq`.
    ObserverPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Worker the event concerns, if applicable.
    pub worker: Option<WorkerId>,
    /// Store component of the listener key.
    pub store: Option<Arc<str>>,
    /// Stream component of the listener key.
    pub stream: Option<Arc<str>>,
    /// Subscriber component of the listener key.
    pub subscriber: Option<Arc<str>>,
    /// Human-readable reason (panic info, overflow details, counts).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            store: None,
            stream: None,
            subscriber: None,
            reason: None,
        }
    }

    /// Attaches the worker id.
    #[inline]
    pub fn with_worker(mut self, worker: WorkerId) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches the store component.
    #[inline]
    pub fn with_store(mut self, store: impl Into<Arc<str>>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Attaches the stream component.
    #[inline]
    pub fn with_stream(mut self, stream: impl Into<Arc<str>>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Attaches the subscriber component.
    #[inline]
    pub fn with_subscriber(mut self, subscriber: impl Into<Arc<str>>) -> Self {
        self.subscriber = Some(subscriber.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates an observer overflow event.
    #[inline]
    pub fn observer_overflow(observer: &'static str, cause: &'static str) -> Self {
        Event::new(EventKind::ObserverOverflow)
            .with_reason(format!("observer={observer} cause={cause}"))
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        Event::new(EventKind::ObserverPanicked)
            .with_reason(format!("observer={observer} panic={info}"))
    }

    /// True for events produced by observer plumbing itself.
    ///
    /// Used to avoid feedback loops when reporting overflow.
    #[inline]
    pub fn is_observer_report(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ObserverOverflow | EventKind::ObserverPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::ListenerStarted);
        let b = Event::new(EventKind::ListenerStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builder_sets_fields() {
        let ev = Event::new(EventKind::ListenerStarted)
            .with_worker(WorkerId::from_raw(3))
            .with_store("tenant-a")
            .with_stream("poll-1")
            .with_subscriber("projector");

        assert_eq!(ev.kind, EventKind::ListenerStarted);
        assert_eq!(ev.worker, Some(WorkerId::from_raw(3)));
        assert_eq!(ev.store.as_deref(), Some("tenant-a"));
        assert_eq!(ev.stream.as_deref(), Some("poll-1"));
        assert_eq!(ev.subscriber.as_deref(), Some("projector"));
    }
}
