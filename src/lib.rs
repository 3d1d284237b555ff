//! # streamvisor
//!
//! **Streamvisor** is a dynamic listener supervision library for event-store
//! stream subscriptions.
//!
//! It maintains exactly one live worker per logical key
//! `(store, stream, subscriber)`: each worker subscribes to the live feed of
//! one stream on behalf of one subscriber and forwards events as they
//! arrive. The crate provides deduplication (never two workers for one key),
//! fault isolation (a crashed worker is reaped without corrupting
//! bookkeeping and is transparently restartable), and safe concurrent access
//! from many callers issuing start/stop requests simultaneously.
//!
//! ## Architecture
//! ```text
//!     callers (domain/application layer)
//!        │ start_listener / stop_listener / stop_listeners_for_stream
//!        │ stats / list_listeners
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor (runtime orchestrator)                                │
//! │  - Registry (key → worker, worker → key; paired maps)             │
//! │  - Bus (broadcast lifecycle events)                               │
//! │  - ObserverSet (fans out to user observers)                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ListenerWorker│   │ListenerWorker│   │ListenerWorker│  (one per key)
//! │ feed → sink  │   │ feed → sink  │   │ feed → sink  │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        │ subscribe()      │                  │
//!        ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │            EventStore (external engine, behind a trait)           │
//! └───────────────────────────────────────────────────────────────────┘
//!
//! Termination observation:
//!   each spawned worker gets a monitor task that awaits its completion,
//!   reaps the registry entry, and publishes ListenerStopped / Crashed.
//!   No auto-restart: the next start_listener spawns a fresh worker.
//! ```
//!
//! ## Lifecycle of one key
//! ```text
//! absent ──start_listener──► live ──stop / crash / feed end──► absent ──► …
//!
//! - while live: further start_listener calls return the same handle
//! - after termination: the next start spawns a worker with a fresh WorkerId
//! - lookup never returns a dead handle
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                      |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Supervision**   | Dedup start, idempotent stop, stream sweep, shutdown.    | [`Supervisor`], [`SupervisorConfig`]    |
//! | **Identity**      | Key, handles, worker ids.                                | [`ListenerKey`], [`ListenerHandle`]     |
//! | **Store seam**    | Subscription contract with the external engine.          | [`EventStore`], [`Feed`], [`StoredEvent`] |
//! | **Delivery**      | Opaque sinks; mailbox-backed implementation.             | [`EventSink`], [`ChannelSink`]          |
//! | **Observability** | Lifecycle events, observer fan-out.                      | [`Event`], [`Observer`], [`Bus`]        |
//! | **Errors**        | Typed errors for start/stop/feed/runtime.                | [`StartError`], [`StopError`]           |
//!
//! ## Optional features
//! - `logging`: exports a tracing-backed [`LogWriter`] observer _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use streamvisor::{
//!     ChannelSink, InMemoryEventStore, ListenerConfig, StoredEvent, SubscriberRef,
//!     Supervisor, SupervisorConfig,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryEventStore::new();
//!     let sup = Supervisor::builder(SupervisorConfig::default(), store.clone()).build();
//!
//!     // A mailbox the subscriber drains at its own pace.
//!     let (sink, mut inbox) = ChannelSink::pair(64);
//!     let handle = sup
//!         .start_listener(ListenerConfig::new(
//!             "tenant-a",
//!             "greenhouse-42",
//!             SubscriberRef::new("projector", sink),
//!         ))
//!         .await?;
//!
//!     store
//!         .append(
//!             &"tenant-a".into(),
//!             "greenhouse-42",
//!             StoredEvent::new("greenhouse-42", 0, "reading", bytes::Bytes::from_static(b"{}")),
//!         )
//!         .await;
//!
//!     let event = inbox.recv().await.expect("delivered");
//!     assert_eq!(event.event_number, 0);
//!
//!     sup.stop_listener(&"tenant-a".into(), &handle).await?;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod listeners;
mod observers;
mod store;

// ---- Public re-exports ----

pub use core::{Supervisor, SupervisorBuilder, SupervisorConfig};
pub use error::{FeedError, RuntimeError, StartError, StopError};
pub use events::{Bus, Event, EventKind};
pub use listeners::{
    ChannelSink, EventSink, ListenerConfig, ListenerHandle, ListenerInfo, ListenerKey,
    ListenerStats, StoreId, SubscriberId, SubscriberRef, WorkerId,
};
pub use observers::{Observer, ObserverSet};
pub use store::{EventStore, Feed, InMemoryEventStore, StoredEvent};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
