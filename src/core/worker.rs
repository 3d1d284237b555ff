//! # ListenerWorker: one feed, one sink.
//!
//! Supervises nothing and knows nothing about other workers: it drains one
//! feed and forwards every event to its sink in arrival order.
//!
//! ## Flow
//! ```text
//! loop {
//!   select! {
//!     cancel  ──► break (cooperative stop)
//!     feed    ──► Some(event) → sink.deliver(event)
//!              └► None        → publish FeedEnded, break
//!   }
//! }
//! feed.release()
//! ```
//!
//! ## Rules
//! - Deliveries run **sequentially**; a slow sink delays only this listener
//! - Cancellation is honored at the loop head, never mid-delivery
//! - The feed is released on every exit path: explicitly after the loop, and
//!   via the feed's drop contract when the worker panics mid-loop
//! - The `done` guard drops exactly when this future is destroyed, so the
//!   handle's liveness flips atomically with termination

use std::sync::Arc;

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::listeners::{EventSink, ListenerKey, WorkerId};
use crate::store::Feed;

/// Why the worker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    /// Cooperative stop via cancellation token.
    Stopped,
    /// The upstream feed ended on its own.
    FeedEnded,
}

/// Forwards one stream's live feed to one delivery target.
pub(crate) struct ListenerWorker {
    /// Identity reported in lifecycle events.
    pub id: WorkerId,
    /// Key this worker serves.
    pub key: ListenerKey,
    /// Live feed obtained from the event store.
    pub feed: Box<dyn Feed>,
    /// Delivery target.
    pub sink: Arc<dyn EventSink>,
    /// Lifecycle event bus.
    pub bus: Bus,
    /// Flipped when this future completes; pairs with the handle's liveness.
    pub done: CancellationToken,
}

impl ListenerWorker {
    /// Runs until cancelled or the feed ends.
    pub(crate) async fn run(mut self, cancel: CancellationToken) -> WorkerExit {
        let _done = self.done.clone().drop_guard();

        let exit = loop {
            select! {
                _ = cancel.cancelled() => break WorkerExit::Stopped,
                item = self.feed.next() => match item {
                    Some(event) => self.sink.deliver(event).await,
                    None => {
                        self.bus.publish(
                            Event::new(EventKind::FeedEnded)
                                .with_worker(self.id)
                                .with_stream(self.key.stream_arc()),
                        );
                        break WorkerExit::FeedEnded;
                    }
                }
            }
        };

        self.feed.release().await;
        exit
    }
}
