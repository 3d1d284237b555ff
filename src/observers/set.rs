//! # Non-blocking event fan-out to multiple observers.
//!
//! Provides [`ObserverSet`] - distributes events to multiple observers
//! concurrently without blocking the publisher.
//!
//! ## Rules
//! - **No cross-observer ordering**: observer A may process event N while B
//!   processes N+5
//! - **Overflow**: event dropped for that observer only, `ObserverOverflow`
//!   published
//! - **Non-blocking**: `emit` returns immediately (uses `try_send`)
//! - **Isolation**: a slow or panicking observer doesn't affect others
//! - **Per-observer FIFO**: each observer sees events in order
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind` to isolate panics: the panic is caught,
//! converted to an `ObserverPanicked` event, and the worker continues with
//! the next event.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::observers::Observer;

/// Per-observer channel metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event observers.
///
/// Manages per-observer queues and worker tasks, providing concurrent
/// delivery, queue isolation, panic safety and overflow reporting.
pub struct ObserverSet {
    channels: Vec<ObserverChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker task per observer.
    ///
    /// Must be called within a Tokio runtime. Workers start immediately and
    /// process events until shutdown. Minimum queue capacity is 1.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observer>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().max(1);
            let name = obs.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = obs.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = {
                            let any = &*panic_err;
                            if let Some(msg) = any.downcast_ref::<&'static str>() {
                                (*msg).to_string()
                            } else if let Some(msg) = any.downcast_ref::<String>() {
                                msg.clone()
                            } else {
                                "unknown panic".to_string()
                            }
                        };
                        bus_for_worker.publish(Event::observer_panicked(obs.name(), info));
                    }
                }
            });
            channels.push(ObserverChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits a pre-allocated `Arc<Event>` to all observers.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: drops the event for that observer, publishes
    ///   `ObserverOverflow`
    /// - Overflow reports are not re-published when they themselves overflow
    pub fn emit(&self, event: Arc<Event>) {
        let is_report = event.is_observer_report();

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_report {
                        self.bus
                            .publish(Event::observer_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_report {
                        self.bus
                            .publish(Event::observer_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Gracefully shuts down all observer workers.
    ///
    /// 1. Drops all channel senders (workers see channel closed)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}
