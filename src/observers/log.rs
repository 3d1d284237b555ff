//! # Tracing-backed logging observer for debugging and demos.
//!
//! [`LogWriter`] renders runtime events as `tracing` log lines. Enabled via
//! the `logging` feature; attach a `tracing-subscriber` in the host binary to
//! see the output.
//!
//! Not intended for production use - implement a custom
//! [`Observer`](crate::observers::Observer) for metrics collection or
//! alerting pipelines.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::observers::Observer;

/// Logging observer rendering events through `tracing`.
pub struct LogWriter;

#[async_trait]
impl Observer for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ListenerStarting => {
                info!(
                    store = e.store.as_deref(),
                    stream = e.stream.as_deref(),
                    subscriber = e.subscriber.as_deref(),
                    "listener starting"
                );
            }
            EventKind::ListenerStarted => {
                info!(
                    worker = e.worker.map(|w| w.as_u64()),
                    store = e.store.as_deref(),
                    stream = e.stream.as_deref(),
                    subscriber = e.subscriber.as_deref(),
                    "listener started"
                );
            }
            EventKind::ListenerReused => {
                info!(
                    worker = e.worker.map(|w| w.as_u64()),
                    store = e.store.as_deref(),
                    stream = e.stream.as_deref(),
                    subscriber = e.subscriber.as_deref(),
                    "listener reused"
                );
            }
            EventKind::ListenerStopRequested => {
                info!(worker = e.worker.map(|w| w.as_u64()), "listener stop requested");
            }
            EventKind::ListenerStopped => {
                info!(
                    worker = e.worker.map(|w| w.as_u64()),
                    store = e.store.as_deref(),
                    stream = e.stream.as_deref(),
                    "listener stopped"
                );
            }
            EventKind::ListenerCrashed => {
                warn!(
                    worker = e.worker.map(|w| w.as_u64()),
                    reason = e.reason.as_deref(),
                    "listener crashed"
                );
            }
            EventKind::FeedEnded => {
                info!(
                    worker = e.worker.map(|w| w.as_u64()),
                    stream = e.stream.as_deref(),
                    "feed ended"
                );
            }
            EventKind::StreamSwept => {
                info!(
                    store = e.store.as_deref(),
                    stream = e.stream.as_deref(),
                    swept = e.reason.as_deref(),
                    "stream swept"
                );
            }
            EventKind::ShutdownRequested => {
                info!("shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                info!("all listeners stopped within grace");
            }
            EventKind::GraceExceeded => {
                warn!("shutdown grace exceeded");
            }
            EventKind::ObserverOverflow => {
                warn!(detail = e.reason.as_deref(), "observer overflow");
            }
            EventKind::ObserverPanicked => {
                warn!(detail = e.reason.as_deref(), "observer panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
