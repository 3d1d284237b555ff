//! Error types used by the streamvisor runtime and the event-store seam.
//!
//! This module defines the error enums of the public surface:
//!
//! - [`StartError`] - failures of `start_listener` (bad config, upstream subscribe).
//! - [`StopError`] - a requested termination was not confirmed in time.
//! - [`FeedError`] - the external event store could not establish a feed.
//! - [`RuntimeError`] - errors raised by the supervision runtime itself.
//!
//! All types provide `as_label` (stable snake_case for logs/metrics) and a
//! human-readable `Display` via `thiserror`.
//!
//! Benign absence is deliberately **not** an error anywhere in this crate:
//! stopping an unknown or already-dead handle succeeds, and introspection on
//! an empty store returns zeroed results.

use std::time::Duration;
use thiserror::Error;

use crate::listeners::{StoreId, WorkerId};

/// Errors produced by `start_listener`.
///
/// Anything past these two gates is recovered internally: losing a concurrent
/// spawn race for the same key is resolved by returning the winner's handle
/// and is never surfaced to the caller.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    /// The listener configuration is missing a required field.
    ///
    /// Raised synchronously, before any spawn or subscribe attempt.
    #[error("invalid listener config: `{field}` is required")]
    InvalidConfig {
        /// Name of the offending field (`store_id`, `stream_id`, `subscriber`).
        field: &'static str,
    },

    /// The upstream feed subscription could not be established.
    ///
    /// No registry entry is recorded when this is returned.
    #[error("failed to establish feed subscription: {0}")]
    SpawnFailed(#[from] FeedError),

    /// The per-store listener cap would be exceeded.
    #[error("listener cap reached for store {store} (limit {limit})")]
    CapacityExceeded {
        /// Store the listener was destined for.
        store: StoreId,
        /// Configured `max_listeners_per_store`.
        limit: usize,
    },
}

impl StartError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::InvalidConfig { .. } => "start_invalid_config",
            StartError::SpawnFailed(_) => "start_spawn_failed",
            StartError::CapacityExceeded { .. } => "start_capacity_exceeded",
        }
    }
}

/// Errors produced by `stop_listener` and `stop_listeners_for_stream`.
///
/// A timeout leaves registry state as-is; the caller may retry the stop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StopError {
    /// Termination was requested but not confirmed within the bound.
    #[error("worker {worker} did not confirm termination within {timeout:?}")]
    Timeout {
        /// Worker whose termination went unconfirmed.
        worker: WorkerId,
        /// The configured `stop_timeout`.
        timeout: Duration,
    },
}

impl StopError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StopError::Timeout { .. } => "stop_timeout",
        }
    }
}

/// Errors raised by the external event store when establishing a feed.
///
/// These are surfaced through [`StartError::SpawnFailed`]. Failures of an
/// already-established feed are the worker's concern: the feed ends, the
/// worker exits, and the supervisor reaps it as ordinary termination.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FeedError {
    /// The requested stream cannot be subscribed to.
    #[error("stream `{stream}` unavailable in store {store}")]
    StreamUnavailable {
        /// Store that rejected the subscription.
        store: StoreId,
        /// Stream identifier that was requested.
        stream: String,
    },

    /// The store backend failed for reasons of its own.
    #[error("event store backend error: {message}")]
    Backend {
        /// Backend-supplied failure description.
        message: String,
    },
}

impl FeedError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FeedError::StreamUnavailable { .. } => "feed_stream_unavailable",
            FeedError::Backend { .. } => "feed_backend",
        }
    }
}

/// Errors produced by the supervision runtime itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some listeners remained stuck.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Keys of listeners that did not shut down in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = StartError::InvalidConfig { field: "store_id" };
        assert_eq!(err.as_label(), "start_invalid_config");

        let err = StopError::Timeout {
            worker: WorkerId::from_raw(7),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.as_label(), "stop_timeout");

        let err = RuntimeError::GraceExceeded {
            grace: Duration::from_secs(30),
            stuck: vec![],
        };
        assert_eq!(err.as_label(), "runtime_grace_exceeded");
    }

    #[test]
    fn spawn_failed_wraps_feed_error() {
        let feed = FeedError::Backend {
            message: "connection refused".into(),
        };
        let err = StartError::from(feed);
        assert_eq!(err.as_label(), "start_spawn_failed");
        assert!(err.to_string().contains("connection refused"));
    }
}
