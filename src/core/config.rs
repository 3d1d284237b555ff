//! # Global runtime configuration.
//!
//! Provides [`SupervisorConfig`] centralized settings for the supervision
//! runtime.
//!
//! Config is consumed by [`Supervisor::builder`](crate::Supervisor::builder).
//!
//! ## Sentinel values
//! - `max_listeners_per_store = 0` → unlimited (no cap enforced)
//! - minimum bus capacity is 1 (clamped by the Bus)

use std::time::Duration;

/// Global configuration for the supervision runtime.
///
/// ## Field semantics
/// - `stop_timeout`: bound on waiting for a stop confirmation
/// - `grace`: maximum wait for listeners to stop during shutdown
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `max_listeners_per_store`: per-store listener cap (`0` = unlimited)
///
/// All fields are public for flexibility. Prefer the helper accessors to
/// avoid sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Maximum time to wait for a worker to confirm termination.
    ///
    /// `stop_listener` and `stop_listeners_for_stream` report
    /// [`StopError::Timeout`](crate::StopError::Timeout) when exceeded;
    /// registry state is left as-is so the caller can retry.
    pub stop_timeout: Duration,

    /// Maximum time to wait for graceful shutdown before giving up.
    ///
    /// When `shutdown()` is called:
    /// - Workers are cancelled via their `CancellationToken`s
    /// - The supervisor waits up to `grace` for all of them to exit
    /// - On timeout it returns
    ///   [`RuntimeError::GraceExceeded`](crate::RuntimeError::GraceExceeded)
    pub grace: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages
    /// observe `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Maximum live listeners per store.
    ///
    /// - `0` = unlimited (no cap)
    /// - `n > 0` = `start_listener` fails with `CapacityExceeded` once a
    ///   store holds `n` live listeners
    pub max_listeners_per_store: usize,
}

impl SupervisorConfig {
    /// Returns the per-store listener cap as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` live listeners per store
    #[inline]
    pub fn listener_cap(&self) -> Option<usize> {
        if self.max_listeners_per_store == 0 {
            None
        } else {
            Some(self.max_listeners_per_store)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `stop_timeout = 5s`
    /// - `grace = 30s`
    /// - `bus_capacity = 1024`
    /// - `max_listeners_per_store = 0` (unlimited)
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(5),
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
            max_listeners_per_store: 0,
        }
    }
}
