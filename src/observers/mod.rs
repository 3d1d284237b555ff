//! # Event observers for the streamvisor runtime.
//!
//! This module provides the [`Observer`] trait and the fan-out machinery
//! that delivers runtime [`Event`](crate::events::Event)s broadcast through
//! the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Worker/Monitor ── publish(Event) ──► Bus ──► observer pump (in Supervisor)
//!                                                      │
//!                                                      ▼
//!                                              ObserverSet::emit
//!                                        ┌─────────┬─────────┐
//!                                        ▼         ▼         ▼
//!                                   [queue 1] [queue 2] [queue N]
//!                                        ▼         ▼         ▼
//!                                   worker 1  worker 2  worker N
//!                                        ▼         ▼         ▼
//!                                 obs1.on_event obs2.on_event ...
//! ```
//!
//! ## Observer types
//! - **Passive observers** - logging, metrics, alerting
//! - Provided: [`LogWriter`] (feature `logging`) renders events via `tracing`
//!
//! ## Implementing custom observers
//! ```rust
//! use streamvisor::{Event, EventKind, Observer};
//! use async_trait::async_trait;
//!
//! struct CrashCounter;
//!
//! #[async_trait]
//! impl Observer for CrashCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ListenerCrashed {
//!             // increment a counter
//!         }
//!     }
//!     fn name(&self) -> &'static str { "crash-counter" }
//! }
//! ```

mod observer;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use observer::Observer;
pub use set::ObserverSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
