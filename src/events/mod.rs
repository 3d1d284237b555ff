//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the supervisor, the
//! registry, listener workers and observer workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor`, listener workers, monitor tasks,
//!   `ObserverSet` workers (overflow/panic).
//! - **Consumers**: the supervisor's observer pump (fans out to
//!   `ObserverSet`), plus any receiver obtained via [`Bus::subscribe`].
//!
//! See `core/mod.rs` for the system-level wiring diagram.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
