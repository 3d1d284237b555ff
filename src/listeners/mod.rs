//! # Listener identity and caller-facing types.
//!
//! This module provides the domain types of the supervision core:
//! - [`StoreId`], [`SubscriberId`], [`ListenerKey`] - identity of one listener slot
//! - [`ListenerConfig`] - validated input to `start_listener`
//! - [`WorkerId`], [`ListenerHandle`] - opaque handle to a running worker
//! - [`ListenerInfo`], [`ListenerStats`] - introspection results
//! - [`EventSink`], [`SubscriberRef`], [`ChannelSink`] - event delivery seam

mod config;
mod handle;
mod key;
mod sink;

pub use config::ListenerConfig;
pub use handle::{ListenerHandle, ListenerInfo, ListenerStats, WorkerId};
pub use key::{ListenerKey, StoreId, SubscriberId};
pub use sink::{ChannelSink, EventSink, SubscriberRef};
