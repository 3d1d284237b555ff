//! # Listener slot identity.
//!
//! A listener slot is identified by the triple `(store, stream, subscriber)`,
//! modeled as [`ListenerKey`]. Equality is structural and is the **sole**
//! deduplication criterion: two `start_listener` calls with equal keys resolve
//! to the same worker while that worker is alive.
//!
//! [`StoreId`] and [`SubscriberId`] are cheap `Arc<str>` newtypes so keys can
//! be cloned freely between the registry, handles and events.

use std::fmt;
use std::sync::Arc;

/// Identifier of one event store (tenant) within the supervising domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreId(Arc<str>);

impl StoreId {
    /// Creates a store id from anything string-like.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoreId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StoreId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identifier of one delivery target.
///
/// Identity is the name alone; the sink attached to a [`SubscriberRef`]
/// (see `sink.rs`) does not participate in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(Arc<str>);

impl SubscriberId {
    /// Creates a subscriber id from anything string-like.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubscriberId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identity of one listener slot: `(store, stream, subscriber)`.
///
/// Immutable once constructed. Structural equality; used as the registry's
/// forward-map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    store: StoreId,
    stream: Arc<str>,
    subscriber: SubscriberId,
}

impl ListenerKey {
    /// Creates a key from its three components.
    pub fn new(store: StoreId, stream: impl Into<Arc<str>>, subscriber: SubscriberId) -> Self {
        Self {
            store,
            stream: stream.into(),
            subscriber,
        }
    }

    /// Store component.
    pub fn store(&self) -> &StoreId {
        &self.store
    }

    /// Stream component.
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Stream component as a shared string.
    pub(crate) fn stream_arc(&self) -> Arc<str> {
        Arc::clone(&self.stream)
    }

    /// Subscriber component.
    pub fn subscriber(&self) -> &SubscriberId {
        &self.subscriber
    }
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.store, self.stream, self.subscriber)
    }
}
