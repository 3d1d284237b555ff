//! # Event delivery seam.
//!
//! A worker forwards each feed event to exactly one delivery target. The
//! target is opaque to the supervision core: [`EventSink`] demands nothing
//! beyond "accepts delivered events".
//!
//! [`SubscriberRef`] pairs a sink with a [`SubscriberId`]; the id alone is
//! the identity used for keying, so two refs with the same id and different
//! sinks occupy the same listener slot.
//!
//! [`ChannelSink`] is the mailbox rendition of a delivery address: events are
//! pushed into a bounded `tokio::sync::mpsc` channel whose receiver the
//! subscriber drains at its own pace.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::listeners::SubscriberId;
use crate::store::StoredEvent;

/// Contract for event delivery targets.
///
/// Called from the owning worker task, one event at a time, in arrival
/// order. Implementations may be slow; they delay only their own listener,
/// never unrelated ones.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Accepts one forwarded event.
    async fn deliver(&self, event: StoredEvent);
}

/// A named delivery target: identity plus sink.
///
/// Equality (and thus slot identity) is the id alone.
#[derive(Clone)]
pub struct SubscriberRef {
    id: SubscriberId,
    sink: Arc<dyn EventSink>,
}

impl SubscriberRef {
    /// Creates a subscriber reference.
    pub fn new(id: impl Into<SubscriberId>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            id: id.into(),
            sink,
        }
    }

    /// Identity of the delivery target.
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// The sink events are forwarded to.
    pub fn sink(&self) -> Arc<dyn EventSink> {
        Arc::clone(&self.sink)
    }
}

impl fmt::Debug for SubscriberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRef").field("id", &self.id).finish()
    }
}

/// Mailbox-backed sink: forwards events into a bounded mpsc channel.
///
/// A dropped or full-and-closed receiver makes delivery a no-op; the worker
/// keeps running until the feed ends or it is stopped.
pub struct ChannelSink {
    tx: mpsc::Sender<StoredEvent>,
}

impl ChannelSink {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::Sender<StoredEvent>) -> Self {
        Self { tx }
    }

    /// Creates a sink and its receiving half with the given capacity.
    pub fn pair(capacity: usize) -> (Arc<Self>, mpsc::Receiver<StoredEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Arc::new(Self::new(tx)), rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn deliver(&self, event: StoredEvent) {
        let _ = self.tx.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn event(n: u64) -> StoredEvent {
        StoredEvent::new("s", n, "tested", Bytes::from_static(b"{}"))
    }

    #[tokio::test]
    async fn channel_sink_preserves_order() {
        let (sink, mut rx) = ChannelSink::pair(8);
        for n in 0..3 {
            sink.deliver(event(n)).await;
        }
        for n in 0..3 {
            assert_eq!(rx.recv().await.expect("event").event_number, n);
        }
    }

    #[tokio::test]
    async fn delivery_to_dropped_receiver_is_a_noop() {
        let (sink, rx) = ChannelSink::pair(1);
        drop(rx);
        sink.deliver(event(0)).await;
    }

    #[test]
    fn refs_with_same_id_share_identity() {
        let (a, _rx_a) = ChannelSink::pair(1);
        let (b, _rx_b) = ChannelSink::pair(1);
        let left = SubscriberRef::new("projector", a);
        let right = SubscriberRef::new("projector", b);
        assert_eq!(left.id(), right.id());
    }
}
