//! # In-process reference event store.
//!
//! [`InMemoryEventStore`] is a minimal engine backing demos and tests: each
//! `(store, stream)` pair maps to a `tokio::sync::broadcast` channel, a feed
//! is one receiver on that channel, and `append` publishes to whoever is
//! subscribed at that moment. Live-feed semantics only: events appended
//! before a subscription are not replayed.
//!
//! The store counts live feeds so tests can assert the release contract:
//! every feed decrements the counter on release **or** drop.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use crate::error::FeedError;
use crate::listeners::StoreId;
use crate::store::{EventStore, Feed, StoredEvent};

/// In-memory pub/sub engine for demos and tests.
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<(StoreId, Arc<str>), broadcast::Sender<StoredEvent>>>,
    live_feeds: Arc<AtomicUsize>,
    capacity: usize,
}

impl InMemoryEventStore {
    /// Creates a store with the default per-stream buffer (256 events).
    pub fn new() -> Arc<Self> {
        Self::with_capacity(256)
    }

    /// Creates a store with an explicit per-stream buffer capacity.
    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            streams: RwLock::new(HashMap::new()),
            live_feeds: Arc::new(AtomicUsize::new(0)),
            capacity: capacity.max(1),
        })
    }

    /// Appends an event to a stream, delivering it to current feeds.
    ///
    /// Returns the number of feeds that received the event.
    pub async fn append(&self, store_id: &StoreId, stream_id: &str, event: StoredEvent) -> usize {
        let tx = self.sender_for(store_id, stream_id).await;
        tx.send(event).unwrap_or(0)
    }

    /// Ends the stream: all current feeds observe `None` after draining.
    ///
    /// A later `append` to the same stream id starts a fresh channel; ended
    /// feeds stay ended.
    pub async fn close_stream(&self, store_id: &StoreId, stream_id: &str) {
        let key = (store_id.clone(), Arc::<str>::from(stream_id));
        self.streams.write().await.remove(&key);
    }

    /// Number of feeds that have been handed out and not yet released.
    pub fn live_feeds(&self) -> usize {
        self.live_feeds.load(AtomicOrdering::SeqCst)
    }

    async fn sender_for(&self, store_id: &StoreId, stream_id: &str) -> broadcast::Sender<StoredEvent> {
        let key = (store_id.clone(), Arc::<str>::from(stream_id));

        {
            let streams = self.streams.read().await;
            if let Some(tx) = streams.get(&key) {
                return tx.clone();
            }
        }

        let mut streams = self.streams.write().await;
        streams
            .entry(key)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn subscribe(
        &self,
        store_id: &StoreId,
        stream_id: &str,
    ) -> Result<Box<dyn Feed>, FeedError> {
        let tx = self.sender_for(store_id, stream_id).await;
        self.live_feeds.fetch_add(1, AtomicOrdering::SeqCst);

        Ok(Box::new(MemoryFeed {
            rx: tx.subscribe(),
            _guard: FeedGuard(Arc::clone(&self.live_feeds)),
        }))
    }
}

/// Decrements the live-feed counter when the feed is torn down.
struct FeedGuard(Arc<AtomicUsize>);

impl Drop for FeedGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

struct MemoryFeed {
    rx: broadcast::Receiver<StoredEvent>,
    _guard: FeedGuard,
}

#[async_trait]
impl Feed for MemoryFeed {
    async fn next(&mut self) -> Option<StoredEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                // Skipped items are gone from the ring buffer; keep draining.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    }
}
