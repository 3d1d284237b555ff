//! # Subscription contract with the external event-store engine.
//!
//! `subscribe(store_id, stream_id) -> feed` where the feed yields a lazy,
//! ordered, potentially infinite sequence of [`StoredEvent`]s and must be
//! released when no longer needed.
//!
//! ## Release contract
//! A feed holds engine-side resources (a server subscription, a channel
//! receiver, a cursor). Workers call [`Feed::release`] on every normal exit
//! path. Implementations must **also** release in `Drop`: when a worker
//! panics mid-loop the feed box is dropped during unwinding, and that drop is
//! the only teardown that runs before the termination becomes observable to
//! the supervisor.

use async_trait::async_trait;

use crate::error::FeedError;
use crate::listeners::StoreId;
use crate::store::StoredEvent;

/// The external event-store engine, seen from the supervision core.
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Establishes a live feed of events for one stream.
    ///
    /// Fails with [`FeedError`] when the subscription cannot be established;
    /// the supervisor surfaces that as a spawn failure without registering
    /// anything.
    async fn subscribe(
        &self,
        store_id: &StoreId,
        stream_id: &str,
    ) -> Result<Box<dyn Feed>, FeedError>;
}

/// A live, ordered event feed for one stream.
#[async_trait]
pub trait Feed: Send {
    /// Yields the next event, or `None` once the feed has ended upstream.
    ///
    /// After `None` the feed is exhausted and only [`Feed::release`] (or
    /// drop) remains.
    async fn next(&mut self) -> Option<StoredEvent>;

    /// Releases the subscription.
    ///
    /// The default implementation just drops the feed, which is sufficient
    /// for engines whose teardown runs in `Drop`. Engines needing async
    /// teardown (a server round-trip, a flush) override this.
    async fn release(self: Box<Self>) {}
}
