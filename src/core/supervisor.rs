//! # Supervisor: orchestrates listener workers, deduplication, and teardown.
//!
//! The [`Supervisor`] is the only component that spawns or terminates
//! workers. It owns the registry, the lifecycle event bus, and the runtime
//! cancellation token; all public operations take `&self` and are safe to
//! call concurrently from many tasks without external locking.
//!
//! ## High-level architecture
//! ```text
//! start_listener(config)
//!   ├─► validate ──────────────► InvalidConfig (pre-spawn, synchronous)
//!   ├─► registry.lookup(key) ──► live handle? return it (dedup)
//!   ├─► store.subscribe() ─────► SpawnFailed (nothing registered)
//!   ├─► spawn ListenerWorker + monitor task
//!   └─► registry.insert(handle)
//!         ├─ win  ──► ListenerStarted, return new handle
//!         └─ lose ──► cancel own worker, return occupant's handle
//!
//! termination observation (one monitor per worker):
//!   worker future resolves ──► monitor: join → classify exit
//!         ├─► panic  ──► ListenerCrashed
//!         └─► normal ──► registry.remove_by_worker → ListenerStopped
//!   (no auto-restart: the next start_listener spawns a fresh worker)
//! ```
//!
//! ## Concurrency contract
//! Concurrent `start_listener` calls with an equal key never produce two
//! live workers: exactly one wins the insert, the others observe the
//! winner's entry, tear their speculative worker down (releasing its feed),
//! and return the winner's handle. Race losses are invisible to callers.
//!
//! For a single key the observable state sequence is strictly
//! `absent → live → absent → …`; a dead worker's handle is never returned
//! by lookup, and a respawned listener always carries a fresh [`WorkerId`].

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::config::SupervisorConfig;
use crate::core::registry::{InsertError, Registry};
use crate::core::worker::{ListenerWorker, WorkerExit};
use crate::error::{RuntimeError, StartError, StopError};
use crate::events::{Bus, Event, EventKind};
use crate::listeners::{
    ListenerConfig, ListenerHandle, ListenerInfo, ListenerKey, ListenerStats, StoreId, WorkerId,
};
use crate::store::EventStore;

/// Coordinates listener workers: deduplicated start, idempotent stop,
/// termination observation, and registry-backed introspection.
pub struct Supervisor {
    cfg: SupervisorConfig,
    store: Arc<dyn EventStore>,
    bus: Bus,
    registry: Arc<Registry>,
    runtime_token: CancellationToken,
}

impl Supervisor {
    /// Starts building a supervisor around an event store.
    pub fn builder(
        cfg: SupervisorConfig,
        store: Arc<dyn EventStore>,
    ) -> crate::core::builder::SupervisorBuilder {
        crate::core::builder::SupervisorBuilder::new(cfg, store)
    }

    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        store: Arc<dyn EventStore>,
        bus: Bus,
        registry: Arc<Registry>,
        runtime_token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            store,
            bus,
            registry,
            runtime_token,
        }
    }

    /// The lifecycle event bus; subscribe for ad-hoc event consumption.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Ensures a live listener for the key derived from `config`.
    ///
    /// Returns the existing worker's handle when one is alive (the reuse
    /// contract), otherwise spawns a fresh worker bound to the stream's feed
    /// and registers it. Validation failures and subscribe failures surface
    /// before anything is registered.
    pub async fn start_listener(
        &self,
        config: ListenerConfig,
    ) -> Result<ListenerHandle, StartError> {
        let key = config.validate()?;

        if let Some(existing) = self.registry.lookup(&key).await {
            self.publish_reused(&existing);
            return Ok(existing);
        }

        self.bus.publish(
            Event::new(EventKind::ListenerStarting)
                .with_store(key.store().as_str())
                .with_stream(key.stream_arc())
                .with_subscriber(key.subscriber().as_str()),
        );

        let feed = self.store.subscribe(key.store(), key.stream()).await?;

        let worker_id = WorkerId::next();
        let cancel = self.runtime_token.child_token();
        let done = CancellationToken::new();
        let handle = ListenerHandle::new(worker_id, key.clone(), cancel.clone(), done.clone());

        let worker = ListenerWorker {
            id: worker_id,
            key: key.clone(),
            feed,
            sink: config.subscriber.sink(),
            bus: self.bus.clone(),
            done,
        };
        let join = tokio::spawn(worker.run(cancel));
        self.spawn_monitor(worker_id, join);

        match self.registry.insert(handle.clone()).await {
            Ok(()) => {
                self.bus.publish(
                    Event::new(EventKind::ListenerStarted)
                        .with_worker(worker_id)
                        .with_store(key.store().as_str())
                        .with_stream(key.stream_arc())
                        .with_subscriber(key.subscriber().as_str()),
                );
                Ok(handle)
            }
            Err(InsertError::AlreadyPresent(winner)) => {
                // Lost the spawn race. Tear the speculative worker down; it
                // releases its feed on exit, and its monitor finds nothing
                // to remove.
                handle.request_stop();
                self.publish_reused(&winner);
                Ok(winner)
            }
            Err(InsertError::CapacityExceeded { limit }) => {
                handle.request_stop();
                Err(StartError::CapacityExceeded {
                    store: key.store().clone(),
                    limit,
                })
            }
        }
    }

    /// Terminates the worker behind `handle` if it belongs to `store_id`.
    ///
    /// Stopping a handle that is foreign, unknown, or already dead succeeds
    /// without side effects: "nothing to stop" is a benign terminal state.
    /// Waits for termination confirmation up to the configured
    /// `stop_timeout`; on timeout the registry is left as-is for a retry.
    pub async fn stop_listener(
        &self,
        store_id: &StoreId,
        handle: &ListenerHandle,
    ) -> Result<(), StopError> {
        if handle.key().store() != store_id {
            return Ok(());
        }
        if !handle.is_alive() {
            self.registry.remove_by_worker(handle.worker()).await;
            return Ok(());
        }

        self.bus.publish(
            Event::new(EventKind::ListenerStopRequested).with_worker(handle.worker()),
        );
        handle.request_stop();
        self.await_termination(handle).await?;

        if self.registry.remove_by_worker(handle.worker()).await.is_some() {
            self.publish_stopped(handle.worker(), handle.key());
        }
        Ok(())
    }

    /// Terminates every worker whose key matches `(store_id, stream_id)`,
    /// regardless of subscriber.
    ///
    /// Matching entries are snapshotted first, then each is cancelled and
    /// awaited. A `start_listener` racing in mid-sweep may or may not
    /// survive it; either way every terminated worker's entry is removed and
    /// every remaining entry corresponds to a live worker.
    pub async fn stop_listeners_for_stream(
        &self,
        store_id: &StoreId,
        stream_id: &str,
    ) -> Result<(), StopError> {
        let matched = self.registry.snapshot_stream(store_id, stream_id).await;

        for entry in &matched {
            self.bus.publish(
                Event::new(EventKind::ListenerStopRequested)
                    .with_worker(entry.handle.worker()),
            );
            entry.handle.request_stop();
        }

        let mut confirmed = 0usize;
        let mut result = Ok(());
        for entry in &matched {
            match self.await_termination(&entry.handle).await {
                Ok(()) => {
                    confirmed += 1;
                    if self
                        .registry
                        .remove_by_worker(entry.handle.worker())
                        .await
                        .is_some()
                    {
                        self.publish_stopped(entry.handle.worker(), entry.handle.key());
                    }
                }
                Err(err) => {
                    if result.is_ok() {
                        result = Err(err);
                    }
                }
            }
        }

        self.bus.publish(
            Event::new(EventKind::StreamSwept)
                .with_store(store_id.as_str())
                .with_stream(stream_id)
                .with_reason(format!("stopped={confirmed} of {}", matched.len())),
        );
        result
    }

    /// Aggregate counters for one store, computed from a single consistent
    /// registry snapshot.
    pub async fn stats(&self, store_id: &StoreId) -> ListenerStats {
        let snapshot = self.registry.snapshot(store_id).await;

        let mut stats = ListenerStats {
            total_listeners: snapshot.len(),
            ..Default::default()
        };
        for entry in &snapshot {
            let key = entry.handle.key();
            *stats
                .listeners_by_store
                .entry(key.store().clone())
                .or_insert(0) += 1;
            stats.active_streams.insert(key.stream().to_string());
        }
        stats
    }

    /// One row per live listener in the store; order is unspecified.
    pub async fn list_listeners(&self, store_id: &StoreId) -> Vec<ListenerInfo> {
        self.registry
            .snapshot(store_id)
            .await
            .into_iter()
            .map(|entry| {
                let key = entry.handle.key();
                ListenerInfo {
                    store_id: key.store().clone(),
                    stream_id: key.stream().to_string(),
                    subscriber: key.subscriber().clone(),
                    worker: entry.handle.worker(),
                    started_at: entry.started_at,
                }
            })
            .collect()
    }

    /// Cancels every worker and waits up to the configured grace period.
    ///
    /// Publishes `ShutdownRequested`, then `AllStoppedWithin` on success or
    /// `GraceExceeded` with the stuck keys on timeout. The supervisor is
    /// inert afterwards: workers spawned later are born cancelled and exit
    /// immediately.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.runtime_token.cancel();

        let entries = self.registry.snapshot_all().await;
        let grace = self.cfg.grace;
        let all_done = async {
            for entry in &entries {
                entry.handle.terminated().await;
            }
        };

        match time::timeout(grace, all_done).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                let stuck = self.registry.alive_keys().await;
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }

    /// Observes one worker's termination: classifies the exit, reaps the
    /// registry entry, publishes the terminal event. Exactly one of the
    /// monitor and an explicit stop wins the idempotent removal, so the
    /// terminal `ListenerStopped` is published once.
    fn spawn_monitor(&self, worker: WorkerId, join: JoinHandle<WorkerExit>) {
        let registry = Arc::clone(&self.registry);
        let bus = self.bus.clone();

        tokio::spawn(async move {
            let panic_info = match join.await {
                Ok(_exit) => None,
                Err(err) if err.is_panic() => Some(panic_message(err.into_panic())),
                Err(_) => Some("aborted".to_string()),
            };

            let removed = registry.remove_by_worker(worker).await;

            if let Some(info) = panic_info {
                tracing::warn!(worker = worker.as_u64(), %info, "listener worker crashed");
                bus.publish(
                    Event::new(EventKind::ListenerCrashed)
                        .with_worker(worker)
                        .with_reason(info),
                );
            } else if let Some(key) = removed {
                bus.publish(
                    Event::new(EventKind::ListenerStopped)
                        .with_worker(worker)
                        .with_store(key.store().as_str())
                        .with_stream(key.stream_arc())
                        .with_subscriber(key.subscriber().as_str()),
                );
            }
        });
    }

    async fn await_termination(&self, handle: &ListenerHandle) -> Result<(), StopError> {
        let timeout = self.cfg.stop_timeout;
        time::timeout(timeout, handle.terminated())
            .await
            .map_err(|_| StopError::Timeout {
                worker: handle.worker(),
                timeout,
            })
    }

    fn publish_reused(&self, handle: &ListenerHandle) {
        let key = handle.key();
        self.bus.publish(
            Event::new(EventKind::ListenerReused)
                .with_worker(handle.worker())
                .with_store(key.store().as_str())
                .with_stream(key.stream_arc())
                .with_subscriber(key.subscriber().as_str()),
        );
    }

    fn publish_stopped(&self, worker: WorkerId, key: &ListenerKey) {
        self.bus.publish(
            Event::new(EventKind::ListenerStopped)
                .with_worker(worker)
                .with_store(key.store().as_str())
                .with_stream(key.stream_arc())
                .with_subscriber(key.subscriber().as_str()),
        );
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::mpsc;

    use crate::error::FeedError;
    use crate::listeners::{ChannelSink, EventSink, SubscriberRef};
    use crate::store::{Feed, InMemoryEventStore, StoredEvent};

    fn supervisor(store: Arc<InMemoryEventStore>) -> Arc<Supervisor> {
        Supervisor::builder(SupervisorConfig::default(), store).build()
    }

    fn subscriber(name: &str) -> (SubscriberRef, mpsc::Receiver<StoredEvent>) {
        let (sink, rx) = ChannelSink::pair(64);
        (SubscriberRef::new(name, sink), rx)
    }

    fn listener(store: &str, stream: &str, name: &str) -> ListenerConfig {
        let (sub, _rx) = subscriber(name);
        ListenerConfig::new(store, stream, sub)
    }

    fn event(stream: &str, n: u64) -> StoredEvent {
        StoredEvent::new(stream, n, "recorded", Bytes::from_static(b"{}"))
    }

    /// Polls until the condition holds or a second passes.
    async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
        for _ in 0..100 {
            if cond() {
                return true;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        cond()
    }

    struct PanicSink;

    #[async_trait]
    impl EventSink for PanicSink {
        async fn deliver(&self, _event: StoredEvent) {
            panic!("sink blew up");
        }
    }

    struct BlockingSink;

    #[async_trait]
    impl EventSink for BlockingSink {
        async fn deliver(&self, _event: StoredEvent) {
            futures::future::pending::<()>().await;
        }
    }

    struct FailingStore;

    #[async_trait]
    impl crate::store::EventStore for FailingStore {
        async fn subscribe(
            &self,
            store_id: &StoreId,
            stream_id: &str,
        ) -> Result<Box<dyn Feed>, FeedError> {
            Err(FeedError::StreamUnavailable {
                store: store_id.clone(),
                stream: stream_id.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn sequential_starts_return_identical_handle() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));

        let first = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("first start");
        let second = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("second start");

        assert_eq!(first, second);
        assert_eq!(sup.stats(&"t".into()).await.total_listeners, 1);
    }

    #[tokio::test]
    async fn concurrent_starts_resolve_to_one_worker() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));

        let mut joins = Vec::new();
        for _ in 0..8 {
            let sup = Arc::clone(&sup);
            joins.push(tokio::spawn(async move {
                sup.start_listener(listener("t", "s", "sub")).await
            }));
        }

        let mut workers = Vec::new();
        for join in joins {
            let handle = join.await.expect("join").expect("start");
            workers.push(handle.worker());
        }
        workers.dedup();
        assert_eq!(workers.iter().collect::<std::collections::HashSet<_>>().len(), 1);
        assert_eq!(sup.stats(&"t".into()).await.total_listeners, 1);

        // Every losing racer's speculative feed gets released.
        assert!(eventually(|| store.live_feeds() == 1).await);
    }

    #[tokio::test]
    async fn respawn_after_feed_end_gets_fresh_worker() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        let first = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("start");

        store.close_stream(&sid, "s").await;
        first.terminated().await;
        assert!(!first.is_alive());

        let second = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("respawn");
        assert_ne!(first, second);
        assert!(second.is_alive());
    }

    #[tokio::test]
    async fn respawn_after_crash_gets_fresh_worker() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        let crashing = ListenerConfig::new(
            "t",
            "s",
            SubscriberRef::new("sub", Arc::new(PanicSink)),
        );
        let first = sup.start_listener(crashing).await.expect("start");

        store.append(&sid, "s", event("s", 0)).await;
        first.terminated().await;
        assert!(!first.is_alive());

        let second = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("respawn");
        assert_ne!(first, second);
        assert!(second.is_alive());
        assert_eq!(sup.stats(&sid).await.total_listeners, 1);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_benign() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        let handle = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("start");

        sup.stop_listener(&sid, &handle).await.expect("first stop");
        assert!(!handle.is_alive());

        // Stopping again, and stopping under the wrong store, both succeed.
        sup.stop_listener(&sid, &handle).await.expect("second stop");
        sup.stop_listener(&"other".into(), &handle)
            .await
            .expect("foreign stop");
        assert_eq!(sup.stats(&sid).await.total_listeners, 0);
    }

    #[tokio::test]
    async fn foreign_store_stop_leaves_listener_running() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));

        let handle = sup
            .start_listener(listener("t", "s", "sub"))
            .await
            .expect("start");

        sup.stop_listener(&"someone-else".into(), &handle)
            .await
            .expect("foreign stop");
        assert!(handle.is_alive());
        assert_eq!(sup.stats(&"t".into()).await.total_listeners, 1);
    }

    #[tokio::test]
    async fn stream_sweep_stops_every_subscriber() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        let mut swept = Vec::new();
        for name in ["one", "two", "three"] {
            swept.push(
                sup.start_listener(listener("t", "shared", name))
                    .await
                    .expect("start"),
            );
        }
        let survivor = sup
            .start_listener(listener("t", "elsewhere", "one"))
            .await
            .expect("start");

        sup.stop_listeners_for_stream(&sid, "shared")
            .await
            .expect("sweep");

        for handle in &swept {
            assert!(!handle.is_alive());
        }
        assert!(survivor.is_alive());

        let stats = sup.stats(&sid).await;
        assert_eq!(stats.total_listeners, 1);
        assert!(stats.active_streams.contains("elsewhere"));
        assert!(!stats.active_streams.contains("shared"));
    }

    #[tokio::test]
    async fn shared_stream_scenario() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "T".into();

        let mut handles = Vec::new();
        for name in ["sub-1", "sub-2", "sub-3"] {
            handles.push(
                sup.start_listener(listener("T", "shared-stream-456", name))
                    .await
                    .expect("start"),
            );
        }

        let stats = sup.stats(&sid).await;
        assert_eq!(stats.total_listeners, 3);
        assert_eq!(
            stats.active_streams,
            ["shared-stream-456".to_string()].into_iter().collect()
        );
        assert_eq!(stats.listeners_by_store.get(&sid), Some(&3));

        sup.stop_listeners_for_stream(&sid, "shared-stream-456")
            .await
            .expect("sweep");

        assert_eq!(sup.stats(&sid).await.total_listeners, 0);
        for handle in &handles {
            assert!(!handle.is_alive());
        }
    }

    #[tokio::test]
    async fn stats_count_streams_and_stores() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        for (stream, name) in [("s1", "a"), ("s1", "b"), ("s2", "c")] {
            sup.start_listener(listener("t", stream, name))
                .await
                .expect("start");
        }
        // A different store must not leak into t's stats.
        sup.start_listener(listener("u", "s9", "d"))
            .await
            .expect("start");

        let stats = sup.stats(&sid).await;
        assert_eq!(stats.total_listeners, 3);
        assert_eq!(
            stats.active_streams,
            ["s1".to_string(), "s2".to_string()].into_iter().collect()
        );
        assert_eq!(stats.listeners_by_store.get(&sid), Some(&3));
        assert_eq!(stats.listeners_by_store.len(), 1);

        let rows = sup.list_listeners(&sid).await;
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.store_id == sid));
    }

    #[tokio::test]
    async fn invalid_config_fails_before_subscribing() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));

        let result = sup.start_listener(listener("", "s", "sub")).await;
        assert!(matches!(
            result,
            Err(StartError::InvalidConfig { field: "store_id" })
        ));
        assert_eq!(store.live_feeds(), 0);
    }

    #[tokio::test]
    async fn subscribe_failure_registers_nothing() {
        let sup = Supervisor::builder(SupervisorConfig::default(), Arc::new(FailingStore)).build();

        let result = sup.start_listener(listener("t", "s", "sub")).await;
        assert!(matches!(result, Err(StartError::SpawnFailed(_))));
        assert_eq!(sup.stats(&"t".into()).await.total_listeners, 0);
    }

    #[tokio::test]
    async fn events_flow_to_the_subscriber_in_order() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        let (sub, mut rx) = subscriber("projector");
        sup.start_listener(ListenerConfig::new("t", "s", sub))
            .await
            .expect("start");

        for n in 0..3 {
            store.append(&sid, "s", event("s", n)).await;
        }
        for n in 0..3 {
            let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("delivery in time")
                .expect("event");
            assert_eq!(received.event_number, n);
        }
    }

    #[tokio::test]
    async fn per_store_cap_is_enforced() {
        let store = InMemoryEventStore::new();
        let cfg = SupervisorConfig {
            max_listeners_per_store: 1,
            ..Default::default()
        };
        let sup = Supervisor::builder(cfg, Arc::clone(&store) as Arc<dyn EventStore>).build();

        sup.start_listener(listener("t", "s1", "sub"))
            .await
            .expect("first fits");
        let result = sup.start_listener(listener("t", "s2", "sub")).await;
        assert!(matches!(
            result,
            Err(StartError::CapacityExceeded { limit: 1, .. })
        ));

        // The refused worker's feed is torn down with it.
        assert!(eventually(|| store.live_feeds() == 1).await);
    }

    #[tokio::test]
    async fn stop_times_out_on_a_wedged_worker() {
        let store = InMemoryEventStore::new();
        let cfg = SupervisorConfig {
            stop_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let sup = Supervisor::builder(cfg, Arc::clone(&store) as Arc<dyn EventStore>).build();
        let sid: StoreId = "t".into();

        let wedged = ListenerConfig::new(
            "t",
            "s",
            SubscriberRef::new("sub", Arc::new(BlockingSink)),
        );
        let handle = sup.start_listener(wedged).await.expect("start");

        // Park the worker inside a delivery that never completes.
        store.append(&sid, "s", event("s", 0)).await;
        time::sleep(Duration::from_millis(20)).await;

        let result = sup.stop_listener(&sid, &handle).await;
        assert!(matches!(result, Err(StopError::Timeout { .. })));
    }

    #[tokio::test]
    async fn shutdown_stops_everything_within_grace() {
        let store = InMemoryEventStore::new();
        let sup = supervisor(Arc::clone(&store));
        let sid: StoreId = "t".into();

        let a = sup
            .start_listener(listener("t", "s1", "sub"))
            .await
            .expect("start");
        let b = sup
            .start_listener(listener("t", "s2", "sub"))
            .await
            .expect("start");

        sup.shutdown().await.expect("graceful shutdown");
        assert!(!a.is_alive());
        assert!(!b.is_alive());
        assert_eq!(sup.stats(&sid).await.total_listeners, 0);
        assert!(eventually(|| store.live_feeds() == 0).await);
    }
}
