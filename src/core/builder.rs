//! # Builder wiring the supervisor's runtime components.
//!
//! Constructs the bus, the registry, the observer fan-out and the runtime
//! cancellation token, then assembles the [`Supervisor`]. Must run within a
//! Tokio runtime: observer workers and the bus→observer pump are spawned
//! eagerly.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::core::config::SupervisorConfig;
use crate::core::registry::Registry;
use crate::core::supervisor::Supervisor;
use crate::events::Bus;
use crate::observers::{Observer, ObserverSet};
use crate::store::EventStore;

/// Builder for constructing a [`Supervisor`] with optional observers.
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    store: Arc<dyn EventStore>,
    observers: Vec<Arc<dyn Observer>>,
}

impl SupervisorBuilder {
    pub(crate) fn new(cfg: SupervisorConfig, store: Arc<dyn EventStore>) -> Self {
        Self {
            cfg,
            store,
            observers: Vec::new(),
        }
    }

    /// Sets event observers for observability.
    ///
    /// Observers receive runtime events (listener lifecycle, crashes, sweep
    /// progress) through dedicated workers with bounded queues.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observer>>) -> Self {
        self.observers = observers;
        self
    }

    /// Adds a single observer to the set.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds and returns the supervisor.
    ///
    /// Initializes all runtime components: the event bus, the registry, the
    /// observer workers and the pump forwarding bus events into them.
    pub fn build(self) -> Arc<Supervisor> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let runtime_token = CancellationToken::new();
        let registry = Arc::new(Registry::new(self.cfg.listener_cap()));

        let set = ObserverSet::new(self.observers, bus.clone());
        spawn_observer_pump(&bus, set, runtime_token.clone());

        Arc::new(Supervisor::new_internal(
            self.cfg,
            self.store,
            bus,
            registry,
            runtime_token,
        ))
    }
}

/// Forwards bus events into the observer set until the runtime stops.
///
/// On cancellation the pump drains whatever is already queued (best effort)
/// and shuts the observer workers down.
fn spawn_observer_pump(bus: &Bus, set: ObserverSet, token: CancellationToken) {
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(Arc::new(ev)),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        }

        while let Ok(ev) = rx.try_recv() {
            set.emit(Arc::new(ev));
        }
        set.shutdown().await;
    });
}
