//! # Basic listeners demo
//!
//! Starts a listener, shows the reuse contract (a second start for the same
//! key returns the identical handle), forwards a few events into a mailbox,
//! and stops the listener.
//!
//! ## Run
//! ```bash
//! cargo run --example basic_listeners --features "logging"
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use streamvisor::{
    ChannelSink, InMemoryEventStore, ListenerConfig, LogWriter, StoredEvent, SubscriberRef,
    Supervisor, SupervisorConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = InMemoryEventStore::new();
    let sup = Supervisor::builder(SupervisorConfig::default(), store.clone())
        .with_observer(Arc::new(LogWriter))
        .build();

    let tenant = "tenant-a";
    let stream = "greenhouse-42";

    let (sink, mut inbox) = ChannelSink::pair(64);
    let handle = sup
        .start_listener(ListenerConfig::new(
            tenant,
            stream,
            SubscriberRef::new("console", sink),
        ))
        .await?;
    println!("started listener {}", handle.worker());

    // The same key resolves to the same worker while it is alive.
    let (sink2, _inbox2) = ChannelSink::pair(64);
    let again = sup
        .start_listener(ListenerConfig::new(
            tenant,
            stream,
            SubscriberRef::new("console", sink2),
        ))
        .await?;
    println!("second start reused {}", again.worker());
    assert_eq!(handle, again);

    for n in 0..3u64 {
        store
            .append(
                &tenant.into(),
                stream,
                StoredEvent::new(stream, n, "sensor-reading", Bytes::from_static(b"{\"c\":21}")),
            )
            .await;
    }

    for _ in 0..3 {
        if let Some(event) = inbox.recv().await {
            println!(
                "delivered {} #{} on {}",
                event.event_type, event.event_number, event.stream_id
            );
        }
    }

    sup.stop_listener(&tenant.into(), &handle).await?;
    println!("listener alive after stop: {}", handle.is_alive());

    // Give the log observer a beat to flush its queue.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
