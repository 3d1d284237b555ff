//! # Stream sweep demo
//!
//! Registers three subscribers on one shared stream, prints the store's
//! stats, then sweeps the stream and prints them again.
//!
//! ## Run
//! ```bash
//! cargo run --example stream_sweep --features "logging"
//! ```

use std::sync::Arc;
use std::time::Duration;

use streamvisor::{
    ChannelSink, InMemoryEventStore, ListenerConfig, LogWriter, StoreId, SubscriberRef,
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
    let sup = Supervisor::builder(SupervisorConfig::default(), store)
        .with_observer(Arc::new(LogWriter))
        .build();

    let tenant: StoreId = "tenant-a".into();
    let stream = "poll-results";

    for name in ["tally", "audit", "mailer"] {
        let (sink, _inbox) = ChannelSink::pair(16);
        sup.start_listener(ListenerConfig::new(
            tenant.as_str(),
            stream,
            SubscriberRef::new(name, sink),
        ))
        .await?;
    }

    let stats = sup.stats(&tenant).await;
    println!(
        "before sweep: total={} streams={:?}",
        stats.total_listeners, stats.active_streams
    );
    for row in sup.list_listeners(&tenant).await {
        println!("  {} ← {} ({})", row.stream_id, row.subscriber, row.worker);
    }

    sup.stop_listeners_for_stream(&tenant, stream).await?;

    let stats = sup.stats(&tenant).await;
    println!(
        "after sweep:  total={} streams={:?}",
        stats.total_listeners, stats.active_streams
    );

    sup.shutdown().await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
