//! # Example: Long-running service with graceful shutdown
//!
//! Installs the process-wide lifecycle, starts a few workers that each hold a scope,
//! and drains them on Ctrl-C (or after a few seconds when left alone).
//!
//! ```text
//! cargo run --example service
//! RUST_LOG=debug cargo run --example service
//! ```

use std::{sync::Arc, time::Duration};

use procvisor::{Lifecycle, LifecycleConfig};
use tracing_subscriber::EnvFilter;

async fn worker(id: u32, ctx: tokio_util::sync::CancellationToken) {
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = ctx.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_millis(300 + u64::from(id) * 100)) => {
                ticks += 1;
                tracing::info!(worker = id, ticks, "tick");
            }
        }
    }
    // Simulated cleanup after cancellation.
    tokio::time::sleep(Duration::from_millis(150)).await;
    tracing::info!(worker = id, ticks, "stopped");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = LifecycleConfig {
        drain_timeout: Duration::from_secs(2),
        ..LifecycleConfig::default()
    };
    // `log_events` is on by default, so a LogWriter is attached without asking.
    let lc = Lifecycle::builder(cfg).install()?;

    for id in 0..3 {
        let ctx = lc.context();
        lc.spawn(worker(id, ctx));
    }

    // Stop on our own if nobody presses Ctrl-C.
    let auto = Arc::clone(&lc);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        auto.cancel();
    });

    let outcome = procvisor::finalize(lc.config().drain_timeout(), false).await?;
    println!("shutdown: {outcome:?}");
    Ok(())
}
