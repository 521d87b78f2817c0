//! # Example: Supervising a flaky action
//!
//! The action fails twice, panics once, then succeeds.
//! Restarts are spaced by a fixed period; a custom subscriber prints each event.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use procvisor::{
    ActionError, ActionFn, ActionRef, Event, EventKind, Lifecycle, LifecycleConfig,
    RestartPolicy, Subscribe,
};

struct Printer;

#[async_trait]
impl Subscribe for Printer {
    async fn on_event(&self, ev: &Event) {
        let task = ev.task.as_deref().unwrap_or("-");
        match ev.kind {
            EventKind::AttemptStarting => {
                println!("[{task}] attempt #{}", ev.attempt.unwrap_or(0));
            }
            EventKind::ActionFailed | EventKind::ActionPanicked => {
                println!(
                    "[{task}] {:?}: {}",
                    ev.kind,
                    ev.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::RestartScheduled => {
                println!(
                    "[{task}] restart in {}ms (left: {:?})",
                    ev.delay_ms.unwrap_or(0),
                    ev.remaining
                );
            }
            EventKind::ActionSucceeded => println!("[{task}] ok"),
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "printer"
    }
}

fn flaky(calls: Arc<AtomicU32>) -> ActionRef {
    ActionFn::arc("flaky", move || {
        let calls = Arc::clone(&calls);
        async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err(ActionError::fail("upstream unavailable")),
                2 => panic!("corrupted state"),
                _ => Ok(()),
            }
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = LifecycleConfig {
        listen_signals: false,
        ..LifecycleConfig::default()
    };
    let lc = Lifecycle::builder(cfg)
        .with_subscriber(Arc::new(Printer))
        .build();

    let calls = Arc::new(AtomicU32::new(0));
    let policy = RestartPolicy::limited(5).with_period(Duration::from_millis(200));
    if let Some(chain) = lc.supervisor().supervise(flaky(Arc::clone(&calls)), policy).await {
        chain.await?;
    }
    println!("invocations: {}", calls.load(Ordering::SeqCst));

    lc.finalize(Duration::from_secs(1), true).await;
    Ok(())
}
