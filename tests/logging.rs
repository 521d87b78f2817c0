#![cfg(feature = "logging")]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use procvisor::{
    ActionError, ActionFn, ActionRef, Bus, Lifecycle, LifecycleConfig, LogWriter,
    RestartPolicy, Supervisor,
};
use tracing_subscriber::util::SubscriberInitExt;

/// Shared buffer the fmt layer writes into.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.contains(needle))
            .collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes `tracing` output of the current thread into a buffer.
///
/// Tests run on the current-thread runtime so spawned workers log through it too.
fn capture() -> (Captured, tracing::subscriber::DefaultGuard) {
    let out = Captured::default();
    let writer = out.clone();
    let guard = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish()
        .set_default();
    (out, guard)
}

fn always_failing() -> ActionRef {
    ActionFn::arc("flaky", || async {
        Err::<(), _>(ActionError::fail("connection refused"))
    })
}

#[tokio::test]
async fn default_lifecycle_logs_each_failure_and_the_drain_timeout() {
    let (out, _guard) = capture();
    let lc = Lifecycle::builder(LifecycleConfig::default()).build();

    let policy = RestartPolicy::limited(2).with_period(Duration::from_millis(10));
    lc.supervisor()
        .supervise(always_failing(), policy)
        .await
        .expect("restart chain spawned")
        .await
        .unwrap();

    let a = lc.register_scope();
    let b = lc.register_scope();
    let _c = lc.register_scope();
    a.release();
    drop(b);
    let outcome = lc.finalize(Duration::from_millis(50), true).await;
    assert!(!outcome.is_drained());

    let failures = out.matching("action failed");
    assert_eq!(failures.len(), 3, "{failures:#?}");
    assert!(failures.iter().all(|l| l.contains("connection refused")));
    assert!(failures.iter().all(|l| l.contains("WARN")));

    let timeouts = out.matching("drain timed out");
    assert_eq!(timeouts.len(), 1, "{:#?}", out.lines());
    assert!(timeouts[0].contains("ERROR"));
    assert!(timeouts[0].contains("in_flight=1"));
}

#[tokio::test]
async fn explicit_log_writer_is_not_doubled() {
    let (out, _guard) = capture();
    let lc = Lifecycle::builder(LifecycleConfig::default())
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    let policy = RestartPolicy::limited(1).with_period(Duration::from_millis(1));
    lc.supervisor()
        .supervise(always_failing(), policy)
        .await
        .unwrap()
        .await
        .unwrap();
    lc.finalize(Duration::from_millis(10), true).await;

    assert_eq!(out.matching("action failed").len(), 2);
}

#[tokio::test]
async fn standalone_supervisor_logs_failures_itself() {
    let (out, _guard) = capture();
    let policy = RestartPolicy::limited(2).with_period(Duration::from_millis(1));

    Supervisor::new(Bus::default())
        .supervise(always_failing(), policy)
        .await
        .unwrap()
        .await
        .unwrap();

    let failures = out.matching("action failed");
    assert_eq!(failures.len(), 3);
    assert!(failures.iter().all(|l| l.contains("connection refused")));
}

#[tokio::test]
async fn logging_can_be_switched_off() {
    let (out, _guard) = capture();
    let cfg = LifecycleConfig {
        log_events: false,
        ..LifecycleConfig::default()
    };
    let lc = Lifecycle::builder(cfg).build();
    let _stuck = lc.register_scope();

    let policy = RestartPolicy::limited(1).with_period(Duration::from_millis(1));
    lc.supervisor()
        .supervise(always_failing(), policy)
        .await
        .unwrap()
        .await
        .unwrap();
    lc.finalize(Duration::from_millis(20), true).await;

    Supervisor::new(Bus::default())
        .with_logging(false)
        .supervise(always_failing(), policy)
        .await
        .unwrap()
        .await
        .unwrap();

    assert!(out.lines().is_empty(), "{:#?}", out.lines());
}
