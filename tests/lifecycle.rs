use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use procvisor::{
    ActionError, ActionFn, Event, EventKind, FinalizeOutcome, Lifecycle, LifecycleConfig,
    RestartPolicy, Subscribe,
};

fn lifecycle() -> Arc<Lifecycle> {
    Lifecycle::builder(LifecycleConfig::default()).build()
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<EventKind>>,
}

impl Recorder {
    fn kinds(&self) -> Vec<EventKind> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.seen.lock().unwrap().push(event.kind);
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_scopes_drain_promptly() {
    let lc = lifecycle();

    let mut workers = Vec::new();
    for i in 0..64u64 {
        let scope = lc.register_scope();
        let ctx = lc.context();
        workers.push(tokio::spawn(async move {
            let _scope = scope;
            ctx.cancelled().await;
            tokio::time::sleep(Duration::from_millis(i % 5)).await;
        }));
    }
    assert_eq!(lc.in_flight(), 64);

    let started = Instant::now();
    let outcome = lc.finalize(Duration::from_secs(5), true).await;

    assert_eq!(outcome, FinalizeOutcome::Drained);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(lc.in_flight(), 0);
    for w in workers {
        w.await.unwrap();
    }
}

#[tokio::test]
async fn unreleased_scope_times_out() {
    let lc = lifecycle();
    let mut rx = lc.subscribe();
    let _stuck = lc.register_scope();

    let timeout = Duration::from_millis(50);
    let started = Instant::now();
    let outcome = lc.finalize(timeout, true).await;
    let took = started.elapsed();

    assert_eq!(outcome, FinalizeOutcome::TimedOut { outstanding: 1 });
    assert!(!outcome.is_drained());
    assert!(took >= timeout);
    assert!(took < Duration::from_secs(2));

    let mut timed_out = None;
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::DrainTimedOut {
            timed_out = Some(ev);
        }
    }
    let ev = timed_out.expect("DrainTimedOut published");
    assert_eq!(ev.in_flight, Some(1));
    assert_eq!(ev.timeout_ms, Some(50));
}

#[tokio::test]
async fn partially_released_scopes_report_the_rest() {
    let lc = lifecycle();
    let a = lc.register_scope();
    let b = lc.register_scope();
    let _c = lc.register_scope();

    a.release();
    drop(b);

    let outcome = lc.finalize(Duration::from_millis(50), true).await;
    assert_eq!(outcome, FinalizeOutcome::TimedOut { outstanding: 1 });
}

#[tokio::test]
async fn cancel_is_observed_once_and_is_idempotent() {
    let lc = lifecycle();
    let mut rx = lc.subscribe();
    let ctx = lc.context();
    let other = lc.context();

    assert!(!lc.is_cancelled());
    lc.cancel();
    lc.cancel();

    assert!(lc.is_cancelled());
    assert!(ctx.is_cancelled());
    assert!(other.is_cancelled());

    let mut cancels = 0;
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::CancelRequested {
            cancels += 1;
        }
    }
    assert_eq!(cancels, 1);
}

#[tokio::test]
async fn finalize_without_trigger_waits_for_external_cancel() {
    let lc = lifecycle();
    let canceller = Arc::clone(&lc);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let outcome = lc.finalize(Duration::from_secs(1), false).await;

    assert!(outcome.is_drained());
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn spawned_work_holds_a_scope() {
    let lc = lifecycle();
    let ctx = lc.context();
    let handle = lc.spawn(async move {
        ctx.cancelled().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        7
    });
    assert_eq!(lc.in_flight(), 1);

    assert!(lc.finalize(Duration::from_secs(1), true).await.is_drained());
    assert_eq!(handle.await.unwrap(), 7);
}

#[tokio::test]
async fn subscribers_see_every_event_before_finalize_returns() {
    let recorder = Arc::new(Recorder::default());
    let lc = Lifecycle::builder(LifecycleConfig::default())
        .with_subscriber(recorder.clone())
        .build();

    let job = ActionFn::arc("job", || async { Err::<(), _>(ActionError::fail("nope")) });
    let chain = lc.supervisor().supervise(job, RestartPolicy::disabled()).await;
    assert!(chain.is_none());

    let once = ActionFn::arc("once", || async { Err::<(), _>(ActionError::fail("nope")) });
    let policy = RestartPolicy::limited(1).with_period(Duration::from_millis(1));
    lc.supervisor().supervise(once, policy).await.unwrap().await.unwrap();

    let outcome = lc.finalize(Duration::from_millis(100), true).await;
    assert!(outcome.is_drained());

    let kinds = recorder.kinds();
    assert_eq!(
        kinds,
        vec![
            EventKind::AttemptStarting,
            EventKind::ActionFailed,
            EventKind::RestartScheduled,
            EventKind::AttemptStarting,
            EventKind::ActionFailed,
            EventKind::CancelRequested,
            EventKind::DrainStarted,
            EventKind::DrainCompleted,
        ]
    );
}

#[tokio::test]
async fn lifecycle_supervisor_drops_restarts_on_cancel() {
    let lc = lifecycle();
    let job = ActionFn::arc("retry", || async { Err::<(), _>(ActionError::fail("down")) });
    let policy = RestartPolicy::unbounded().with_period(Duration::from_secs(60));

    let chain = lc.supervisor().supervise(job, policy).await.unwrap();
    lc.finalize(Duration::from_millis(10), true).await;

    tokio::time::timeout(Duration::from_secs(1), chain)
        .await
        .expect("chain ends once the root context is cancelled")
        .unwrap();
}

#[tokio::test]
async fn timer_scope_reports_through_the_lifecycle_bus() {
    let lc = lifecycle();
    let mut rx = lc.subscribe();

    {
        let _t = lc.timer("load").with_ops(10);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let started = rx.try_recv().unwrap();
    assert_eq!(started.kind, EventKind::TimerStarted);
    let elapsed = rx.try_recv().unwrap();
    assert_eq!(elapsed.kind, EventKind::TimerElapsed);
    assert_eq!(elapsed.task.as_deref(), Some("load"));
    assert_eq!(elapsed.ops, Some(10));
    assert!(elapsed.elapsed.unwrap() >= Duration::from_millis(5));
}
