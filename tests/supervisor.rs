use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use procvisor::{
    ActionError, ActionFn, ActionRef, Bus, Event, EventKind, RestartPolicy, Supervisor,
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

fn count(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

fn counting_failure(name: &'static str, calls: Arc<AtomicU32>) -> ActionRef {
    ActionFn::arc(name, move || {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err::<(), _>(ActionError::fail(format!("failure #{n}")))
        }
    })
}

fn explode(n: u32) -> Result<(), ActionError> {
    panic!("panic #{n}")
}

#[tokio::test]
async fn zero_intensity_never_invokes_the_action() {
    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let calls = Arc::new(AtomicU32::new(0));

    let chain = Supervisor::new(bus)
        .supervise(
            counting_failure("never", Arc::clone(&calls)),
            RestartPolicy::disabled(),
        )
        .await;

    assert!(chain.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn always_failing_action_runs_intensity_plus_one_times() {
    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let stamps = Arc::new(Mutex::new(Vec::<Instant>::new()));

    let seen = Arc::clone(&stamps);
    let action: ActionRef = ActionFn::arc("flaky", move || {
        let seen = Arc::clone(&seen);
        async move {
            seen.lock().unwrap().push(Instant::now());
            Err::<(), _>(ActionError::fail("boom"))
        }
    });

    let period = Duration::from_millis(10);
    let policy = RestartPolicy::new(2, period);
    let chain = Supervisor::new(bus).supervise(action, policy).await;
    chain.expect("restart chain spawned").await.unwrap();

    let stamps = stamps.lock().unwrap().clone();
    assert_eq!(stamps.len(), 3);
    for pair in stamps.windows(2) {
        assert!(pair[1] - pair[0] >= period, "restart came too early");
    }

    let events = drain(&mut rx);
    assert_eq!(count(&events, EventKind::ActionFailed), 3);
    assert_eq!(count(&events, EventKind::RestartScheduled), 2);
    assert_eq!(count(&events, EventKind::AttemptStarting), 3);

    let failures: Vec<_> = events.iter().filter(|e| e.is_failure()).collect();
    assert!(failures.iter().all(|e| e.reason.as_deref() == Some("boom")));
    assert_eq!(
        failures.iter().map(|e| e.attempt).collect::<Vec<_>>(),
        vec![Some(1), Some(2), Some(3)]
    );
}

#[tokio::test]
async fn intensity_one_allows_exactly_one_restart() {
    let calls = Arc::new(AtomicU32::new(0));
    let policy = RestartPolicy::limited(1).with_period(Duration::from_millis(1));

    let chain = Supervisor::new(Bus::default())
        .supervise(counting_failure("once-more", Arc::clone(&calls)), policy)
        .await;
    chain.unwrap().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn success_on_first_attempt_runs_once() {
    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let calls = Arc::new(AtomicU32::new(0));

    let c = Arc::clone(&calls);
    let action: ActionRef = ActionFn::arc("fine", move || {
        let c = Arc::clone(&c);
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    let chain = Supervisor::new(bus)
        .supervise(action, RestartPolicy::limited(5))
        .await;

    assert!(chain.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let events = drain(&mut rx);
    assert_eq!(count(&events, EventKind::ActionSucceeded), 1);
    assert_eq!(count(&events, EventKind::RestartScheduled), 0);
}

#[tokio::test]
async fn chain_stops_once_an_attempt_succeeds() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    let action: ActionRef = ActionFn::arc("recovering", move || {
        let c = Arc::clone(&c);
        async move {
            if c.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ActionError::fail("cold start"))
            } else {
                Ok(())
            }
        }
    });

    let policy = RestartPolicy::limited(5).with_period(Duration::from_millis(1));
    let chain = Supervisor::new(Bus::default()).supervise(action, policy).await;
    chain.unwrap().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn panics_are_recovered_and_restarted_like_errors() {
    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let calls = Arc::new(AtomicU32::new(0));

    let c = Arc::clone(&calls);
    let action: ActionRef = ActionFn::arc("panicky", move || {
        let c = Arc::clone(&c);
        async move {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= 2 { explode(n) } else { Ok(()) }
        }
    });

    let policy = RestartPolicy::unbounded().with_period(Duration::from_millis(1));
    let chain = Supervisor::new(bus).supervise(action, policy).await;
    chain.expect("first attempt panicked").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let events = drain(&mut rx);
    let panics: Vec<_> = events
        .iter()
        .filter(|e| e.kind == EventKind::ActionPanicked)
        .collect();
    assert_eq!(panics.len(), 2);
    assert_eq!(panics[0].reason.as_deref(), Some("panic #1"));
    assert_eq!(count(&events, EventKind::RestartScheduled), 2);
    assert_eq!(count(&events, EventKind::ActionSucceeded), 1);
}

#[tokio::test]
async fn negative_intensity_keeps_restarting() {
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();
    let sup = Supervisor::new(Bus::default()).with_cancellation(token.clone());

    let policy = RestartPolicy::new(-1, Duration::from_millis(1));
    let chain = sup
        .supervise(counting_failure("forever", Arc::clone(&calls)), policy)
        .await
        .expect("restart chain spawned");

    let deadline = Instant::now() + Duration::from_secs(5);
    while calls.load(Ordering::SeqCst) < 6 {
        assert!(Instant::now() < deadline, "fewer than 5 restarts in 5s");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    token.cancel();
    tokio::time::timeout(Duration::from_secs(1), chain)
        .await
        .expect("chain stops after cancellation")
        .unwrap();
}

#[tokio::test]
async fn cancellation_abandons_a_pending_restart() {
    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();
    let sup = Supervisor::new(bus).with_cancellation(token.clone());

    let policy = RestartPolicy::limited(3).with_period(Duration::from_secs(60));
    let chain = sup
        .supervise(counting_failure("slow", Arc::clone(&calls)), policy)
        .await
        .expect("restart chain spawned");

    token.cancel();
    tokio::time::timeout(Duration::from_secs(1), chain)
        .await
        .expect("pending restart dropped promptly")
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let events = drain(&mut rx);
    assert_eq!(count(&events, EventKind::RestartAbandoned), 1);
}

#[tokio::test]
async fn supervise_default_uses_configured_policy() {
    let calls = Arc::new(AtomicU32::new(0));
    let sup = Supervisor::new(Bus::default())
        .with_restart(RestartPolicy::limited(3).with_period(Duration::from_millis(1)));

    let chain = sup
        .supervise_default(counting_failure("defaults", Arc::clone(&calls)))
        .await;
    chain.unwrap().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}
