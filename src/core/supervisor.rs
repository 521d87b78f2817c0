//! # Supervisor: keeps a fallible action alive with bounded restarts.
//!
//! [`Supervisor::supervise`] runs the **first** attempt inline. If it fails and the
//! [`RestartPolicy`] still has budget, the rest of the chain is handed to a freshly
//! spawned tokio task, so the caller is never held past the first attempt.
//!
//! ## Architecture
//! ```text
//! supervise(action, policy)
//!   ├─► intensity == 0 ──► return None             (never invoked)
//!   ├─► run_attempt(#1)
//!   │     ├─ Ok  ──► return None                   (no loop on success)
//!   │     └─ Err ──► policy.consume()
//!   │                  ├─ None ──► return None     (budget spent)
//!   │                  └─ Some(next) ──► publish RestartScheduled
//!   │                                    spawn RestartChain { next }
//!   └─► return Some(JoinHandle)
//!
//! RestartChain::run (background task)
//! loop {
//!   ├─► sleep(period)            (cancellable when bound to a context)
//!   ├─► run_attempt(#n)
//!   │     ├─ Ok  ──► exit
//!   │     └─ Err ──► policy.consume() ─► None: exit / Some: publish RestartScheduled
//! }
//! ```
//!
//! ## Rules
//! - `intensity = N > 0` with an always-failing action gives exactly `N + 1` attempts.
//! - A negative intensity restarts forever; it is never decremented.
//! - Running out of budget is silent: the last failure event is the final report.
//! - A bound context only stops **pending** restarts; a running attempt is never aborted.
//! - A standalone supervisor writes every failure to `tracing` itself (feature `logging`).
//!   One taken from a [`Lifecycle`](crate::Lifecycle) leaves that to the lifecycle's subscribers.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use procvisor::{ActionError, ActionFn, ActionRef, Bus, RestartPolicy, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sup = Supervisor::new(Bus::default());
//!
//!     let job: ActionRef = ActionFn::arc("job", || async {
//!         Err::<(), _>(ActionError::fail("not yet"))
//!     });
//!
//!     let policy = RestartPolicy::limited(2).with_period(Duration::from_millis(5));
//!     if let Some(chain) = sup.supervise(job, policy).await {
//!         chain.await.ok();
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::{select, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    actions::ActionRef,
    core::attempt::run_attempt,
    events::{Bus, Event, EventKind},
    policies::RestartPolicy,
};

/// Restart-on-failure supervisor.
///
/// Cheap to clone; all clones publish to the same [`Bus`].
#[derive(Clone, Debug)]
pub struct Supervisor {
    bus: Bus,
    token: Option<CancellationToken>,
    restart: RestartPolicy,
    log: bool,
}

impl Supervisor {
    /// Creates an unbound supervisor publishing to `bus`.
    pub fn new(bus: Bus) -> Self {
        Self {
            bus,
            token: None,
            restart: RestartPolicy::default(),
            log: true,
        }
    }

    /// Turns direct `tracing` output for failures on or off (on by default).
    #[must_use]
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Binds pending restarts to `token`: once it is cancelled no new attempt starts.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the policy used by [`supervise_default`](Self::supervise_default).
    #[must_use]
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Event bus used by this supervisor.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Supervises `action` with the supervisor's default policy.
    pub async fn supervise_default(&self, action: ActionRef) -> Option<JoinHandle<()>> {
        self.supervise(action, self.restart).await
    }

    /// Runs `action` once and, on failure, schedules restarts in the background.
    ///
    /// Returns the handle of the background restart chain when one was spawned.
    /// Dropping the handle detaches the chain; it keeps running.
    pub async fn supervise(
        &self,
        action: ActionRef,
        policy: RestartPolicy,
    ) -> Option<JoinHandle<()>> {
        if policy.is_exhausted() {
            return None;
        }

        let attempt = 1;
        if run_attempt(action.as_ref(), attempt, &self.bus, self.log)
            .await
            .is_ok()
        {
            return None;
        }

        let next = policy.consume()?;
        let chain = RestartChain {
            action,
            policy: next,
            attempt,
            bus: self.bus.clone(),
            token: self.token.clone(),
            log: self.log,
        };
        chain.announce();
        Some(tokio::spawn(chain.run()))
    }
}

/// Remaining restarts for one action, carried into the background task.
struct RestartChain {
    action: ActionRef,
    policy: RestartPolicy,
    attempt: u32,
    bus: Bus,
    token: Option<CancellationToken>,
    log: bool,
}

impl RestartChain {
    async fn run(mut self) {
        loop {
            if !self.wait(self.policy.period()).await {
                self.bus.publish(
                    Event::new(EventKind::RestartAbandoned)
                        .with_task(self.action.name())
                        .with_attempt(self.attempt),
                );
                return;
            }

            self.attempt = self.attempt.saturating_add(1);
            if run_attempt(self.action.as_ref(), self.attempt, &self.bus, self.log)
                .await
                .is_ok()
            {
                return;
            }

            match self.policy.consume() {
                Some(next) => {
                    self.policy = next;
                    self.announce();
                }
                None => return,
            }
        }
    }

    /// Publishes `RestartScheduled` for the restart about to happen.
    fn announce(&self) {
        self.bus.publish(
            Event::new(EventKind::RestartScheduled)
                .with_task(self.action.name())
                .with_attempt(self.attempt)
                .with_delay(self.policy.period())
                .with_remaining(self.policy.remaining()),
        );
    }

    /// Sleeps `delay`; returns `false` if the bound context was cancelled first.
    async fn wait(&self, delay: Duration) -> bool {
        match &self.token {
            None => {
                time::sleep(delay).await;
                true
            }
            Some(token) => {
                let sleep = time::sleep(delay);
                tokio::pin!(sleep);
                select! {
                    biased;
                    _ = token.cancelled() => false,
                    _ = &mut sleep => true,
                }
            }
        }
    }
}
