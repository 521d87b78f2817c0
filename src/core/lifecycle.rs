//! # Lifecycle: one shutdown signal and one in-flight tally per process.
//!
//! The [`Lifecycle`] owns the root [`CancellationToken`], the [`ScopeSet`] of in-flight
//! work, and the event [`Bus`] with its subscriber forwarder.
//!
//! ## State machine
//! ```text
//! Active ──(finalize(.., true) | cancel() | termination signal)──► Cancelled
//! ```
//! `Cancelled` is terminal; cancelling again has no effect.
//!
//! ## Shutdown path
//! ```text
//! signal hook / cancel()
//!     └─► token.cancel()  → every observer of context() sees cancellation
//!
//! finalize(timeout, trigger_cancel):
//!     ├─► trigger_cancel? → cancel()
//!     ├─► wait token.cancelled()
//!     ├─► publish DrainStarted
//!     ├─► scopes.drain(timeout)
//!     │      ├─ Ok  → publish DrainCompleted → Drained
//!     │      └─ Err → publish DrainTimedOut  → TimedOut { outstanding }
//!     └─► flush forwarder (subscribers see everything published so far)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use procvisor::{FinalizeOutcome, Lifecycle, LifecycleConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let lc = Lifecycle::builder(LifecycleConfig::default()).build();
//!
//!     let scope = lc.register_scope();
//!     let ctx = lc.context();
//!     tokio::spawn(async move {
//!         let _scope = scope;
//!         ctx.cancelled().await;
//!     });
//!
//!     let outcome = lc.finalize(Duration::from_secs(1), true).await;
//!     assert_eq!(outcome, FinalizeOutcome::Drained);
//! }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::LifecycleConfig;
use crate::core::builder::LifecycleBuilder;
use crate::core::scope::{ScopeGuard, ScopeSet};
use crate::core::shutdown::on_signal;
use crate::core::supervisor::Supervisor;
use crate::core::timer::TimerScope;
use crate::error::LifecycleError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::SubscriberSet;

/// Upper bound on how long `finalize` waits for subscribers to catch up.
const FLUSH_GRACE: Duration = Duration::from_secs(1);

/// Result of [`Lifecycle::finalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// All scopes were released within the timeout.
    Drained,
    /// The timeout elapsed; `outstanding` scopes were still registered.
    TimedOut {
        /// Scopes still registered when the timeout fired.
        outstanding: usize,
    },
}

impl FinalizeOutcome {
    /// Returns `true` for [`FinalizeOutcome::Drained`].
    pub fn is_drained(&self) -> bool {
        matches!(self, FinalizeOutcome::Drained)
    }
}

/// Bus → SubscriberSet forwarding task.
struct Forwarder {
    stop: CancellationToken,
    join: JoinHandle<()>,
}

impl Forwarder {
    fn spawn(bus: &Bus, set: SubscriberSet) -> Self {
        let mut rx = bus.subscribe();
        let stop = CancellationToken::new();
        let stopped = stop.clone();

        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = stopped.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
            // publish is synchronous: everything sent before `stop` is already queued
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
            set.shutdown().await;
        });
        Self { stop, join }
    }
}

/// Process-wide cancellation context plus counted drain.
pub struct Lifecycle {
    cfg: LifecycleConfig,
    token: CancellationToken,
    scopes: ScopeSet,
    bus: Bus,
    forwarder: Mutex<Option<Forwarder>>,
    signals_wired: AtomicBool,
}

impl Lifecycle {
    /// Starts building a lifecycle.
    pub fn builder(cfg: LifecycleConfig) -> LifecycleBuilder {
        LifecycleBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: LifecycleConfig,
        bus: Bus,
        subs: Option<SubscriberSet>,
    ) -> Arc<Self> {
        let forwarder = subs.map(|set| Forwarder::spawn(&bus, set));
        Arc::new(Self {
            cfg,
            token: CancellationToken::new(),
            scopes: ScopeSet::new(),
            bus,
            forwarder: Mutex::new(forwarder),
            signals_wired: AtomicBool::new(false),
        })
    }

    /// Configuration this lifecycle was built with.
    pub fn config(&self) -> &LifecycleConfig {
        &self.cfg
    }

    /// The shared root context; clones observe the same cancellation.
    pub fn context(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancels the root context (idempotent).
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            self.bus.publish(Event::new(EventKind::CancelRequested));
        }
        self.token.cancel();
    }

    /// Returns `true` once the root context is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Registers one unit of in-flight work; drop the guard when the work is done.
    pub fn register_scope(&self) -> ScopeGuard {
        self.scopes.register()
    }

    /// Number of registered scopes.
    pub fn in_flight(&self) -> usize {
        self.scopes.len()
    }

    /// Spawns `fut` on the runtime with a scope held for its whole run.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let scope = self.register_scope();
        tokio::spawn(async move {
            let _scope = scope;
            fut.await
        })
    }

    /// Supervisor publishing to this lifecycle's bus; pending restarts stop on cancellation.
    ///
    /// Failures are logged by the lifecycle's subscribers, not by the supervisor.
    pub fn supervisor(&self) -> Supervisor {
        Supervisor::new(self.bus.clone())
            .with_cancellation(self.token.clone())
            .with_restart(self.cfg.restart)
            .with_logging(false)
    }

    /// Starts a timer scope that reports through this lifecycle's bus.
    #[track_caller]
    pub fn timer(&self, name: impl Into<std::borrow::Cow<'static, str>>) -> TimerScope {
        TimerScope::start(&self.bus, name)
    }

    /// Event bus of this lifecycle.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Raw receiver of every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Cancels the root context on the first signal of `config().signals`.
    ///
    /// Wired at most once; later calls are no-ops. Must be called inside a tokio runtime.
    pub fn listen_for_signals(&self) -> Result<(), LifecycleError> {
        if self.signals_wired.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let token = self.token.clone();
        let bus = self.bus.clone();
        let wired = on_signal(&self.cfg.signals, move || {
            bus.publish(Event::new(EventKind::ShutdownRequested));
            token.cancel();
        });
        if wired.is_err() {
            self.signals_wired.store(false, Ordering::Release);
        }
        wired.map(|_| ())
    }

    /// Waits for cancellation, then for all scopes (at most `timeout`).
    ///
    /// With `trigger_cancel`, the root context is cancelled first. A timeout is
    /// reported through `DrainTimedOut`; registered work is never aborted.
    pub async fn finalize(&self, timeout: Duration, trigger_cancel: bool) -> FinalizeOutcome {
        if trigger_cancel {
            self.cancel();
        }
        self.token.cancelled().await;

        self.bus.publish(
            Event::new(EventKind::DrainStarted)
                .with_in_flight(self.scopes.len())
                .with_timeout(timeout),
        );
        let outcome = match self.scopes.drain(timeout).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::DrainCompleted));
                FinalizeOutcome::Drained
            }
            Err(outstanding) => {
                self.bus.publish(
                    Event::new(EventKind::DrainTimedOut)
                        .with_in_flight(outstanding)
                        .with_timeout(timeout),
                );
                FinalizeOutcome::TimedOut { outstanding }
            }
        };
        self.flush().await;
        outcome
    }

    /// [`finalize`](Self::finalize) with `config().drain_timeout`, waiting for an external cancel.
    pub async fn finalize_default(&self) -> FinalizeOutcome {
        self.finalize(self.cfg.drain_timeout(), false).await
    }

    /// Stops the forwarder after it delivered everything published so far.
    async fn flush(&self) {
        let Some(fwd) = self.forwarder.lock().await.take() else {
            return;
        };
        fwd.stop.cancel();
        let _ = tokio::time::timeout(FLUSH_GRACE, fwd.join).await;
    }
}
