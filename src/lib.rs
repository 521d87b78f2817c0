//! # procvisor
//!
//! **procvisor** is a small supervision and graceful-shutdown core for long-running
//! tokio services.
//!
//! It provides two building blocks:
//! - a [`Supervisor`] that keeps a fallible (or panicking) action alive with a bounded
//!   restart budget and a fixed delay between attempts;
//! - a [`Lifecycle`] coordinator: one cancellable root context for the whole process,
//!   counted registration of in-flight work, and a timeout-bounded drain on shutdown.
//!
//! ## Architecture
//! ```text
//!   OS signal ──► on_signal ──┐
//!   finalize(.., true) ───────┼──► root CancellationToken ──► every context() observer
//!   cancel() ─────────────────┘
//!
//!   unit of work:  let _scope = register_scope();  ... ctx.cancelled() ...  (drop → release)
//!
//!   main:          finalize(timeout)
//!                    ├─ wait for cancellation
//!                    └─ wait for scopes == 0  (at most `timeout`, then DrainTimedOut)
//!
//!   Supervisor::supervise(action, RestartPolicy { intensity, period })
//!     attempt #1 inline ──fail──► spawn restart chain: sleep(period) → attempt #n → ...
//!
//!   every step ── publish(Event) ──► Bus ──► forwarder ──► SubscriberSet ──► LogWriter / custom
//! ```
//!
//! ## Features
//! | Area              | Description                                                       | Key types                                  |
//! |-------------------|-------------------------------------------------------------------|--------------------------------------------|
//! | **Supervision**   | Restart failing/panicking actions with intensity + period.        | [`Supervisor`], [`RestartPolicy`]          |
//! | **Lifecycle**     | Root context, scoped registration, drain with timeout.            | [`Lifecycle`], [`ScopeGuard`]              |
//! | **Signals**       | First termination signal cancels the root context.                | [`SignalSet`], [`on_signal`]               |
//! | **Actions**       | Define supervised work as closures or trait objects.              | [`Action`], [`ActionFn`], [`ActionRef`]    |
//! | **Events**        | Observe everything through subscribers.                           | [`Event`], [`EventKind`], [`Subscribe`]    |
//! | **Errors**        | Typed errors with stable labels.                                  | [`ActionError`], [`LifecycleError`]        |
//! | **Configuration** | Centralize coordinator settings.                                  | [`LifecycleConfig`]                        |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], a subscriber writing `tracing` records.
//!   Every lifecycle gets one unless `LifecycleConfig::log_events` is off, and a standalone
//!   [`Supervisor`] logs its failures directly.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use procvisor::{ActionError, ActionFn, Lifecycle, LifecycleConfig, RestartPolicy};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let lc = Lifecycle::builder(LifecycleConfig::default()).build();
//!
//!     // A worker that runs until shutdown.
//!     let ctx = lc.context();
//!     lc.spawn(async move { ctx.cancelled().await });
//!
//!     // A flaky job restarted at most twice, 10ms apart.
//!     let job = ActionFn::arc("job", || async { Err::<(), _>(ActionError::fail("flaky")) });
//!     let policy = RestartPolicy::limited(2).with_period(Duration::from_millis(10));
//!     let chain = lc.supervisor().supervise(job, policy).await;
//!     if let Some(chain) = chain {
//!         chain.await.ok();
//!     }
//!
//!     // Last statement before exit.
//!     lc.finalize(Duration::from_secs(5), true).await;
//! }
//! ```

mod actions;
mod config;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use actions::{Action, ActionFn, ActionRef, BoxActionFuture};
pub use config::LifecycleConfig;
#[cfg(unix)]
pub use self::core::SignalKind;
pub use self::core::{
    FinalizeOutcome, Lifecycle, LifecycleBuilder, ScopeGuard, ScopeSet, SignalSet, Supervisor,
    Throughput, TimerScope, context, finalize, on_signal, recover, register_scope, supervise,
};
pub use error::{ActionError, LifecycleError};
pub use events::{Bus, Event, EventKind};
pub use policies::{DEFAULT_PERIOD, RestartPolicy};
pub use subscribers::{Subscribe, SubscriberSet};

// Built-in `tracing` subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
