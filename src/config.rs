//! # Lifecycle configuration.
//!
//! Provides [`LifecycleConfig`] centralized settings for the coordinator.
//!
//! ## Sentinel values
//! - `drain_timeout = 0s` → `finalize_default()` does not wait for scopes at all
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::core::SignalSet;
use crate::events::DEFAULT_CAPACITY;
use crate::policies::RestartPolicy;

/// Configuration for a [`Lifecycle`](crate::Lifecycle).
///
/// ## Field semantics
/// - `drain_timeout`: how long `finalize_default()` waits for scopes after cancellation
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `signals`: OS signals that cancel the root context
/// - `listen_signals`: whether `install()` wires the signal hook
/// - `log_events`: whether `build()` adds a [`LogWriter`](crate::LogWriter) (feature `logging`)
/// - `restart`: default policy of the lifecycle's [`Supervisor`](crate::Supervisor)
#[derive(Clone, Debug)]
pub struct LifecycleConfig {
    /// Maximum wait for registered scopes once cancelled.
    pub drain_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Signals that trigger cancellation.
    pub signals: SignalSet,

    /// Wire the signal hook on `install()`.
    pub listen_signals: bool,

    /// Write every event as a `tracing` record (ignored without the `logging` feature).
    pub log_events: bool,

    /// Default restart policy for `Supervisor::supervise_default`.
    pub restart: RestartPolicy,
}

impl LifecycleConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Drain timeout used by `finalize_default()`.
    #[inline]
    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }
}

impl Default for LifecycleConfig {
    /// Default configuration:
    ///
    /// - `drain_timeout = 30s`
    /// - `bus_capacity = 1024`
    /// - `signals = SignalSet::termination()`
    /// - `listen_signals = true`
    /// - `log_events = true`
    /// - `restart = RestartPolicy::default()` (unbounded, 3s apart)
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(30),
            bus_capacity: DEFAULT_CAPACITY,
            signals: SignalSet::termination(),
            listen_signals: true,
            log_events: true,
            restart: RestartPolicy::default(),
        }
    }
}
