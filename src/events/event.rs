//! # Runtime events emitted by the supervisor, the lifecycle and timer scopes.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Supervision events**: attempt flow (starting, succeeded, failed, panicked, restart)
//! - **Lifecycle events**: cancellation and draining
//! - **Timing events**: [`TimerScope`](crate::TimerScope) start/elapsed
//! - **Subscriber events**: overflow/panic inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, action name,
//! reasons, delays and in-flight counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use procvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActionFailed)
//!     .with_task("poller")
//!     .with_reason("boom")
//!     .with_attempt(3);
//!
//! assert_eq!(ev.kind, EventKind::ActionFailed);
//! assert_eq!(ev.task.as_deref(), Some("poller"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Supervision events ===
    /// An attempt of a supervised action is starting.
    ///
    /// Sets:
    /// - `task`: action name
    /// - `attempt`: attempt number (1-based, per chain)
    AttemptStarting,

    /// The attempt completed without error; supervision of this chain ends.
    ///
    /// Sets:
    /// - `task`: action name
    /// - `attempt`: attempt number
    ActionSucceeded,

    /// The attempt returned an error.
    ///
    /// Sets:
    /// - `task`: action name
    /// - `attempt`: attempt number
    /// - `reason`: error message
    ActionFailed,

    /// The attempt panicked; the panic was recovered.
    ///
    /// Sets:
    /// - `task`: action name
    /// - `attempt`: attempt number
    /// - `reason`: panic payload
    ActionPanicked,

    /// A restart was scheduled after a failure.
    ///
    /// Sets:
    /// - `task`: action name
    /// - `attempt`: the failed attempt number
    /// - `delay_ms`: delay before the restart
    /// - `remaining`: restarts left after this one (`None` = unbounded)
    RestartScheduled,

    /// A pending restart was dropped because the bound context was cancelled.
    ///
    /// Sets:
    /// - `task`: action name
    /// - `attempt`: the last attempt number
    RestartAbandoned,

    // === Lifecycle events ===
    /// A termination signal was observed.
    ShutdownRequested,

    /// Cancellation was triggered explicitly (e.g. `finalize(.., true)`).
    CancelRequested,

    /// Finalize observed cancellation and started waiting for scopes.
    ///
    /// Sets:
    /// - `in_flight`: scopes outstanding when draining started
    /// - `timeout_ms`: drain timeout
    DrainStarted,

    /// All scopes were released within the timeout.
    DrainCompleted,

    /// The drain timeout elapsed with scopes still registered.
    ///
    /// Sets:
    /// - `in_flight`: scopes still outstanding
    /// - `timeout_ms`: drain timeout
    DrainTimedOut,

    // === Timing events ===
    /// A timer scope started.
    ///
    /// Sets:
    /// - `task`: scope name
    TimerStarted,

    /// A timer scope ended.
    ///
    /// Sets:
    /// - `task`: scope name
    /// - `elapsed`: wall time since start
    /// - `ops`: operation count, if one was given
    TimerElapsed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the action/scope/subscriber, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, panic payloads, overflow details).
    pub reason: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Restart delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Drain timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Restarts left after a scheduled restart (`None` = unbounded or not applicable).
    pub remaining: Option<u64>,
    /// Number of registered scopes.
    pub in_flight: Option<usize>,
    /// Elapsed wall time (timer scopes).
    pub elapsed: Option<Duration>,
    /// Operation count (timer scopes).
    pub ops: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            attempt: None,
            delay_ms: None,
            timeout_ms: None,
            remaining: None,
            in_flight: None,
            elapsed: None,
            ops: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an action/scope name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a restart delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a drain timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches the remaining restart budget.
    #[inline]
    pub fn with_remaining(mut self, remaining: Option<u64>) -> Self {
        self.remaining = remaining;
        self
    }

    /// Attaches an in-flight scope count.
    #[inline]
    pub fn with_in_flight(mut self, n: usize) -> Self {
        self.in_flight = Some(n);
        self
    }

    /// Attaches an elapsed duration.
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed = Some(d);
        self
    }

    /// Attaches an operation count.
    #[inline]
    pub fn with_ops(mut self, n: u64) -> Self {
        self.ops = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// Returns `true` for events that report an action failure (error or panic).
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self.kind, EventKind::ActionFailed | EventKind::ActionPanicked)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
