//! # Elapsed-time scopes.
//!
//! A [`TimerScope`] publishes `TimerStarted` when created and `TimerElapsed` when
//! dropped. With an operation count, subscribers can derive a [`Throughput`].
//!
//! ```text
//! let _t = TimerScope::start(&bus, "reindex").with_ops(10_000);
//!   ...work...
//! drop ──► TimerElapsed { task: "reindex", elapsed, ops: 10_000 }
//! ```
//!
//! An empty name is replaced by the caller's `file:line`.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::time::{Duration, Instant};

use crate::events::{Bus, Event, EventKind};

/// RAII timer publishing its elapsed time on drop.
#[must_use = "the timer reports when it is dropped"]
#[derive(Debug)]
pub struct TimerScope {
    bus: Bus,
    name: Cow<'static, str>,
    started: Instant,
    ops: Option<u64>,
}

impl TimerScope {
    /// Starts a timer and publishes `TimerStarted`.
    #[track_caller]
    pub fn start(bus: &Bus, name: impl Into<Cow<'static, str>>) -> Self {
        let mut name = name.into();
        if name.is_empty() {
            let at = Location::caller();
            name = Cow::Owned(format!("{}:{:02}", at.file(), at.line()));
        }
        bus.publish(Event::new(EventKind::TimerStarted).with_task(name.as_ref()));
        Self {
            bus: bus.clone(),
            name,
            started: Instant::now(),
            ops: None,
        }
    }

    /// Records how many operations the scope covers.
    pub fn with_ops(mut self, ops: u64) -> Self {
        self.ops = Some(ops);
        self
    }

    /// Scope name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time since start.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for TimerScope {
    fn drop(&mut self) {
        let mut ev = Event::new(EventKind::TimerElapsed)
            .with_task(self.name.as_ref())
            .with_elapsed(self.started.elapsed());
        if let Some(ops) = self.ops {
            ev = ev.with_ops(ops);
        }
        self.bus.publish(ev);
    }
}

/// Operation rate derived from an elapsed time and an operation count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throughput {
    elapsed: Duration,
    ops: u64,
}

impl Throughput {
    /// Returns `None` for zero operations.
    pub fn new(elapsed: Duration, ops: u64) -> Option<Self> {
        (ops > 0).then_some(Self { elapsed, ops })
    }

    /// Operations per second (`inf` for a zero elapsed time).
    pub fn ops_per_sec(&self) -> f64 {
        self.ops as f64 / self.elapsed.as_secs_f64()
    }

    /// Average time per operation.
    pub fn per_op(&self) -> Duration {
        self.elapsed.div_f64(self.ops as f64)
    }
}

impl fmt::Display for Throughput {
    /// `op/sec 1234.50, micro-sec/op 810.05`; the per-op unit is the largest one that fits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_op = self.per_op();
        let (unit, value) = if per_op > Duration::from_secs(1) {
            ("sec/op", per_op.as_secs_f64())
        } else if per_op > Duration::from_millis(1) {
            ("milli-sec/op", per_op.as_secs_f64() * 1e3)
        } else if per_op > Duration::from_micros(1) {
            ("micro-sec/op", per_op.as_secs_f64() * 1e6)
        } else {
            ("nano-sec/op", per_op.as_secs_f64() * 1e9)
        };
        write!(f, "op/sec {:.2}, {unit} {value:.2}", self.ops_per_sec())
    }
}
