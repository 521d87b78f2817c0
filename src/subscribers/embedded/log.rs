//! # LogWriter: events as `tracing` records
//!
//! A subscriber that turns every [`Event`] into one `tracing` record.
//! Install a `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Levels
//! - failures and panics of supervised actions → `WARN`
//! - drain timeout, subscriber panics/overflow → `ERROR`
//! - shutdown milestones → `INFO`
//! - attempts, restarts, timer scopes → `DEBUG`
//!
//! ## Example output (fmt layer)
//! ```text
//! WARN  action failed action="poller" attempt=1 error="connection refused"
//! DEBUG restart scheduled action="poller" delay_ms=3000 remaining=Some(2)
//! INFO  shutdown requested
//! ERROR drain timed out in_flight=1 timeout_ms=5000
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::core::Throughput;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    pub(crate) const NAME: &'static str = "LogWriter";

    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::AttemptStarting => {
                debug!(action = task, attempt = e.attempt, "attempt starting");
            }
            EventKind::ActionSucceeded => {
                debug!(action = task, attempt = e.attempt, "action succeeded");
            }
            EventKind::ActionFailed => {
                warn!(action = task, attempt = e.attempt, error = reason, "action failed");
            }
            EventKind::ActionPanicked => {
                warn!(action = task, attempt = e.attempt, panic = reason, "action panicked");
            }
            EventKind::RestartScheduled => {
                debug!(
                    action = task,
                    delay_ms = e.delay_ms,
                    remaining = ?e.remaining,
                    "restart scheduled"
                );
            }
            EventKind::RestartAbandoned => {
                debug!(action = task, attempt = e.attempt, "restart abandoned");
            }
            EventKind::ShutdownRequested => {
                info!("shutdown requested");
            }
            EventKind::CancelRequested => {
                info!("cancel requested");
            }
            EventKind::DrainStarted => {
                info!(in_flight = e.in_flight, timeout_ms = e.timeout_ms, "draining");
            }
            EventKind::DrainCompleted => {
                info!("drained");
            }
            EventKind::DrainTimedOut => {
                error!(in_flight = e.in_flight, timeout_ms = e.timeout_ms, "drain timed out");
            }
            EventKind::TimerStarted => {
                debug!(scope = task, "started");
            }
            EventKind::TimerElapsed => {
                let elapsed = e.elapsed.unwrap_or_default();
                match e.ops.and_then(|n| Throughput::new(elapsed, n)) {
                    Some(tp) => debug!(scope = task, ?elapsed, "took; {tp}"),
                    None => debug!(scope = task, ?elapsed, "took"),
                }
            }
            EventKind::SubscriberOverflow => {
                error!(subscriber = task, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                error!(subscriber = task, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
