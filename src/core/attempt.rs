//! # Run a single attempt of a supervised action.
//!
//! ```text
//! publish AttemptStarting
//!   └─► recover_action(action)
//!         ├─ Ok(())           → publish ActionSucceeded
//!         ├─ Err(Fail)        → publish ActionFailed   (reason = error)
//!         └─ Err(Panicked)    → publish ActionPanicked (reason = payload)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event per attempt.
//! - Never panics: the action runs inside the failure boundary.

use crate::{
    actions::Action,
    core::recover::recover_action,
    error::ActionError,
    events::{Bus, Event, EventKind},
};

/// Executes one attempt of `action`, publishing lifecycle events to `bus`.
///
/// With `log` set, failures are also written straight to `tracing`.
pub(crate) async fn run_attempt(
    action: &dyn Action,
    attempt: u32,
    bus: &Bus,
    log: bool,
) -> Result<(), ActionError> {
    bus.publish(
        Event::new(EventKind::AttemptStarting)
            .with_task(action.name())
            .with_attempt(attempt),
    );

    let res = recover_action(action).await;
    match &res {
        Ok(()) => bus.publish(
            Event::new(EventKind::ActionSucceeded)
                .with_task(action.name())
                .with_attempt(attempt),
        ),
        Err(e) => {
            if log {
                log_failure(action.name(), attempt, e);
            }
            publish_failure(bus, action.name(), attempt, e);
        }
    }
    res
}

#[cfg(feature = "logging")]
fn log_failure(name: &str, attempt: u32, err: &ActionError) {
    if err.is_panic() {
        tracing::warn!(action = name, attempt, panic = err.reason(), "action panicked");
    } else {
        tracing::warn!(action = name, attempt, error = err.reason(), "action failed");
    }
}

#[cfg(not(feature = "logging"))]
fn log_failure(_name: &str, _attempt: u32, _err: &ActionError) {}

fn publish_failure(bus: &Bus, name: &str, attempt: u32, err: &ActionError) {
    let kind = if err.is_panic() {
        EventKind::ActionPanicked
    } else {
        EventKind::ActionFailed
    };
    bus.publish(
        Event::new(kind)
            .with_task(name)
            .with_attempt(attempt)
            .with_reason(err.reason()),
    );
}
