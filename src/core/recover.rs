//! # Failure boundary.
//!
//! Converts an aborting (panicking) action into a normal [`ActionError`] so the
//! restart logic only ever sees `Result`.
//!
//! ```text
//! future ──► catch_unwind ──► Ok(Ok(()))   → Ok(())
//!                          ├─► Ok(Err(e))   → Err(e)
//!                          └─► Err(panic)   → Err(ActionError::Panicked { payload })
//! ```
//!
//! **Warning**: `AssertUnwindSafe` is used; shared state behind a lock poisoned by
//! the panic stays poisoned for the next attempt.

use std::any::Any;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};

use futures::FutureExt;

use crate::actions::Action;
use crate::error::ActionError;

/// Runs `fut` to completion, turning a panic into [`ActionError::Panicked`].
///
/// # Example
/// ```
/// use procvisor::{ActionError, recover};
///
/// fn explode() -> Result<(), ActionError> {
///     panic!("boom")
/// }
///
/// let res = futures::executor::block_on(recover(async { explode() }));
/// assert_eq!(res, Err(ActionError::Panicked { reason: "boom".into() }));
/// ```
pub async fn recover<F>(fut: F) -> Result<(), ActionError>
where
    F: Future<Output = Result<(), ActionError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(ActionError::Panicked {
            reason: panic_message(&*payload),
        }),
    }
}

/// Starts one attempt of `action` inside the failure boundary.
///
/// A panic while *creating* the future is caught as well as one while polling it.
pub(crate) async fn recover_action(action: &dyn Action) -> Result<(), ActionError> {
    match catch_unwind(AssertUnwindSafe(|| action.spawn())) {
        Ok(fut) => recover(fut).await,
        Err(payload) => Err(ActionError::Panicked {
            reason: panic_message(&*payload),
        }),
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(err) = payload.downcast_ref::<ActionError>() {
        err.reason().to_string()
    } else {
        "unknown panic".to_string()
    }
}
