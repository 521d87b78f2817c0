//! # Supervised action abstraction.
//!
//! An [`Action`] has a stable [`name`](Action::name) and produces a fresh future per
//! attempt via [`spawn`](Action::spawn). The supervisor calls `spawn` once per attempt,
//! so every restart starts from a clean future.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ActionError;

/// Boxed future returned by [`Action::spawn`].
pub type BoxActionFuture = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send + 'static>>;

/// Shared handle to an action.
pub type ActionRef = Arc<dyn Action>;

/// # Fallible unit of work kept alive by the supervisor.
///
/// # Example
/// ```
/// use procvisor::{Action, ActionError, BoxActionFuture};
///
/// struct Ping;
///
/// impl Action for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     fn spawn(&self) -> BoxActionFuture {
///         Box::pin(async { Err(ActionError::fail("unreachable")) })
///     }
/// }
/// ```
pub trait Action: Send + Sync + 'static {
    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Creates the future for one attempt.
    fn spawn(&self) -> BoxActionFuture;
}
