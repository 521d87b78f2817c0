//! # Process-wide shortcuts.
//!
//! Free functions forwarding to [`Lifecycle::global`], so any component can reach the
//! shared context and drain without threading a handle through every call.
//! All of them fail with [`LifecycleError::NotInstalled`] before
//! [`LifecycleBuilder::install`](crate::LifecycleBuilder::install).

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::actions::ActionRef;
use crate::core::lifecycle::{FinalizeOutcome, Lifecycle};
use crate::core::scope::ScopeGuard;
use crate::error::LifecycleError;
use crate::policies::RestartPolicy;

/// Root context of the installed lifecycle.
pub fn context() -> Result<CancellationToken, LifecycleError> {
    Ok(Lifecycle::global()?.context())
}

/// Registers a scope on the installed lifecycle.
pub fn register_scope() -> Result<ScopeGuard, LifecycleError> {
    Ok(Lifecycle::global()?.register_scope())
}

/// [`Lifecycle::finalize`] on the installed lifecycle.
pub async fn finalize(
    timeout: Duration,
    trigger_cancel: bool,
) -> Result<FinalizeOutcome, LifecycleError> {
    let lc = Lifecycle::global()?;
    Ok(lc.finalize(timeout, trigger_cancel).await)
}

/// Supervises `action` with the installed lifecycle's supervisor.
pub async fn supervise(
    action: ActionRef,
    policy: RestartPolicy,
) -> Result<Option<JoinHandle<()>>, LifecycleError> {
    let sup = Lifecycle::global()?.supervisor();
    Ok(sup.supervise(action, policy).await)
}
