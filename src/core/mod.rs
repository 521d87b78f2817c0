//! Runtime core: supervision and lifecycle.
//!
//! Internal modules:
//! - [`recover`]: failure boundary turning panics into [`ActionError`](crate::ActionError);
//! - [`attempt`]: executes one attempt with event publishing;
//! - [`supervisor`]: restart-on-failure chains with a fixed delay;
//! - [`scope`]: counted in-flight registrations;
//! - [`shutdown`]: cross-platform signal hooks;
//! - [`lifecycle`]: root context, drain, forwarder to subscribers;
//! - [`builder`]: lifecycle construction and process-wide installation;
//! - [`global`]: free functions over the installed lifecycle;
//! - [`timer`]: elapsed-time scopes.

mod attempt;
mod builder;
mod global;
mod lifecycle;
mod recover;
mod scope;
mod shutdown;
mod supervisor;
mod timer;

pub use builder::LifecycleBuilder;
pub use global::{context, finalize, register_scope, supervise};
pub use lifecycle::{FinalizeOutcome, Lifecycle};
pub use recover::recover;
pub(crate) use recover::panic_message;
pub use scope::{ScopeGuard, ScopeSet};
#[cfg(unix)]
pub use shutdown::SignalKind;
pub use shutdown::{SignalSet, on_signal};
pub use supervisor::Supervisor;
pub use timer::{Throughput, TimerScope};
