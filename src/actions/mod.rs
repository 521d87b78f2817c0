//! # Action abstractions.
//!
//! - [`Action`] - trait for a fallible, restartable unit of work
//! - [`ActionFn`] - closure-backed implementation
//! - [`ActionRef`] - shared reference to an action (`Arc<dyn Action>`)

mod action;
mod action_fn;

pub use action::{Action, ActionRef, BoxActionFuture};
pub use action_fn::ActionFn;
