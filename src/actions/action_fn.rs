//! # Function-backed action (`ActionFn`)
//!
//! [`ActionFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! attempt. State that must survive restarts goes into an explicit `Arc<...>`
//! captured by the closure.
//!
//! ## Example
//! ```rust
//! use procvisor::{ActionError, ActionFn, ActionRef};
//!
//! let a: ActionRef = ActionFn::arc("worker", || async {
//!     Ok::<_, ActionError>(())
//! });
//!
//! assert_eq!(a.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::actions::action::{Action, BoxActionFuture};
use crate::error::ActionError;

/// Function-backed action implementation.
#[derive(Debug)]
pub struct ActionFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ActionFn<F> {
    /// Creates a new function-backed action.
    ///
    /// Prefer [`ActionFn::arc`] when you immediately need an [`ActionRef`](crate::ActionRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the action and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Action for ActionFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self) -> BoxActionFuture {
        Box::pin((self.f)())
    }
}
