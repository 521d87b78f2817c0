//! Error types used by the supervisor and the lifecycle coordinator.
//!
//! This module defines two enums:
//!
//! - [`ActionError`]: failures of a single supervised attempt (returned or panicked).
//! - [`LifecycleError`]: misuse of the process-wide coordinator or signal wiring.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Neither is ever returned by steady-state supervision or draining: those report
//! through the event bus instead.

use std::fmt::Display;
use thiserror::Error;

/// # Errors produced by a supervised action.
///
/// A returned error and a recovered panic are two variants of the same type, so
/// restart scheduling only ever sees one failure representation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action returned an error.
    #[error("action failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// The action panicked; the panic was caught at the attempt boundary.
    #[error("action panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text (`"unknown panic"` for opaque payloads).
        reason: String,
    },
}

impl ActionError {
    /// Builds a [`ActionError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use procvisor::ActionError;
    ///
    /// let err = ActionError::fail("connection refused");
    /// assert_eq!(err.to_string(), "action failed: connection refused");
    /// ```
    pub fn fail(reason: impl Display) -> Self {
        ActionError::Fail {
            reason: reason.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use procvisor::ActionError;
    ///
    /// let err = ActionError::Panicked { reason: "boom".into() };
    /// assert_eq!(err.as_label(), "action_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Fail { .. } => "action_failed",
            ActionError::Panicked { .. } => "action_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::Fail { reason } => format!("error: {reason}"),
            ActionError::Panicked { reason } => format!("panic: {reason}"),
        }
    }

    /// Returns `true` if the failure came from a recovered panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, ActionError::Panicked { .. })
    }

    /// Returns the raw reason text.
    pub fn reason(&self) -> &str {
        match self {
            ActionError::Fail { reason } | ActionError::Panicked { reason } => reason,
        }
    }
}

/// # Errors produced by the lifecycle coordinator.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A process-wide lifecycle was already installed.
    #[error("lifecycle already installed")]
    AlreadyInstalled,

    /// No process-wide lifecycle has been installed yet.
    #[error("lifecycle not installed")]
    NotInstalled,

    /// Registering an OS signal listener failed.
    #[error("signal registration failed: {0}")]
    SignalRegistration(#[from] std::io::Error),
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use procvisor::LifecycleError;
    ///
    /// assert_eq!(LifecycleError::NotInstalled.as_label(), "lifecycle_not_installed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::AlreadyInstalled => "lifecycle_already_installed",
            LifecycleError::NotInstalled => "lifecycle_not_installed",
            LifecycleError::SignalRegistration(_) => "lifecycle_signal_registration",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LifecycleError::AlreadyInstalled => "a lifecycle is already installed".to_string(),
            LifecycleError::NotInstalled => "no lifecycle installed".to_string(),
            LifecycleError::SignalRegistration(e) => format!("signal registration: {e}"),
        }
    }
}
