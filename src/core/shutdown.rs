//! # Cross-platform OS signal handling.
//!
//! Provides [`SignalSet`] (which signals count as "shut down") and [`on_signal`], which
//! runs a callback once, in the background, the first time any signal of the set arrives.
//!
//! ## Signals
//! **Unix platforms** ([`SignalSet::termination`]):
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//! - `SIGHUP` (controlling terminal closed)
//! - `SIGABRT` (abort requested, e.g. by `abort()` or a watchdog)
//! - `SIGTSTP` (terminal stop, Ctrl-Z; handled as a stop request instead of suspending)
//!
//! `SIGKILL` and `SIGSTOP` cannot be caught and are never part of a set.
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use futures::future::{BoxFuture, FutureExt, select_all};
use tokio::task::JoinHandle;

use crate::error::LifecycleError;

#[cfg(unix)]
use nix::sys::signal::Signal;
#[cfg(unix)]
pub use tokio::signal::unix::SignalKind;

/// Set of signals that trigger a callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalSet {
    #[cfg(unix)]
    kinds: Vec<SignalKind>,
    #[cfg(not(unix))]
    ctrl_c: bool,
}

impl SignalSet {
    /// Termination-class signals (see module docs).
    pub fn termination() -> Self {
        #[cfg(unix)]
        {
            Self {
                kinds: vec![
                    SignalKind::interrupt(),
                    SignalKind::terminate(),
                    SignalKind::quit(),
                    SignalKind::hangup(),
                    SignalKind::from_raw(Signal::SIGABRT as i32),
                    SignalKind::from_raw(Signal::SIGTSTP as i32),
                ],
            }
        }
        #[cfg(not(unix))]
        {
            Self { ctrl_c: true }
        }
    }

    /// A set that never fires.
    pub fn empty() -> Self {
        #[cfg(unix)]
        {
            Self { kinds: Vec::new() }
        }
        #[cfg(not(unix))]
        {
            Self { ctrl_c: false }
        }
    }

    /// Explicit list of Unix signals.
    #[cfg(unix)]
    pub fn from_kinds(kinds: impl IntoIterator<Item = SignalKind>) -> Self {
        let mut set = Self::empty();
        for kind in kinds {
            set = set.with(kind);
        }
        set
    }

    /// Adds one Unix signal (duplicates are ignored).
    #[cfg(unix)]
    #[must_use]
    pub fn with(mut self, kind: SignalKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Returns `true` if `kind` is part of the set.
    #[cfg(unix)]
    pub fn contains(&self, kind: SignalKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Returns `true` when no signal is selected.
    pub fn is_empty(&self) -> bool {
        #[cfg(unix)]
        {
            self.kinds.is_empty()
        }
        #[cfg(not(unix))]
        {
            !self.ctrl_c
        }
    }

    /// Registers a listener per signal and returns one future per listener.
    ///
    /// Registration happens eagerly so errors surface to the caller.
    fn listeners(&self) -> Result<Vec<BoxFuture<'static, ()>>, LifecycleError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::signal;

            let mut waits = Vec::with_capacity(self.kinds.len());
            for kind in &self.kinds {
                let mut stream = signal(*kind)?;
                waits.push(
                    async move {
                        stream.recv().await;
                    }
                    .boxed(),
                );
            }
            Ok(waits)
        }
        #[cfg(not(unix))]
        {
            let mut waits = Vec::new();
            if self.ctrl_c {
                waits.push(
                    async {
                        let _ = tokio::signal::ctrl_c().await;
                    }
                    .boxed(),
                );
            }
            Ok(waits)
        }
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::termination()
    }
}

/// Calls `f` once, on a background task, when the first signal of `signals` arrives.
///
/// Later signals are ignored by this hook. Returns `Ok(None)` for an empty set
/// (nothing to wait for) and an error if a listener could not be registered.
/// Must be called inside a tokio runtime.
pub fn on_signal<F>(signals: &SignalSet, f: F) -> Result<Option<JoinHandle<()>>, LifecycleError>
where
    F: FnOnce() + Send + 'static,
{
    let waits = signals.listeners()?;
    if waits.is_empty() {
        return Ok(None);
    }
    Ok(Some(tokio::spawn(async move {
        select_all(waits).await;
        f();
    })))
}
