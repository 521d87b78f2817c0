//! # Counted in-flight registrations.
//!
//! [`ScopeSet`] is a wait-group built on [`TaskTracker`]: every
//! [`ScopeGuard`] counts as one unit of in-flight work until it is dropped.
//!
//! ```text
//! register() ──► ScopeGuard ──(drop / release)──► count - 1
//!
//! drain(timeout):
//!   close tracker
//!   └─► timeout(wait until count == 0)
//!         ├─ Ok  → Ok(())
//!         └─ Err → Err(outstanding)
//! ```
//!
//! ## Rules
//! - A guard releases **exactly once** (ownership makes double release impossible).
//! - Registration after `drain` started is still counted.
//! - Draining never touches the registered work; it only waits.

use std::time::Duration;

use tokio_util::task::{TaskTracker, task_tracker::TaskTrackerToken};

/// Counted set of in-flight scopes.
#[derive(Clone, Debug, Default)]
pub struct ScopeSet {
    tracker: TaskTracker,
}

/// Release handle for one registered scope.
///
/// Dropping the guard releases the scope; keep it alive for as long as the work runs.
#[must_use = "dropping a ScopeGuard releases the scope immediately"]
#[derive(Debug)]
pub struct ScopeGuard {
    _token: TaskTrackerToken,
}

impl ScopeGuard {
    /// Releases the scope explicitly.
    pub fn release(self) {}
}

impl ScopeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    /// Registers one unit of in-flight work.
    pub fn register(&self) -> ScopeGuard {
        ScopeGuard {
            _token: self.tracker.token(),
        }
    }

    /// Number of scopes currently registered.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Waits for every scope to be released, for at most `timeout`.
    ///
    /// Returns `Err(outstanding)` if the timeout elapsed first.
    pub async fn drain(&self, timeout: Duration) -> Result<(), usize> {
        self.tracker.close();
        tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .map_err(|_| self.tracker.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guards_count_until_dropped() {
        let set = ScopeSet::new();
        let a = set.register();
        let b = set.register();
        assert_eq!(set.len(), 2);

        a.release();
        assert_eq!(set.len(), 1);
        drop(b);
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_empty_set_drains_immediately() {
        let set = ScopeSet::new();
        assert_eq!(set.drain(Duration::from_millis(10)).await, Ok(()));
    }

    #[tokio::test]
    async fn test_drain_reports_outstanding_on_timeout() {
        let set = ScopeSet::new();
        let _held = set.register();
        let _also = set.register();
        assert_eq!(set.drain(Duration::from_millis(20)).await, Err(2));
    }

    #[tokio::test]
    async fn test_drain_waits_for_late_release() {
        let set = ScopeSet::new();
        let guard = set.register();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(guard);
        });
        assert_eq!(set.drain(Duration::from_secs(5)).await, Ok(()));
    }
}
