//! # Restart policy for supervised actions.
//!
//! [`RestartPolicy`] bounds how many times a failing action is restarted and how long
//! the supervisor waits before each restart.
//!
//! - `intensity == 0` → the action is never invoked.
//! - `intensity > 0`  → at most `intensity` restarts (so `intensity + 1` attempts in total).
//! - `intensity < 0`  → restarts without bound; the value is never decremented.
//!
//! ```text
//! RestartPolicy::limited(2)     → attempt, restart, restart        (3 attempts max)
//! RestartPolicy::unbounded()    → attempt, restart, restart, ...   (until success)
//! RestartPolicy::disabled()     → nothing runs
//! ```
//!
//! A zero `period` falls back to [`DEFAULT_PERIOD`].

use std::time::Duration;

/// Delay used between restarts when none (or zero) is configured.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(3);

/// Restart budget and inter-attempt delay for one supervision chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestartPolicy {
    /// Remaining allowed restarts (`< 0` = unbounded, `0` = none).
    pub intensity: i64,
    /// Delay before each restart (`0` = [`DEFAULT_PERIOD`]).
    pub period: Duration,
}

impl Default for RestartPolicy {
    /// Returns [`RestartPolicy::unbounded`] with the default period.
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RestartPolicy {
    /// Creates a policy with an explicit intensity and period.
    pub fn new(intensity: i64, period: Duration) -> Self {
        Self { intensity, period }
    }

    /// At most `restarts` restarts after the first failure.
    pub fn limited(restarts: u32) -> Self {
        Self::new(i64::from(restarts), DEFAULT_PERIOD)
    }

    /// Restart forever as long as the action keeps failing.
    pub fn unbounded() -> Self {
        Self::new(-1, DEFAULT_PERIOD)
    }

    /// Never run the action.
    pub fn disabled() -> Self {
        Self::new(0, DEFAULT_PERIOD)
    }

    /// Returns a copy with the given period.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Effective restart delay.
    #[inline]
    pub fn period(&self) -> Duration {
        if self.period.is_zero() {
            DEFAULT_PERIOD
        } else {
            self.period
        }
    }

    /// Returns `true` when the budget is spent.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.intensity == 0
    }

    /// Returns `true` for a negative intensity.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.intensity < 0
    }

    /// Consumes one restart from the budget.
    ///
    /// Returns the policy that governs what comes after the restart, or `None` if no
    /// restart is allowed. Unbounded policies come back unchanged.
    ///
    /// # Example
    /// ```
    /// use procvisor::RestartPolicy;
    ///
    /// let p = RestartPolicy::limited(1);
    /// let p = p.consume().expect("one restart left");
    /// assert!(p.is_exhausted());
    /// assert!(p.consume().is_none());
    /// ```
    pub fn consume(self) -> Option<Self> {
        match self.intensity {
            0 => None,
            n if n < 0 => Some(self),
            n => Some(Self {
                intensity: n - 1,
                ..self
            }),
        }
    }

    /// Remaining restarts, `None` when unbounded.
    pub fn remaining(&self) -> Option<u64> {
        u64::try_from(self.intensity).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_falls_back_to_default() {
        let policy = RestartPolicy::new(3, Duration::ZERO);
        assert_eq!(policy.period(), DEFAULT_PERIOD);
        assert_eq!(
            policy.with_period(Duration::from_millis(10)).period(),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn test_limited_budget_counts_down_to_zero() {
        let mut policy = RestartPolicy::limited(3);
        let mut restarts = 0;
        while let Some(next) = policy.consume() {
            assert!(next.intensity < policy.intensity);
            policy = next;
            restarts += 1;
        }
        assert_eq!(restarts, 3);
        assert!(policy.is_exhausted());
    }

    #[test]
    fn test_unbounded_is_never_decremented() {
        let mut policy = RestartPolicy::new(-5, Duration::from_millis(1));
        for _ in 0..1000 {
            policy = policy.consume().expect("unbounded never runs out");
        }
        assert_eq!(policy.intensity, -5);
        assert!(policy.is_unbounded());
        assert_eq!(policy.remaining(), None);
    }

    #[test]
    fn test_disabled_has_no_restarts() {
        let policy = RestartPolicy::disabled();
        assert!(policy.is_exhausted());
        assert!(policy.consume().is_none());
        assert_eq!(policy.remaining(), Some(0));
    }
}
