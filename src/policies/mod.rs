//! Restart policy.
//!
//! ## Contents
//! - [`RestartPolicy`] how many restarts a failing action gets and how long to wait before each
//!
//! ## Quick wiring
//! ```text
//! Supervisor::supervise(action, RestartPolicy { intensity, period })
//!      └─► core::supervisor uses:
//!           - consume() to decide restart/stop after a failure
//!           - period() as the fixed delay before the next attempt
//! ```
//!
//! ## Defaults
//! - `RestartPolicy::default()` → unbounded restarts, 3s apart.

mod restart;

pub use restart::{DEFAULT_PERIOD, RestartPolicy};
