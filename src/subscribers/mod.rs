//! # Event subscribers.
//!
//! ```text
//!   Supervisor / Lifecycle ── publish(Event) ──► Bus ──► forwarder ──► SubscriberSet
//!                                                                         │
//!                                                                ┌────────┴────────┐
//!                                                                ▼                 ▼
//!                                                            LogWriter           Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use procvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.is_failure() {
//!             // increment failure counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
