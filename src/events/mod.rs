//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor` and its restart chains, `Lifecycle`
//!   (cancel/drain/signal), `TimerScope`, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the lifecycle forwarder (fans out to `SubscriberSet`) and any
//!   receiver obtained through [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub(crate) use bus::DEFAULT_CAPACITY;
pub use event::{Event, EventKind};
