//! # Subscribe: where a lifecycle's events end up.
//!
//! Every subscriber given to [`LifecycleBuilder`](crate::LifecycleBuilder) (plus the
//! default [`LogWriter`](crate::LogWriter) when `log_events` is on) gets its own worker
//! and bounded queue inside the [`SubscriberSet`](crate::SubscriberSet). The lifecycle's
//! forwarder copies each bus event into every queue.
//!
//! A subscriber sees events in publish order. Before [`Lifecycle::finalize`](crate::Lifecycle::finalize)
//! returns, its queue is closed and its worker has handled everything queued, so the
//! drain result is always the last thing it sees.
//!
//! A full queue drops the event for that subscriber only and publishes `SubscriberOverflow`.
//! A panic inside `on_event` is caught and published as `SubscriberPanicked`; the worker
//! keeps going with the next event.

use async_trait::async_trait;

use crate::events::Event;

/// Handler for lifecycle events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Slow handlers only delay their own queue.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (at least 1 is used).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
