//! # Event bus shared by one lifecycle and everything it hands out.
//!
//! Supervisors, restart chains, timer scopes and the lifecycle itself publish into the
//! same [`Bus`]. A lifecycle keeps exactly one long-lived receiver: the forwarder task
//! that feeds its [`SubscriberSet`](crate::SubscriberSet). Tests and callers may take
//! extra receivers with [`Bus::subscribe`] / [`Lifecycle::subscribe`](crate::Lifecycle::subscribe).
//!
//! ```text
//! publish(ev) ──► broadcast ring ──► forwarder ──► SubscriberSet ──► LogWriter / custom
//!                                └─► extra receivers (tests, ad-hoc probes)
//!
//! finalize():  last drain event published
//!              └─► forwarder stopped ─► remaining ring entries drained with try_recv
//!                                     ─► subscriber queues closed and awaited
//! ```
//!
//! Publishing is synchronous, so once `publish` returns the event is in the ring and the
//! flush in `finalize` is guaranteed to hand it to every subscriber. A receiver that falls
//! more than the capacity behind skips the oldest entries; events published while nobody
//! listens are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Ring size used by [`Bus::default`] and `LifecycleConfig::default()`.
pub(crate) const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast handle for runtime events. Clones publish into the same ring.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus whose ring keeps `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Hands `ev` to every current receiver; never waits.
    pub fn publish(&self, ev: Event) {
        // no receiver is not an error: a bare supervisor may run with nobody listening
        let _ = self.tx.send(ev);
    }

    /// Receiver for everything published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receivers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_publish_without_receivers_is_dropped() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::DrainCompleted));
        assert_eq!(bus.receivers(), 0);

        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_receivers_see_events_in_order() {
        let bus = Bus::default();
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::DrainStarted));
        bus.publish(Event::new(EventKind::DrainCompleted));

        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DrainStarted);
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DrainCompleted);
    }
}
