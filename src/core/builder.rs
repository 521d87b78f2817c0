use std::sync::{Arc, OnceLock};

use crate::{
    config::LifecycleConfig,
    error::LifecycleError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

use super::lifecycle::Lifecycle;

#[cfg(feature = "logging")]
use crate::subscribers::LogWriter;

/// The lifecycle installed with [`LifecycleBuilder::install`].
static GLOBAL: OnceLock<Arc<Lifecycle>> = OnceLock::new();

/// Builder for constructing a [`Lifecycle`].
pub struct LifecycleBuilder {
    cfg: LifecycleConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl LifecycleBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: LifecycleConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive runtime events (failures, restarts, drain milestones)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds a standalone lifecycle.
    ///
    /// With the `logging` feature and `log_events` on, a [`LogWriter`](crate::LogWriter)
    /// is added unless one was given. No signal hook is wired; call
    /// [`Lifecycle::listen_for_signals`] for that.
    /// Must be called inside a tokio runtime when any subscriber ends up attached.
    pub fn build(self) -> Arc<Lifecycle> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subscribers = self.with_default_log();
        let subs = if subscribers.is_empty() {
            None
        } else {
            Some(SubscriberSet::new(subscribers, bus.clone()))
        };
        Lifecycle::new_internal(self.cfg, bus, subs)
    }

    #[cfg(feature = "logging")]
    fn with_default_log(&self) -> Vec<Arc<dyn Subscribe>> {
        let mut subs = self.subscribers.clone();
        let has_log = subs.iter().any(|s| s.name() == LogWriter::NAME);
        if self.cfg.log_events && !has_log {
            subs.insert(0, Arc::new(LogWriter::new()));
        }
        subs
    }

    #[cfg(not(feature = "logging"))]
    fn with_default_log(&self) -> Vec<Arc<dyn Subscribe>> {
        self.subscribers.clone()
    }

    /// Builds the process-wide lifecycle and wires the signal hook
    /// (unless `listen_signals` is off).
    ///
    /// Fails with [`LifecycleError::AlreadyInstalled`] on a second call. If the
    /// signal hook cannot be registered nothing is installed and the call may be retried.
    /// Must be called inside a tokio runtime.
    pub fn install(self) -> Result<Arc<Lifecycle>, LifecycleError> {
        if GLOBAL.get().is_some() {
            return Err(LifecycleError::AlreadyInstalled);
        }
        let listen = self.cfg.listen_signals;
        let lc = self.build();
        // a lifecycle whose hook failed to register is never published
        if listen {
            lc.listen_for_signals()?;
        }
        GLOBAL
            .set(Arc::clone(&lc))
            .map_err(|_| LifecycleError::AlreadyInstalled)?;
        Ok(lc)
    }
}

impl Lifecycle {
    /// The process-wide lifecycle, if one was installed.
    pub fn global() -> Result<Arc<Lifecycle>, LifecycleError> {
        GLOBAL.get().cloned().ok_or(LifecycleError::NotInstalled)
    }
}
