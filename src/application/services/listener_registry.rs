//! Attachment of surface triggers to the throttled visibility check.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::services::throttle::Throttle;
use crate::domain::trigger::TriggerKind;
use crate::infrastructure::surface::SurfaceEventBus;

/// Attaches the throttled visibility callback to the fixed trigger set.
///
/// One watcher task per trigger kind, registered in
/// [`TriggerKind::REGISTRATION_ORDER`]. Detaching aborts every watcher and
/// spends the throttle; it is idempotent and safe when nothing is attached.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    watchers: Vec<(TriggerKind, JoinHandle<()>)>,
    callback: Option<Throttle>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` against every trigger kind, in order.
    ///
    /// No-op if listeners are already attached; the spent-throttle rule
    /// means a registry is never re-armed with the same callback.
    pub fn attach_all(&mut self, bus: &SurfaceEventBus, callback: Throttle) {
        if self.is_attached() {
            return;
        }

        for kind in TriggerKind::REGISTRATION_ORDER {
            let mut rx = bus.subscribe();
            let throttled = callback.clone();
            let handle = tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(fired) if fired == kind => throttled.call(),
                        Ok(_) | Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => break,
                    }
                }
            });
            self.watchers.push((kind, handle));
        }

        self.callback = Some(callback);
        debug!("surface listeners attached");
    }

    /// Detaches every listener and cancels the throttled callback.
    pub fn detach_all(&mut self) {
        if self.watchers.is_empty() && self.callback.is_none() {
            return;
        }

        for (_, handle) in self.watchers.drain(..) {
            handle.abort();
        }
        if let Some(callback) = self.callback.take() {
            callback.cancel();
        }
        debug!("surface listeners detached");
    }

    /// Returns true while listeners are attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.watchers.is_empty()
    }

    /// Trigger kinds currently attached, in registration order.
    #[must_use]
    pub fn attached_kinds(&self) -> Vec<TriggerKind> {
        self.watchers.iter().map(|(kind, _)| *kind).collect()
    }
}

impl Drop for ListenerRegistry {
    fn drop(&mut self) {
        self.detach_all();
    }
}
