//! Surface event bus bridging host triggers into the loader.

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::trigger::TriggerKind;

const DEFAULT_CAPACITY: usize = 32;

/// Broadcast bus carrying host-level triggers.
///
/// The host emits a trigger whenever something may have changed the tracked
/// element's visibility (initial load, scroll, resize, pinch end); lazy
/// activation subscribes to it while waiting for the element to appear.
/// Emitting with no subscribers is fine.
#[derive(Debug, Clone)]
pub struct SurfaceEventBus {
    tx: broadcast::Sender<TriggerKind>,
}

impl SurfaceEventBus {
    /// Creates a bus with the default buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus with an explicit buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes a trigger to every subscriber.
    pub fn emit(&self, kind: TriggerKind) {
        trace!(trigger = %kind, "surface trigger");
        let _ = self.tx.send(kind);
    }

    /// Subscribes to subsequent triggers.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TriggerKind> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SurfaceEventBus {
    fn default() -> Self {
        Self::new()
    }
}
