//! Load phase and the state owned by the acquisition machine.

use std::sync::Arc;

use tokio::sync::watch;

/// Externally observable phase of a single image acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Not started, or stopped.
    #[default]
    Idle,
    /// Lazy mode, element not yet visible; listeners attached.
    WaitingForViewport,
    /// A fetch attempt is outstanding.
    Loading,
    /// The image arrived. Terminal.
    Loaded,
    /// A fetch attempt failed; a retry timer is pending.
    Retrying,
    /// Retries exhausted. Terminal.
    Failed,
}

impl LoadPhase {
    /// Returns true for the terminal phases.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }

    /// Returns true while the machine is between start and settlement.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::WaitingForViewport | Self::Loading | Self::Retrying
        )
    }

    /// Returns true once the image has loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::WaitingForViewport => write!(f, "Waiting for viewport"),
            Self::Loading => write!(f, "Loading"),
            Self::Loaded => write!(f, "Loaded"),
            Self::Retrying => write!(f, "Retrying"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Phase holder mutated only through its transition methods.
///
/// Publishes every transition through a watch channel so consumers can read
/// or await the current phase without reaching into the machine.
pub struct LoadState {
    phase_tx: Arc<watch::Sender<LoadPhase>>,
}

impl LoadState {
    /// Wraps an existing phase channel.
    #[must_use]
    pub const fn new(phase_tx: Arc<watch::Sender<LoadPhase>>) -> Self {
        Self { phase_tx }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        *self.phase_tx.borrow()
    }

    /// Enters `WaitingForViewport`.
    pub fn transition_to_waiting(&self) {
        self.phase_tx.send_replace(LoadPhase::WaitingForViewport);
    }

    /// Enters `Loading`.
    pub fn transition_to_loading(&self) {
        self.phase_tx.send_replace(LoadPhase::Loading);
    }

    /// Enters `Loaded`.
    pub fn transition_to_loaded(&self) {
        self.phase_tx.send_replace(LoadPhase::Loaded);
    }

    /// Enters `Retrying`.
    pub fn transition_to_retrying(&self) {
        self.phase_tx.send_replace(LoadPhase::Retrying);
    }

    /// Enters `Failed`.
    pub fn transition_to_failed(&self) {
        self.phase_tx.send_replace(LoadPhase::Failed);
    }
}

impl std::fmt::Debug for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadState")
            .field("phase", &self.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_predicates() {
        assert!(LoadPhase::Loaded.is_terminal());
        assert!(LoadPhase::Failed.is_terminal());
        assert!(!LoadPhase::Retrying.is_terminal());

        assert!(LoadPhase::WaitingForViewport.is_active());
        assert!(LoadPhase::Loading.is_active());
        assert!(!LoadPhase::Idle.is_active());
        assert!(!LoadPhase::Loaded.is_active());

        assert!(LoadPhase::Loaded.is_loaded());
        assert!(!LoadPhase::Loading.is_loaded());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(LoadPhase::WaitingForViewport.to_string(), "Waiting for viewport");
        assert_eq!(LoadPhase::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_transitions_publish_to_watchers() {
        let (tx, rx) = watch::channel(LoadPhase::Idle);
        let state = LoadState::new(Arc::new(tx));

        assert_eq!(state.phase(), LoadPhase::Idle);

        state.transition_to_waiting();
        assert_eq!(*rx.borrow(), LoadPhase::WaitingForViewport);

        state.transition_to_loading();
        state.transition_to_retrying();
        assert_eq!(*rx.borrow(), LoadPhase::Retrying);

        state.transition_to_loading();
        state.transition_to_loaded();
        assert_eq!(state.phase(), LoadPhase::Loaded);
    }
}
