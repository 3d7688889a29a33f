//! Lifecycle token guarding post-teardown effects.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared token tracking whether a machine instance is still mounted.
///
/// Every task the machine spawns holds a clone and checks it before
/// producing an observable effect; a timer or fetch completing after
/// teardown is silently dropped.
#[derive(Debug, Clone, Default)]
pub struct MountToken {
    mounted: Arc<AtomicBool>,
}

impl MountToken {
    /// Creates a token in the unmounted state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the instance as mounted.
    pub fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
    }

    /// Marks the instance as unmounted.
    ///
    /// Idempotent; all clones observe the change immediately.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Returns true while transitions may produce observable effects.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unmounted() {
        assert!(!MountToken::new().is_mounted());
    }

    #[test]
    fn test_clones_share_state() {
        let token = MountToken::new();
        let clone = token.clone();

        token.mount();
        assert!(clone.is_mounted());

        clone.unmount();
        assert!(!token.is_mounted());

        clone.unmount();
        assert!(!token.is_mounted());
    }
}
