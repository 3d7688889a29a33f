//! Visibility checks for the tracked element.

use std::sync::Arc;

use crate::domain::ports::LayoutQueryPort;

/// Reports whether the tracked element currently intersects the viewport.
///
/// Pure query of the current layout; no side effects, safe to call
/// repeatedly. An element that is not attached yet reports not visible.
#[derive(Clone)]
pub struct ViewportDetector {
    layout: Arc<dyn LayoutQueryPort>,
}

impl ViewportDetector {
    /// Creates a detector over the given layout query.
    #[must_use]
    pub fn new(layout: Arc<dyn LayoutQueryPort>) -> Self {
        Self { layout }
    }

    /// Returns true iff the element's top-left corner is inside the
    /// current viewport.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        let Some(rect) = self.layout.element_rect() else {
            return false;
        };
        rect.top_left_within(self.layout.viewport())
    }
}

impl std::fmt::Debug for ViewportDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportDetector").finish_non_exhaustive()
    }
}
