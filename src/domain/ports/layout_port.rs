//! Port definition for the visibility/geometry query.

use crate::domain::geometry::{Rect, ViewportSize};

/// Port reporting the tracked element's current layout.
///
/// Pure queries of the host surface's current state; safe to call
/// repeatedly and at any time.
pub trait LayoutQueryPort: Send + Sync {
    /// Bounding rectangle of the tracked element, or `None` while the
    /// element is not attached to the surface.
    fn element_rect(&self) -> Option<Rect>;

    /// Current viewport dimensions.
    fn viewport(&self) -> ViewportSize;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    use parking_lot::Mutex;

    /// Mutable layout stub for testing.
    pub struct MockLayout {
        rect: Mutex<Option<Rect>>,
        viewport: Mutex<ViewportSize>,
    }

    impl MockLayout {
        /// Element attached and inside the viewport.
        pub fn visible() -> Self {
            Self {
                rect: Mutex::new(Some(Rect::new(10.0, 10.0, 200.0, 150.0))),
                viewport: Mutex::new(ViewportSize::new(1280.0, 720.0)),
            }
        }

        /// Element attached but scrolled far below the fold.
        pub fn hidden() -> Self {
            let layout = Self::visible();
            *layout.rect.lock() = Some(Rect::new(5000.0, 10.0, 200.0, 150.0));
            layout
        }

        /// Element not attached to the surface at all.
        pub fn detached() -> Self {
            let layout = Self::visible();
            *layout.rect.lock() = None;
            layout
        }

        /// Moves the element in or out of the viewport.
        pub fn set_visible(&self, visible: bool) {
            let top = if visible { 10.0 } else { 5000.0 };
            *self.rect.lock() = Some(Rect::new(top, 10.0, 200.0, 150.0));
        }
    }

    impl LayoutQueryPort for MockLayout {
        fn element_rect(&self) -> Option<Rect> {
            *self.rect.lock()
        }

        fn viewport(&self) -> ViewportSize {
            *self.viewport.lock()
        }
    }
}
