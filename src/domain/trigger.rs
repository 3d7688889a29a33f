//! Host surface triggers that can reveal a tracked element.

/// A host-level signal that may have changed the tracked element's
/// visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// The surface finished its initial load.
    Load,
    /// The surface scrolled.
    Scroll,
    /// The surface was resized.
    Resize,
    /// A pinch/zoom gesture ended on a touch device.
    GestureEnd,
}

impl TriggerKind {
    /// Fixed registration order for listener attachment.
    ///
    /// Consumers assert on this order, so it must not change.
    pub const REGISTRATION_ORDER: [Self; 4] =
        [Self::Load, Self::Scroll, Self::Resize, Self::GestureEnd];
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Scroll => write!(f, "scroll"),
            Self::Resize => write!(f, "resize"),
            Self::GestureEnd => write!(f, "gestureend"),
        }
    }
}
