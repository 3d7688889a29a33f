//! Domain layer with core entities and port definitions.

/// Error types.
pub mod errors;
/// Consumer notifications.
pub mod events;
/// Layout geometry.
pub mod geometry;
/// Lifecycle token.
pub mod lifecycle;
/// Load phase and machine-owned state.
pub mod load_state;
/// Port definitions.
pub mod ports;
/// Retry policy configuration.
pub mod retry;
/// Host surface triggers.
pub mod trigger;

pub use errors::{ConfigError, FetchError, MachineError};
pub use events::LoadEvent;
pub use geometry::{Rect, ViewportSize};
pub use lifecycle::MountToken;
pub use load_state::{LoadPhase, LoadState};
pub use ports::{ImageFetchPort, LayoutQueryPort};
pub use retry::{Accumulation, RetryPolicy};
pub use trigger::TriggerKind;
