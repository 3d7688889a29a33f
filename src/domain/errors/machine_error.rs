//! Machine lifecycle error definitions.

use thiserror::Error;

/// Misuse of the machine handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// `start` was called a second time on the same instance.
    #[error("load machine already started")]
    AlreadyStarted,
}
