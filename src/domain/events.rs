//! Consumer-facing notifications.

use std::time::Duration;

use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Message sent to the consumer as an acquisition progresses.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    /// The image arrived; the surface can draw it.
    Loaded {
        /// Raw image bytes as fetched. Decoding is the consumer's concern.
        bytes: Bytes,
    },
    /// A fetch attempt failed and a retry is pending.
    Retrying {
        /// 1-based index of the scheduled retry.
        attempt: u32,
        /// Wait before the retry fires.
        delay: Duration,
    },
    /// Retries are exhausted. Terminal.
    Failed {
        /// Total fetch attempts made, including the first.
        attempts: u32,
        /// The failure that exhausted the budget.
        error: FetchError,
    },
}

impl LoadEvent {
    /// Returns true for events that end the acquisition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Failed { .. })
    }
}
