//! Fetch failure definitions.

use thiserror::Error;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// A single fetch attempt failed.
///
/// Every variant is transient from the machine's point of view: it is
/// retried until the scheduler's budget runs out, and only then surfaced to
/// the consumer inside the terminal failure notification.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("network error: {message}")]
    Network {
        /// Transport diagnostic.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("unexpected status: HTTP {code}")]
    Status {
        /// HTTP status code.
        code: u16,
    },

    /// The response body could not be read.
    #[error("failed to read body: {message}")]
    Body {
        /// Transport diagnostic.
        message: String,
    },
}

impl FetchError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a body-read error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body {
            message: message.into(),
        }
    }

    /// HTTP status code, when the failure carries one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        if let Self::Status { code } = self {
            Some(*code)
        } else {
            None
        }
    }
}
