//! Loader configuration surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::retry::RetryPolicy;

const DEFAULT_THROTTLE_MS: u64 = 150;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Configuration accepted by the load machine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// URL of the image to acquire.
    pub src: String,

    /// Defer fetching until the tracked element is visible.
    #[serde(default = "default_true")]
    pub lazy: bool,

    /// Interval rate-limiting the visibility checks, in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Request timeout handed to the network adapter, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Retry policy for failed fetches.
    #[serde(default)]
    pub retry: RetryPolicy,
}

const fn default_true() -> bool {
    true
}

const fn default_throttle_ms() -> u64 {
    DEFAULT_THROTTLE_MS
}

const fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl LoaderConfig {
    /// Creates a configuration for `src` with every other field defaulted.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            lazy: true,
            throttle_ms: DEFAULT_THROTTLE_MS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }

    /// Enables or disables lazy activation.
    #[must_use]
    pub const fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Sets the throttle interval in milliseconds.
    #[must_use]
    pub const fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    /// Sets the fetch timeout in seconds.
    #[must_use]
    pub const fn with_fetch_timeout_secs(mut self, fetch_timeout_secs: u64) -> Self {
        self.fetch_timeout_secs = fetch_timeout_secs;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.src.trim().is_empty() {
            return Err(ConfigError::MissingSource);
        }
        if self.throttle_ms == 0 {
            return Err(ConfigError::InvalidThrottleInterval);
        }
        self.retry.validate()
    }

    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    /// Returns `ConfigError::ParseFailed` for malformed documents, or the
    /// validation error for well-formed but invalid ones.
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigError::parse_failed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Throttle interval as a duration.
    #[must_use]
    pub const fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Fetch timeout as a duration.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::retry::Accumulation;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::new("https://example.com/a.png");
        assert!(config.lazy);
        assert_eq!(config.throttle_ms, 150);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = LoaderConfig::new("https://example.com/a.png")
            .with_lazy(false)
            .with_throttle_ms(50)
            .with_retry(RetryPolicy::new().with_max_attempts(2));

        assert!(!config.lazy);
        assert_eq!(config.throttle_interval(), Duration::from_millis(50));
        assert_eq!(config.retry.max_attempts, 2);
    }

    #[test]
    fn test_rejects_empty_source() {
        assert_eq!(
            LoaderConfig::new("").validate(),
            Err(ConfigError::MissingSource)
        );
        assert_eq!(
            LoaderConfig::new("   ").validate(),
            Err(ConfigError::MissingSource)
        );
    }

    #[test]
    fn test_rejects_zero_throttle() {
        let config = LoaderConfig::new("https://example.com/a.png").with_throttle_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidThrottleInterval));
    }

    #[test]
    fn test_rejects_invalid_retry_delay() {
        let config = LoaderConfig::new("https://example.com/a.png")
            .with_retry(RetryPolicy::new().with_initial_delay_secs(0.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRetryDelay { .. })
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let config = LoaderConfig::from_toml_str(
            r#"
            src = "https://example.com/a.png"
            lazy = false

            [retry]
            max_attempts = 3
            initial_delay_secs = 1.5
            accumulation = "add"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.src, "https://example.com/a.png");
        assert!(!config.lazy);
        assert_eq!(config.throttle_ms, 150);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.accumulation, Accumulation::Add);
    }

    #[test]
    fn test_from_toml_str_requires_src() {
        let result = LoaderConfig::from_toml_str("lazy = true");
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }

    #[test]
    fn test_from_toml_str_validates() {
        let result = LoaderConfig::from_toml_str("src = \"\"");
        assert_eq!(result, Err(ConfigError::MissingSource));
    }
}
