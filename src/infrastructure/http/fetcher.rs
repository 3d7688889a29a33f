//! HTTP adapter for the image fetch port.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::ports::ImageFetchPort;

/// Fetches images over HTTP with a shared client.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with the given request timeout.
    ///
    /// # Errors
    /// Returns a network error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<Bytes> {
        debug!(url = %url, "downloading image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                code: response.status().as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = HttpImageFetcher::new(Duration::from_secs(30));
        assert!(fetcher.is_ok());
    }
}
