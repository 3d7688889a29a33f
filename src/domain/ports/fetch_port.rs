//! Port definition for the network fetch primitive.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchResult;

/// Port for fetching a remote image.
///
/// Implementations resolve exactly once per call: either the bytes of the
/// fetched resource or a [`crate::domain::errors::FetchError`]. Retry,
/// caching, and deduplication are not this port's concern.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Fetches the resource at `url`.
    async fn fetch(&self, url: &str) -> FetchResult<Bytes>;
}
