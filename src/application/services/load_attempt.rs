//! One outstanding fetch attempt.

use std::sync::Arc;

use bytes::Bytes;
use tracing::trace;

use crate::domain::errors::FetchResult;
use crate::domain::lifecycle::MountToken;
use crate::domain::ports::ImageFetchPort;

/// Drives a single fetch through the injected fetch port.
///
/// Every attempt settles exactly once, asynchronously on the host runtime;
/// callers may not assume ordering relative to code issued after
/// [`LoadAttemptController::attempt`] returns. The controller does not
/// deduplicate in-flight attempts; the machine keeps at most one current.
pub struct LoadAttemptController {
    fetcher: Arc<dyn ImageFetchPort>,
    mount: MountToken,
}

impl LoadAttemptController {
    /// Creates a controller over the given fetch port.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetchPort>, mount: MountToken) -> Self {
        Self { fetcher, mount }
    }

    /// Initiates one fetch of `url`.
    ///
    /// `on_settled` receives the outcome unless the machine was torn down
    /// while the fetch was in flight, in which case the settlement is
    /// swallowed.
    pub fn attempt(&self, url: &str, on_settled: impl FnOnce(FetchResult<Bytes>) + Send + 'static) {
        let fetcher = self.fetcher.clone();
        let mount = self.mount.clone();
        let url = url.to_string();

        tokio::spawn(async move {
            let result = fetcher.fetch(&url).await;
            if mount.is_mounted() {
                on_settled(result);
            } else {
                trace!(url = %url, "fetch settled after teardown, dropped");
            }
        });
    }
}

impl std::fmt::Debug for LoadAttemptController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadAttemptController")
            .field("mounted", &self.mount.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::ports::mocks::MockImageFetcher;

    fn mounted_token() -> MountToken {
        let mount = MountToken::new();
        mount.mount();
        mount
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_asynchronously() {
        let controller = LoadAttemptController::new(
            Arc::new(MockImageFetcher::succeeding()),
            mounted_token(),
        );
        let settled = Arc::new(AtomicUsize::new(0));

        let counter = settled.clone();
        controller.attempt("https://example.com/a.png", move |result| {
            assert!(result.is_ok());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(settled.load(Ordering::SeqCst), 0);
        settle().await;
        assert_eq!(settled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_settles_with_error() {
        let controller =
            LoadAttemptController::new(Arc::new(MockImageFetcher::failing()), mounted_token());
        let settled = Arc::new(AtomicUsize::new(0));

        let counter = settled.clone();
        controller.attempt("https://example.com/a.png", move |result| {
            assert!(result.is_err());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        settle().await;
        assert_eq!(settled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settlement_after_teardown_is_swallowed() {
        let mount = mounted_token();
        let fetcher = Arc::new(
            MockImageFetcher::succeeding().with_latency(std::time::Duration::from_secs(1)),
        );
        let controller = LoadAttemptController::new(fetcher, mount.clone());
        let settled = Arc::new(AtomicUsize::new(0));

        let counter = settled.clone();
        controller.attempt("https://example.com/a.png", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        mount.unmount();
        tokio::time::advance(std::time::Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(settled.load(Ordering::SeqCst), 0);
    }
}
