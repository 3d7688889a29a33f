//! Rate limiting for high-frequency callbacks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Callback wrapped by a [`Throttle`].
pub type ThrottledCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
struct ThrottleState {
    next_allowed: Instant,
    trailing_scheduled: bool,
}

/// Invocable proxy forwarding at most one underlying call per interval.
///
/// The first call in an idle interval fires immediately; calls arriving
/// inside the interval are coalesced into a single trailing call.
/// `cancel` suppresses a trailing call that has not fired yet and
/// permanently spends the proxy; a spent proxy is never reused.
#[derive(Clone)]
pub struct Throttle {
    callback: ThrottledCallback,
    interval: Duration,
    state: Arc<Mutex<ThrottleState>>,
    cancelled: Arc<AtomicBool>,
}

impl Throttle {
    /// Wraps `callback` with an interval-based rate limit.
    pub fn new(interval: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            interval,
            state: Arc::new(Mutex::new(ThrottleState {
                next_allowed: Instant::now(),
                trailing_scheduled: false,
            })),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Invokes the proxy.
    ///
    /// Must be called from within a tokio runtime; the trailing call is
    /// scheduled on a timer task.
    pub fn call(&self) {
        if self.is_cancelled() {
            return;
        }

        let now = Instant::now();
        let fire_at = {
            let mut state = self.state.lock();
            if now >= state.next_allowed {
                state.next_allowed = now + self.interval;
                None
            } else if state.trailing_scheduled {
                return;
            } else {
                state.trailing_scheduled = true;
                Some(state.next_allowed)
            }
        };

        match fire_at {
            None => (self.callback)(),
            Some(fire_at) => {
                let callback = self.callback.clone();
                let cancelled = self.cancelled.clone();
                let state = self.state.clone();
                let interval = self.interval;

                tokio::spawn(async move {
                    tokio::time::sleep_until(fire_at).await;
                    {
                        let mut state = state.lock();
                        state.trailing_scheduled = false;
                        state.next_allowed = Instant::now() + interval;
                    }
                    if !cancelled.load(Ordering::SeqCst) {
                        callback();
                    }
                });
            }
        }
    }

    /// Suppresses any scheduled-but-unfired call and spends the proxy.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once the proxy has been spent.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
