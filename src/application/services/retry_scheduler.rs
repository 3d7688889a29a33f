//! Retry bookkeeping and the pending retry timer.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::domain::retry::{Accumulation, RetryPolicy};

/// Owns the retry count, the running delay, and at most one pending timer.
///
/// The delay grows *after* a timer fires, from the delay value that was
/// actually used, so `Multiply` with an initial delay of 2 produces waits
/// of 2, 4, 8, ... seconds.
#[derive(Debug)]
pub struct RetryScheduler {
    policy: RetryPolicy,
    retry_count: u32,
    retry_delay_secs: f64,
    pending: Option<JoinHandle<()>>,
}

impl RetryScheduler {
    /// Creates a scheduler for a validated policy.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            retry_count: 1,
            retry_delay_secs: policy.initial_delay_secs,
            pending: None,
        }
    }

    /// Returns true while the retry budget allows another attempt.
    #[must_use]
    pub const fn should_retry(&self) -> bool {
        self.retry_count <= self.policy.max_attempts
    }

    /// 1-based index of the next retry.
    #[must_use]
    pub const fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Delay the next retry will wait.
    ///
    /// Saturates when the accumulated delay no longer fits a `Duration`.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.retry_delay_secs).unwrap_or(Duration::MAX)
    }

    /// Returns true while a timer is armed.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arms a one-shot timer for the current delay.
    ///
    /// Returns false without scheduling when the budget is exhausted; the
    /// caller then transitions to its failed state. `on_fire` runs on a
    /// timer task once the delay elapses.
    pub fn schedule_retry(&mut self, on_fire: impl FnOnce() + Send + 'static) -> bool {
        if !self.should_retry() {
            return false;
        }

        let delay = self.current_delay();
        debug!(
            attempt = self.retry_count,
            delay_secs = self.retry_delay_secs,
            "retry scheduled"
        );

        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            on_fire();
        }));
        true
    }

    /// Consumes the fired timer, then advances the count and the delay.
    pub fn on_timer_fired(&mut self) {
        self.pending = None;
        self.retry_count += 1;
        self.retry_delay_secs = match self.policy.accumulation {
            Accumulation::Multiply => self.retry_delay_secs * self.policy.initial_delay_secs,
            Accumulation::Add => self.retry_delay_secs + self.policy.initial_delay_secs,
            Accumulation::Fixed => self.policy.initial_delay_secs,
        };
    }

    /// Clears any armed timer; safe when none is pending.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for RetryScheduler {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use test_case::test_case;

    fn policy(accumulation: Accumulation, initial: f64, max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_initial_delay_secs(initial)
            .with_accumulation(accumulation)
    }

    #[test_case(Accumulation::Multiply, 2.0, &[2.0, 4.0, 8.0, 16.0]; "multiply compounds the running delay")]
    #[test_case(Accumulation::Add, 2.0, &[2.0, 4.0, 6.0, 8.0]; "add grows linearly")]
    #[test_case(Accumulation::Fixed, 2.0, &[2.0, 2.0, 2.0, 2.0]; "fixed never grows")]
    fn test_delay_sequence(accumulation: Accumulation, initial: f64, expected: &[f64]) {
        let mut scheduler = RetryScheduler::new(policy(accumulation, initial, 10));

        for &secs in expected {
            assert_eq!(scheduler.current_delay(), Duration::from_secs_f64(secs));
            scheduler.on_timer_fired();
        }
    }

    #[test]
    fn test_budget_bounds() {
        let mut scheduler = RetryScheduler::new(policy(Accumulation::Multiply, 2.0, 2));

        assert!(scheduler.should_retry());
        scheduler.on_timer_fired();
        assert_eq!(scheduler.retry_count(), 2);
        assert!(scheduler.should_retry());
        scheduler.on_timer_fired();
        assert_eq!(scheduler.retry_count(), 3);
        assert!(!scheduler.should_retry());
    }

    #[tokio::test]
    async fn test_exhausted_budget_does_not_schedule() {
        let mut scheduler = RetryScheduler::new(policy(Accumulation::Multiply, 2.0, 0));

        assert!(!scheduler.should_retry());
        assert!(!scheduler.schedule_retry(|| unreachable!("budget is empty")));
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_current_delay() {
        let mut scheduler = RetryScheduler::new(policy(Accumulation::Fixed, 2.0, 8));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        assert!(scheduler.schedule_retry(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(scheduler.has_pending());

        // Let the spawned timer task run once so its `sleep` registers before
        // we manually advance the paused clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_suppresses_fire() {
        let mut scheduler = RetryScheduler::new(policy(Accumulation::Fixed, 2.0, 8));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        scheduler.schedule_retry(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.cancel_pending();
        assert!(!scheduler.has_pending());

        scheduler.cancel_pending();

        tokio::time::advance(Duration::from_secs(60)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
