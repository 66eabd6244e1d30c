//! Exponential backoff policy for transient transport failures.

use std::time::Duration;

/// Backoff schedule: delay for attempt `n` is `base_delay * factor^n`, capped
/// at `max_delay`. Used by the transports to retry transport-level failures
/// (connect, timeout); HTTP status codes are never retried.
#[derive(Debug, Clone)]
pub struct Backoff {
    max_retries: u32,
    base_delay: Duration,
    factor: f64,
    max_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            factor: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl Backoff {
    pub fn new(max_retries: u32, base_delay: Duration, factor: f64, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            factor,
            max_delay,
        }
    }

    /// Number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the retry following failed attempt `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = self.factor.powi(attempt as i32);
        let delay = self.base_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    /// Sleep the current thread for the delay of `attempt`.
    pub fn sleep(&self, attempt: u32) {
        let delay = self.delay(attempt);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    /// Async variant of [`sleep`](Self::sleep).
    pub async fn sleep_async(&self, attempt: u32) {
        let delay = self.delay(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
