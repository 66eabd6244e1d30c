//! Sliding-window rate limiter shared by the blocking and async transports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Enforces at most `max_calls` within a sliding `period`.
///
/// Past call instants are kept in a time-ordered queue; `acquire` prunes
/// entries older than the window and, when the queue is full, sleeps until the
/// oldest entry exits the window before recording the new call. The internal
/// lock is released while sleeping so concurrent callers are not starved.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl Default for RateLimiter {
    /// One call per second.
    fn default() -> Self {
        Self::new(1, Duration::from_secs(1))
    }
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            period,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Try to record a call now. Returns how long to wait when at capacity.
    fn try_acquire(&self) -> Option<Duration> {
        let mut calls = self.calls.lock().expect("rate limiter lock poisoned");
        let now = Instant::now();
        while let Some(front) = calls.front() {
            if now.duration_since(*front) >= self.period {
                calls.pop_front();
            } else {
                break;
            }
        }
        if calls.len() < self.max_calls {
            calls.push_back(now);
            return None;
        }
        let oldest = *calls.front().expect("queue is at capacity");
        Some(self.period.saturating_sub(now.duration_since(oldest)))
    }

    /// Block the current thread until the next call is permitted.
    pub fn acquire(&self) {
        loop {
            match self.try_acquire() {
                None => return,
                Some(wait) => std::thread::sleep(wait),
            }
        }
    }

    /// Async variant of [`acquire`](Self::acquire); suspends the task instead
    /// of blocking the thread.
    pub async fn acquire_async(&self) {
        loop {
            match self.try_acquire() {
                None => return,
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }
}
