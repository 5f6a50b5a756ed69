//! Retry policy and the sleep seam used for backoff.

use std::future::Future;
use std::time::Duration;

/// Default number of attempts per request.
const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base backoff delay.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How many times to try a request and how long to wait in between.
///
/// Backoff is linear: after attempt `i` (zero-based) the client waits
/// `(i + 1) * base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Backoff to wait after the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }

    /// Whether `attempt` is the last one this policy allows.
    pub fn is_final(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) >= self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}

/// Something that can wait.
///
/// The client sleeps through this trait so tests can record backoff
/// instead of spending wall-clock time on it.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
