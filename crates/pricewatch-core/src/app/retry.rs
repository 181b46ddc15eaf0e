//! Retry policy: how many times a delivery is attempted and how long to wait.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Fixed linear retry.
///
/// No backoff: every retry waits the same `delay`. `max_attempts` counts the
/// first try, so `max_attempts = 3` means one try plus two retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// All attempts failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Retry immediately (tests).
    pub fn immediate(max_attempts: u32) -> Self {
        Self::fixed(max_attempts, Duration::ZERO)
    }

    /// Delay before the next try, or `None` when the budget is spent.
    ///
    /// # Arguments
    /// * `attempts` - Number of attempts already made (1-indexed).
    ///
    /// A policy with `max_attempts = 0` still makes one attempt.
    pub fn next_delay(&self, attempts: u32) -> Option<Duration> {
        if attempts >= self.max_attempts.max(1) {
            None
        } else {
            Some(self.delay)
        }
    }

    /// Run `op` until it succeeds or the budget is spent.
    ///
    /// Returns the number of attempts used on success.
    pub async fn run<E, F, Fut>(&self, mut op: F) -> Result<u32, Exhausted<E>>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let err = match op().await {
                Ok(()) => return Ok(attempts),
                Err(e) => e,
            };
            let Some(delay) = self.next_delay(attempts) else {
                return Err(Exhausted {
                    attempts,
                    last_error: err,
                });
            };
            tracing::warn!(
                attempt = attempts,
                max_attempts = self.max_attempts,
                error = %err,
                "attempt failed, retrying in {delay:?}"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, 2 seconds apart.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(2))
    }
}
