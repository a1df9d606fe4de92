//! Fixed-count, fixed-delay retry policy.
//!
//! One policy object applied around an arbitrary fallible operation, instead
//! of a retry loop re-implemented inside every collaborator. Callers wrap
//! the *whole* connect-through-transfer sequence - never an individual
//! protocol step, since a partially exchanged header cannot be resumed.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry an operation a bounded number of times with a constant delay
/// between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent; returns
    /// the last error when every attempt fails. Each failed attempt is
    /// logged at `warn` before the delay.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt < attempts {
                        tracing::warn!(
                            attempt,
                            max_attempts = attempts,
                            error = %err,
                            "attempt failed, retrying in {:?}",
                            self.delay,
                        );
                        tokio::time::sleep(self.delay).await;
                    } else {
                        tracing::warn!(
                            attempts,
                            error = %err,
                            "all attempts exhausted",
                        );
                    }
                    last_err = Some(err);
                }
            }
        }
        // attempts >= 1, so at least one error was recorded.
        Err(last_err.expect("at least one attempt runs"))
    }
}
