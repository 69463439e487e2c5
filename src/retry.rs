//! Retry with exponential backoff for chat-completion calls.
//!
//! Transient failures (rate limits, timeouts, overload, 5xx) are retried up
//! to [`RetryPolicy::max_attempts`] times. The wait before retry `n` (1-based)
//! is `base_delay * 2^(n-1)`: 5 s, then 10 s with the defaults. Permanent
//! failures return immediately. No wait follows the final attempt.
//!
//! Waiting goes through the [`Sleeper`] trait so tests can record delays
//! instead of sleeping.

use crate::llm::ApiError;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Blocking wait, injectable for tests.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetryError {
    #[error(transparent)]
    Permanent(ApiError),
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: ApiError },
}

/// Run `call` until it succeeds, fails permanently, or attempts run out.
pub fn call_with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut call: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Result<T, ApiError>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(RetryError::Permanent(err)),
            Err(err) if attempt >= attempts => {
                return Err(RetryError::RetriesExhausted {
                    attempts,
                    last: err,
                });
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "API call failed ({err}), retry {attempt}/{} in {}s",
                    attempts - 1,
                    delay.as_secs()
                );
                sleeper.sleep(delay);
                attempt += 1;
            }
        }
    }
}
