use std::fmt::Display;

use tracing::warn;

/// Bounded retry without backoff. Every error is retried until
/// `max_attempts` invocations have been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

/// The last error seen once a `RetryPolicy` gave up.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl RetryPolicy {
    /// One retry after the first failure.
    pub const INFERENCE: RetryPolicy = RetryPolicy { max_attempts: 2 };

    /// `max_attempts` is clamped to at least one invocation.
    pub fn new(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts: max_attempts.max(1) }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `op` until it succeeds or the attempt budget is spent. `op`
    /// receives the 1-based attempt number.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, RetryExhausted<E>>
    where
        E: Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "attempt failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(RetryExhausted { attempts: attempt, last: err }),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::INFERENCE
    }
}
