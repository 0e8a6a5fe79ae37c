//! Bounded retry with a fixed backoff.

use crate::error::Error;
use std::time::Duration;

/// Default number of attempts, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Result of a single attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The attempt produced a value; stop.
    Success(T),
    /// The call succeeded but carried nothing usable; try again.
    Empty,
    /// The call failed; try again.
    Failed(Error),
}

impl<T> From<crate::Result<Option<T>>> for Attempt<T> {
    fn from(result: crate::Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Self::Success(value),
            Ok(None) => Self::Empty,
            Err(e) => Self::Failed(e),
        }
    }
}

/// Retry policy: a fixed number of attempts separated by a fixed pause.
///
/// Every failure is retried the same way. Service overload only changes
/// the log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Five attempts, five seconds apart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of attempts (at least one).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Run `attempt` until it succeeds or the attempts run out.
    ///
    /// The closure receives the 1-based attempt number. Returns `None` once
    /// every attempt has failed or come back empty. No pause follows the
    /// last attempt.
    pub fn run<T, F>(&self, mut attempt: F) -> Option<T>
    where
        F: FnMut(u32) -> Attempt<T>,
    {
        for number in 1..=self.max_attempts {
            match attempt(number) {
                Attempt::Success(value) => return Some(value),
                Attempt::Empty => {
                    log::warn!(
                        "Attempt {}/{} returned no usable payload",
                        number,
                        self.max_attempts
                    );
                }
                Attempt::Failed(e) if e.is_overload() => {
                    log::warn!(
                        "Attempt {}/{} failed: the model is overloaded",
                        number,
                        self.max_attempts
                    );
                }
                Attempt::Failed(e) => {
                    log::warn!("Attempt {}/{} failed: {}", number, self.max_attempts, e);
                }
            }

            if number < self.max_attempts && !self.backoff.is_zero() {
                log::info!("Retrying in {} seconds...", self.backoff.as_secs_f64());
                std::thread::sleep(self.backoff);
            }
        }

        None
    }
}
