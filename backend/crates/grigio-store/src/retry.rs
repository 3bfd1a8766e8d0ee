//! Bounded-attempt, fixed-delay retries.
//!
//! A policy runs a fallible operation until it succeeds or the attempt budget is
//! spent. Attempts are counted per call to [`RetryPolicy::run`]; nothing is
//! remembered between calls. Delays block the calling thread.

use grigio_configs::RetryPolicySettings;
use std::fmt;
use std::thread;
use std::time::Duration;

/// A unit of work that can be executed repeatedly by a [`RetryPolicy`].
///
/// Each call must be safe to repeat after a failure.
pub trait Retryable {
    type Error;

    fn call(&mut self) -> Result<(), Self::Error>;
}

/// Terminal failure after the attempt budget was spent.
#[derive(Debug)]
pub struct RetryError<E> {
    attempts: u32,
    source: E,
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The error returned by the last attempt.
    pub fn last_error(&self) -> &E {
        &self.source
    }

    pub fn into_last_error(self) -> E {
        self.source
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation failed after {} attempt(s): {}",
            self.attempts, self.source
        )
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy making at most `max_attempts` attempts, sleeping
    /// `delay` between them. A budget of zero is treated as one attempt.
    pub fn fixed_delay(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or the budget is exhausted.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    log::warn!(
                        "Giving up after {} attempt(s): {}",
                        attempt,
                        e
                    );
                    return Err(RetryError {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    log::debug!(
                        "Attempt {}/{} failed, retrying in {:?}: {}",
                        attempt,
                        self.max_attempts,
                        self.delay,
                        e
                    );
                    thread::sleep(self.delay);
                    attempt += 1;
                }
            }
        }
    }

    /// Runs a [`Retryable`] unit until it succeeds or the budget is exhausted.
    pub fn attempt<R>(&self, unit: &mut R) -> Result<(), RetryError<R::Error>>
    where
        R: Retryable,
        R::Error: fmt::Display,
    {
        self.run(|| unit.call())
    }
}

impl From<RetryPolicySettings> for RetryPolicy {
    fn from(settings: RetryPolicySettings) -> Self {
        Self::fixed_delay(settings.max_attempts, settings.delay())
    }
}

impl From<&RetryPolicySettings> for RetryPolicy {
    fn from(settings: &RetryPolicySettings) -> Self {
        Self::from(*settings)
    }
}
