//! Injectable retry policy for transient filesystem failures

use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

use crate::Result;

/// Retry policy for filesystem operations that may fail transiently
/// (lock contention, temporary access denial).
///
/// `max_attempts` bounds the total number of tries; failed attempts are
/// separated by an exponential backoff schedule starting at
/// `initial_delay`. The policy is constructed once and injected into the
/// engine rather than hard-coded at each call site.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; later delays grow exponentially.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(50),
        }
    }
}

/// One failed attempt, as seen by the failure observer.
#[derive(Debug)]
pub struct FailedAttempt<'a> {
    /// 1-based attempt number.
    pub attempt: u32,
    /// The error this attempt produced.
    pub error: &'a crate::Error,
    /// True on the second-to-last attempt: the operation is reported as
    /// escalated-to-error even though one final attempt is still made.
    pub escalated: bool,
}

impl RetryPolicy {
    /// Policy with no delay between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    ///
    /// `on_failure` observes every failed attempt. On exhaustion the last
    /// error is returned and nothing is rolled back; the caller abandons
    /// the entry and moves on.
    pub fn run<T>(
        &self,
        mut op: impl FnMut() -> Result<T>,
        mut on_failure: impl FnMut(&FailedAttempt<'_>),
    ) -> Result<T> {
        let mut schedule = self.schedule();
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(error) => {
                    on_failure(&FailedAttempt {
                        attempt,
                        error: &error,
                        escalated: attempt + 1 == self.max_attempts,
                    });
                    if attempt >= self.max_attempts {
                        return Err(error);
                    }
                    attempt += 1;
                    if let Some(delay) = schedule.next_backoff()
                        && !delay.is_zero()
                    {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }

    fn schedule(&self) -> ExponentialBackoff {
        backoff::ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_delay)
            .with_max_elapsed_time(None)
            .build()
    }
}
