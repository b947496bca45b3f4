//! Retry policy for optimistic transactions
//!
//! Concurrent writes to one dataset conflict on its search document row.
//! The loser re-runs from scratch: it re-reads the row, recomputes the
//! postings and commits again. Those conflicts clear within a few attempts,
//! so the default backoff starts at one millisecond and stays short.
//!
//! Only `Error::TransactionConflict` is retried; every other error surfaces
//! immediately.

use std::time::Duration;

use catalogue_core::Error;

/// When and how long to wait before re-running a conflicting transaction
///
/// # Example
/// ```
/// use std::time::Duration;
/// use catalogue_storage::RetryConfig;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_backoff(Duration::from_millis(1), Duration::from_millis(20));
/// assert_eq!(config.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Re-runs allowed after the first attempt (0 = no retries)
    pub max_retries: usize,
    /// Wait before the first re-run; doubled for each further one
    pub base_delay: Duration,
    /// Upper bound of any single wait
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 8,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(50),
        }
    }
}

impl RetryConfig {
    /// Default policy: 8 re-runs, 1 ms doubling up to 50 ms
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface the first conflict to the caller
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Re-run up to `max_retries` times without sleeping
    ///
    /// For heavily contended writers where a conflict is resolved by the
    /// time the loser re-reads.
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Builder: set the number of re-runs
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Builder: set the first wait and the cap
    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Whether `error`, raised by 0-based attempt `attempt`, earns a re-run
    pub(crate) fn should_retry(&self, error: &Error, attempt: usize) -> bool {
        error.is_conflict() && attempt < self.max_retries
    }

    /// Wait after 0-based attempt `attempt` failed
    pub(crate) fn delay_for(&self, attempt: usize) -> Duration {
        let factor = u32::try_from(attempt)
            .ok()
            .and_then(|shift| 1u32.checked_shl(shift))
            .unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}
