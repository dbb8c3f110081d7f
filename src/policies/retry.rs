//! # Retry policy for transiently failing remote calls.
//!
//! [`RetryPolicy`] controls how long to wait before retrying and how many
//! retries are allowed. It is parameterized by:
//! - [`RetryPolicy::interval`] the base delay;
//! - [`RetryPolicy::multiplier`] the multiplicative growth factor;
//! - [`RetryPolicy::max_retries`] the retry budget per failing call.
//!
//! The delay for attempt `n` (0-indexed) is `interval × multiplier^n`. The base is
//! derived purely from the attempt number, so the sequence is deterministic and
//! monotonically non-decreasing whenever `multiplier >= 1.0`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use perfrun::RetryPolicy;
//!
//! let retry = RetryPolicy {
//!     interval: Duration::from_secs(10),
//!     multiplier: 2.0,
//!     max_retries: 3,
//! };
//!
//! assert_eq!(retry.next_delay(0), Duration::from_secs(10));
//! assert_eq!(retry.next_delay(2), Duration::from_secs(40));
//!
//! assert!(retry.should_retry(2));
//! assert!(!retry.should_retry(3)); // budget exhausted
//! ```

use std::time::Duration;

use tokio::time::Instant;

/// Retry policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub interval: Duration,
    /// Multiplicative growth factor (`>= 1.0`).
    pub multiplier: f64,
    /// Maximum number of retries for one failing call (`0` = never retry).
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    /// Returns a policy with:
    /// - `interval = 10s`;
    /// - `multiplier = 1.0` (constant delay);
    /// - `max_retries = 3`.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            multiplier: 1.0,
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    /// Computes the delay before retry number `attempt` (0-indexed).
    ///
    /// # Notes
    /// - If `multiplier` equals 1.0, delay stays constant at `interval`.
    /// - If `multiplier` is greater than 1.0, delays grow exponentially.
    /// - Results that do not fit in a [`Duration`] saturate to [`Duration::MAX`].
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.interval.as_secs_f64() * self.multiplier.powi(exp);

        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Returns `true` while the retry budget allows another try after failure
    /// number `attempt` (0-indexed).
    #[inline]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Failure bookkeeping for one call site.
///
/// Counts consecutive failures of the same call and remembers when the last one
/// happened. A successful call resets it; the start and poll phases each keep
/// their own counter because they are different failure domains.
#[derive(Clone, Copy, Debug, Default)]
pub struct Attempt {
    failures: u32,
    last_failure: Option<Instant>,
}

impl Attempt {
    /// Creates a fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of consecutive failures so far; also the index of the next retry.
    #[inline]
    pub fn index(&self) -> u32 {
        self.failures
    }

    /// Timestamp of the most recent failure, if any.
    #[inline]
    pub fn last_failure(&self) -> Option<Instant> {
        self.last_failure
    }

    /// Records one more failure.
    pub fn fail(&mut self) {
        self.failures = self.failures.saturating_add(1);
        self.last_failure = Some(Instant::now());
    }

    /// Clears the counter after a successful call.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
