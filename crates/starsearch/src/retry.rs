//! Shared wait and backoff utilities.
//!
//! The page walk uses a fixed courtesy delay between requests and the
//! enrichment run retries failed page fetches with a fixed delay and a capped
//! number of attempts. Both are expressed here so callers never sleep on a
//! magic constant.

use std::time::Duration;

use backon::{BackoffBuilder, ConstantBuilder};

/// Default delay between starred-repository page requests.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;

/// Default delay between attempts to fetch a repository page.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Default number of fetch attempts per repository page.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Configuration for per-item retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }

    /// Number of retries allowed after the first attempt.
    #[must_use]
    pub fn retries(&self) -> usize {
        self.max_attempts.saturating_sub(1) as usize
    }

    /// Build a constant backoff strategy from this configuration.
    ///
    /// The strategy yields one delay per allowed retry, so draining it
    /// alongside the attempts gives exactly `max_attempts` fetches.
    #[must_use]
    pub fn into_backoff(self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.retries())
    }

    /// Iterator over the delays to wait before each retry.
    pub fn delays(self) -> impl Iterator<Item = Duration> + Send {
        self.into_backoff().build()
    }
}

/// Suspend the current task for `delay`.
///
/// A zero delay returns immediately without yielding to the timer.
pub async fn wait(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
