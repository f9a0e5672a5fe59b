//! Batched, retrying enrichment of starred repositories.
//!
//! Repositories are scanned in order and grouped into fixed-size batches.
//! Every repository in a batch is fetched concurrently through a
//! [`PageFetcher`], and the next batch only starts once the whole batch has
//! either succeeded or exhausted its attempts. Failed repositories are kept as
//! `"network error"` placeholders rather than dropped.
//!
//! # Module Structure
//!
//! - [`item`] - Per-repository retry state machine
//! - [`batch`] - Intake scan, batching and result collection

mod batch;
mod item;

use std::time::Duration;

use async_trait::async_trait;

use crate::crawl::CrawlError;
use crate::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, RetryConfig};
use crate::{RepoPage, StarredRepo};

pub use batch::{EnrichResult, enrich_all};
pub use item::{ItemOutcome, ItemState, run_item};

/// Default number of repositories fetched concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Fetches the page content for one repository.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, repo: &StarredRepo) -> Result<RepoPage, CrawlError>;
}

/// Options for an enrichment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Repositories per batch; also the concurrency limit. Zero is treated as one.
    pub batch_size: usize,
    /// Fetch attempts per repository before recording a placeholder.
    pub max_attempts: u32,
    /// Fixed delay between attempts for the same repository.
    pub retry_delay: Duration,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl EnrichOptions {
    /// Retry policy applied to each repository.
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::new(self.retry_delay, self.max_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EnrichOptions::default();
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.max_attempts, 3);
        assert_eq!(options.retry_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_retry_config_from_options() {
        let options = EnrichOptions {
            batch_size: 5,
            max_attempts: 7,
            retry_delay: Duration::from_millis(20),
        };
        assert_eq!(
            options.retry(),
            RetryConfig::new(Duration::from_millis(20), 7)
        );
    }
}
