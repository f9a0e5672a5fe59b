//! Progress reporting for the fetch and enrichment pipelines.
//!
//! Both pipelines emit [`Progress`] events through an optional callback so the
//! CLI can render them as progress bars on a terminal or as structured log
//! lines otherwise.

/// Progress events emitted while fetching and enriching starred repositories.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Progress {
    /// Starting to walk the starred repositories list.
    FetchingStars {
        /// Page size requested from the API.
        page_size: usize,
    },

    /// Fetched one page of starred repositories.
    FetchedPage {
        /// 1-based page number.
        page: u32,
        /// Number of repositories on this page.
        count: usize,
        /// Running total of repositories fetched so far.
        total_so_far: usize,
        /// Total starred repositories reported by the API.
        total_count: usize,
    },

    /// Every starred repository reported by the API has been fetched.
    FetchComplete {
        /// Repositories collected across all pages.
        total: usize,
    },

    /// A page failed and the walk stopped early.
    FetchFailed {
        /// The page that failed (1-indexed).
        page: u32,
        /// Repositories accumulated before the failing page.
        fetched: usize,
        /// Error message.
        error: String,
    },

    /// A batch of repositories was dispatched for page crawling.
    CrawlingBatch {
        /// Position of the first repository in the batch (1-indexed).
        first: usize,
        /// Position of the last repository in the batch (1-indexed, inclusive).
        last: usize,
        /// Number of repositories handed to the enrichment run.
        total: usize,
        /// Whether this is the last batch of the run.
        final_batch: bool,
    },

    /// A repository page fetch failed and will be retried.
    ItemRetry {
        /// Repository name.
        name: String,
        /// The attempt about to be made (2 for the first retry).
        attempt: u32,
        /// Time to wait before the retry (ms).
        retry_after_ms: u64,
        /// Error message from the failed attempt.
        error: String,
    },

    /// A repository exhausted its attempts and was recorded as a network error.
    ItemFailed {
        /// Repository name.
        name: String,
        /// Repository URL.
        url: String,
        /// Number of fetch attempts made.
        attempts: u32,
    },

    /// The enrichment intake stopped at a record missing its name or URL.
    IntakeTruncated {
        /// Position of the rejected record (0-indexed).
        index: usize,
    },

    /// Enrichment finished.
    CrawlComplete {
        /// Number of pages recorded with real content.
        enriched: usize,
        /// Number of placeholder records among them.
        failed: usize,
    },

    /// Something went wrong that did not stop the run.
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Callback for progress updates.
pub type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

/// Forward `event` to `on_progress` when one is registered.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: Progress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
