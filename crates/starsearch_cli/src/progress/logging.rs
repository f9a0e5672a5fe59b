use starsearch::Progress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: Progress) {
        match event {
            Progress::FetchingStars { page_size } => {
                tracing::info!(page_size, "Fetching starred repositories");
            }

            Progress::FetchedPage {
                page,
                count,
                total_so_far,
                total_count,
            } => {
                tracing::info!(
                    page,
                    count,
                    total_so_far,
                    total_count,
                    "Fetched starred repositories [{total_so_far}/{total_count}]"
                );
            }

            Progress::FetchComplete { total } => {
                tracing::info!(total, "Fetched all starred repositories");
            }

            Progress::FetchFailed {
                page,
                fetched,
                error,
            } => {
                tracing::error!(page, fetched, error = %error, "Starred repository walk failed");
            }

            Progress::CrawlingBatch {
                first,
                last,
                total,
                final_batch,
            } => {
                tracing::info!(
                    first,
                    last,
                    total,
                    final_batch,
                    "Crawling page content No. [{first}-{last}/{total}]"
                );
            }

            Progress::ItemRetry {
                name,
                attempt,
                retry_after_ms,
                error,
            } => {
                tracing::info!(
                    repo = %name,
                    attempt,
                    retry_after_ms,
                    error = %error,
                    "network error, retrying"
                );
            }

            Progress::ItemFailed {
                name,
                url,
                attempts,
            } => {
                tracing::warn!(repo = %name, url = %url, attempts, "Recorded as network error");
            }

            Progress::IntakeTruncated { index } => {
                tracing::warn!(index, "Repository list has an entry without name or url, stopping there");
            }

            Progress::CrawlComplete { enriched, failed } => {
                tracing::info!(enriched, failed, "Crawl complete");
            }

            Progress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
