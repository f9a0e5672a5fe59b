use std::sync::Arc;

use tokio::task::JoinHandle;

use super::item::{ItemOutcome, run_item};
use super::{EnrichOptions, PageFetcher};
use crate::progress::{Progress, ProgressCallback, emit};
use crate::retry::RetryConfig;
use crate::{RepoPage, StarredRepo};

/// Result of an enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichResult {
    /// One record per dispatched repository, in batch order then input order.
    pub pages: Vec<RepoPage>,
    /// How many of `pages` are network-error placeholders.
    pub failed: usize,
    /// Input position of the first incomplete repository, if the scan stopped early.
    pub truncated_at: Option<usize>,
    /// Number of batches dispatched.
    pub batches: usize,
}

impl EnrichResult {
    /// Records holding real page content.
    pub fn enriched(&self) -> usize {
        self.pages.len() - self.failed
    }
}

/// Enrich `repos` in fixed-size concurrent batches.
///
/// Repositories are scanned left to right. The scan stops at the first entry
/// with an empty name or url; a partially filled batch at that point is not
/// dispatched. A batch is dispatched when it is full or when the last input
/// item joins it, and the next batch starts only after every repository in the
/// current batch has reached a terminal state.
///
/// Never fails: repositories whose attempts are exhausted (or whose task
/// panicked) are recorded with [`RepoPage::network_error`].
pub async fn enrich_all(
    fetcher: Arc<dyn PageFetcher>,
    repos: &[StarredRepo],
    options: &EnrichOptions,
    on_progress: Option<Arc<ProgressCallback>>,
) -> EnrichResult {
    let batch_size = options.batch_size.max(1);
    let retry = options.retry();
    let total = repos.len();

    let mut result = EnrichResult {
        pages: Vec::with_capacity(total),
        ..Default::default()
    };
    let mut batch: Vec<StarredRepo> = Vec::with_capacity(batch_size);
    let mut dispatched = 0usize;

    for (index, repo) in repos.iter().enumerate() {
        if !repo.is_complete() {
            tracing::warn!(
                index,
                pending = batch.len(),
                "Stopping at repository with missing name or url"
            );
            emit(on_progress.as_deref(), Progress::IntakeTruncated { index });
            result.truncated_at = Some(index);
            break;
        }

        batch.push(repo.clone());

        let is_last = index + 1 == total;
        if batch.len() < batch_size && !is_last {
            continue;
        }

        let first = dispatched + 1;
        let last = dispatched + batch.len();
        tracing::debug!(first, last, total, "Dispatching batch");
        emit(
            on_progress.as_deref(),
            Progress::CrawlingBatch {
                first,
                last,
                total,
                final_batch: is_last,
            },
        );

        let outcomes = run_batch(&fetcher, std::mem::take(&mut batch), retry, &on_progress).await;
        for (repo, outcome) in outcomes {
            if outcome.failed {
                result.failed += 1;
                emit(
                    on_progress.as_deref(),
                    Progress::ItemFailed {
                        name: repo.name,
                        url: repo.url,
                        attempts: outcome.attempts,
                    },
                );
            }
            result.pages.push(outcome.page);
        }

        dispatched = last;
        result.batches += 1;
    }

    tracing::debug!(
        enriched = result.enriched(),
        failed = result.failed,
        batches = result.batches,
        "Crawl complete"
    );
    emit(
        on_progress.as_deref(),
        Progress::CrawlComplete {
            enriched: result.enriched(),
            failed: result.failed,
        },
    );

    result
}

/// Run every repository in `batch` concurrently and wait for all of them.
///
/// Outcomes are returned in input order regardless of completion order.
async fn run_batch(
    fetcher: &Arc<dyn PageFetcher>,
    batch: Vec<StarredRepo>,
    retry: RetryConfig,
    on_progress: &Option<Arc<ProgressCallback>>,
) -> Vec<(StarredRepo, ItemOutcome)> {
    let mut handles: Vec<(StarredRepo, JoinHandle<ItemOutcome>)> = Vec::with_capacity(batch.len());

    for repo in batch {
        let fetcher = Arc::clone(fetcher);
        let on_progress = on_progress.clone();
        let task_repo = repo.clone();

        let handle = tokio::spawn(async move {
            run_item(fetcher.as_ref(), &task_repo, retry, on_progress.as_deref()).await
        });
        handles.push((repo, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (repo, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(repo = %repo.name, error = %e, "Fetch task failed");
                emit(
                    on_progress.as_deref(),
                    Progress::Warning {
                        message: format!("fetch task for {} failed: {e}", repo.name),
                    },
                );
                ItemOutcome {
                    page: RepoPage::network_error(&repo),
                    attempts: 0,
                    failed: true,
                }
            }
        };
        outcomes.push((repo, outcome));
    }

    outcomes
}
