use std::time::Duration;

use super::PageFetcher;
use crate::progress::{Progress, ProgressCallback, emit};
use crate::retry::{self, RetryConfig};
use crate::{RepoPage, StarredRepo};

/// Lifecycle of a single repository fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// About to make fetch attempt `attempt` (1-indexed).
    Pending { attempt: u32 },
    /// Waiting `delay` before making attempt `attempt`.
    Retrying { attempt: u32, delay: Duration },
    /// The fetch succeeded.
    Succeeded(RepoPage),
    /// Every attempt failed; holds the placeholder record.
    Failed(RepoPage),
}

impl ItemState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// Terminal result for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub page: RepoPage,
    /// Number of fetch calls made.
    pub attempts: u32,
    /// Whether `page` is the network-error placeholder.
    pub failed: bool,
}

/// Fetch one repository, retrying with a fixed delay up to `retry.max_attempts` times.
///
/// The fetcher is called at most `max_attempts` times; when every call fails
/// the outcome holds [`RepoPage::network_error`]. With `max_attempts == 0`
/// no fetch is made at all.
pub async fn run_item(
    fetcher: &dyn PageFetcher,
    repo: &StarredRepo,
    retry: RetryConfig,
    on_progress: Option<&ProgressCallback>,
) -> ItemOutcome {
    let mut delays = retry.delays();
    let mut attempts = 0u32;
    let mut state = ItemState::Pending { attempt: 1 };

    loop {
        state = match state {
            ItemState::Pending { attempt } if attempt > retry.max_attempts => {
                ItemState::Failed(RepoPage::network_error(repo))
            }
            ItemState::Pending { attempt } => {
                attempts += 1;
                match fetcher.fetch(repo).await {
                    Ok(page) => ItemState::Succeeded(page),
                    Err(err) => match delays.next() {
                        Some(delay) => {
                            tracing::debug!(
                                repo = %repo.name,
                                attempt = attempt + 1,
                                retry_after_ms = delay.as_millis() as u64,
                                error = %err,
                                "Fetch failed, retrying"
                            );
                            emit(
                                on_progress,
                                Progress::ItemRetry {
                                    name: repo.name.clone(),
                                    attempt: attempt + 1,
                                    retry_after_ms: delay.as_millis() as u64,
                                    error: err.to_string(),
                                },
                            );
                            ItemState::Retrying {
                                attempt: attempt + 1,
                                delay,
                            }
                        }
                        None => {
                            tracing::warn!(
                                repo = %repo.name,
                                attempts,
                                error = %err,
                                "Giving up on repository page"
                            );
                            ItemState::Failed(RepoPage::network_error(repo))
                        }
                    },
                }
            }
            ItemState::Retrying { attempt, delay } => {
                retry::wait(delay).await;
                ItemState::Pending { attempt }
            }
            ItemState::Succeeded(page) => {
                return ItemOutcome {
                    page,
                    attempts,
                    failed: false,
                };
            }
            ItemState::Failed(page) => {
                return ItemOutcome {
                    page,
                    attempts,
                    failed: true,
                };
            }
        };
    }
}
