//! Cursor-paginated walk over the viewer's starred repositories.
//!
//! Pages are requested strictly one after another. Each request waits for the
//! previous page's courtesy delay, and the walk ends when the API stops
//! reporting a next page or a page fails.

use std::time::Duration;

use super::client::GitHubClient;
use super::error::{GitHubError, PartialFetchError};
use super::types::MAX_PAGE_SIZE;
use crate::StarredRepo;
use crate::progress::{Progress, ProgressCallback, emit};
use crate::retry::{self, DEFAULT_PAGE_DELAY_MS};

/// Configuration for a starred-repository walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginateOptions {
    /// Repositories requested per page, capped at the API maximum of 100.
    pub page_size: usize,
    /// Courtesy delay between consecutive page requests.
    pub page_delay: Duration,
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
        }
    }
}

impl PaginateOptions {
    /// Set the courtesy delay between pages.
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
}

/// Result of a completed starred-repository walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarredFetch {
    /// All starred repositories, in API order.
    pub repos: Vec<StarredRepo>,
    /// Total reported by the API on the last page.
    pub total_count: usize,
    /// Number of pages requested.
    pub pages: u32,
}

impl GitHubClient {
    /// Fetch every starred repository, one cursor page at a time.
    ///
    /// On a failing page the walk stops and the error carries the repositories
    /// gathered so far; see [`PartialFetchError::into_repos`].
    pub async fn fetch_all_starred(
        &self,
        options: &PaginateOptions,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<StarredFetch, PartialFetchError> {
        let page_size = options.page_size.clamp(1, MAX_PAGE_SIZE);
        let mut repos: Vec<StarredRepo> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 1u32;

        emit(on_progress, Progress::FetchingStars { page_size });

        let total_count = loop {
            let fetched = match self.fetch_starred_page(cursor.as_deref(), page_size).await {
                Ok(fetched) => fetched,
                Err(source) => return Err(fail(page, repos, source, on_progress)),
            };

            let count = fetched.repos.len();
            let total_count = fetched.total_count;
            repos.extend(fetched.repos);

            tracing::debug!(
                page,
                count,
                total_so_far = repos.len(),
                total_count,
                "Fetched starred page"
            );
            emit(
                on_progress,
                Progress::FetchedPage {
                    page,
                    count,
                    total_so_far: repos.len(),
                    total_count,
                },
            );
            if repos.len() == total_count {
                emit(on_progress, Progress::FetchComplete { total: repos.len() });
            }

            if !fetched.page_info.has_next_page {
                break total_count;
            }

            let Some(next) = fetched.page_info.end_cursor.filter(|c| !c.is_empty()) else {
                return Err(fail(page + 1, repos, GitHubError::MissingCursor, on_progress));
            };

            retry::wait(options.page_delay).await;
            cursor = Some(next);
            page += 1;
        };

        Ok(StarredFetch {
            repos,
            total_count,
            pages: page,
        })
    }
}

fn fail(
    page: u32,
    repos: Vec<StarredRepo>,
    source: GitHubError,
    on_progress: Option<&ProgressCallback>,
) -> PartialFetchError {
    tracing::warn!(page, fetched = repos.len(), error = %source, "Starred walk stopped");
    emit(
        on_progress,
        Progress::FetchFailed {
            page,
            fetched: repos.len(),
            error: source.to_string(),
        },
    );
    PartialFetchError {
        page,
        repos,
        source,
    }
}
