//! Repository page crawler.
//!
//! [`GitHubPageFetcher`] is the production [`PageFetcher`]: it downloads the
//! repository's HTML page and pulls out the "About" text and the rendered
//! readme.

mod extract;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;

use crate::enrich::PageFetcher;
use crate::http::ReqwestTransport;
use crate::{HttpRequest, HttpTransport, RepoPage, StarredRepo};

pub use extract::{PageText, extract_page_text};

const USER_AGENT: &str = "starsearch";

/// Errors from fetching a single repository page.
///
/// Every variant is treated the same way by the enrichment run: it counts as
/// one failed attempt.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("empty response body from {0}")]
    EmptyBody(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Fetches repository pages from github.com.
#[derive(Clone)]
pub struct GitHubPageFetcher {
    transport: Arc<dyn HttpTransport>,
}

impl GitHubPageFetcher {
    /// Create a fetcher backed by reqwest with a 30 second request timeout.
    pub fn new() -> Result<Self, CrawlError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| CrawlError::Client(e.to_string()))?;
        Ok(Self::new_with_transport(Arc::new(transport)))
    }

    pub fn new_with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PageFetcher for GitHubPageFetcher {
    async fn fetch(&self, repo: &StarredRepo) -> Result<RepoPage, CrawlError> {
        let request = HttpRequest::get(&repo.url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| CrawlError::Http(e.to_string()))?;

        if !response.is_success() {
            return Err(CrawlError::Status {
                status: response.status,
                url: repo.url.clone(),
            });
        }

        if response.body.is_empty() {
            return Err(CrawlError::EmptyBody(repo.url.clone()));
        }

        let body = response.text();
        let text = extract_page_text(&body);
        tracing::debug!(
            repo = %repo.name,
            description_len = text.description.len(),
            readme_len = text.readme.len(),
            "Crawled repository page"
        );

        Ok(RepoPage {
            url: repo.url.clone(),
            name: repo.name.clone(),
            description: text.description,
            readme: text.readme,
        })
    }
}
