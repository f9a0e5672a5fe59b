//! Starsearch - search your starred repositories by what they say about themselves.
//!
//! The library is split into two pipelines that run back to back:
//!
//! - [`github`] walks the viewer's starred repositories through the GitHub
//!   GraphQL API, one cursor page at a time, with a courtesy delay between pages.
//! - [`enrich`] takes that list, groups it into fixed-size batches and fetches
//!   each repository's page concurrently within a batch, retrying failures a
//!   bounded number of times before recording a `"network error"` placeholder.
//!
//! Supporting modules provide the repository page scraper ([`crawl`]), JSON
//! persistence for both datasets ([`store`]) and keyword lookup over the
//! enriched content ([`search`]).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starsearch::crawl::GitHubPageFetcher;
//! use starsearch::enrich::{EnrichOptions, enrich_all};
//! use starsearch::github::{GitHubClient, PaginateOptions};
//!
//! let client = GitHubClient::new(&token)?;
//! let repos = match client.fetch_all_starred(&PaginateOptions::default(), None).await {
//!     Ok(fetch) => fetch.repos,
//!     Err(partial) => partial.into_repos(),
//! };
//!
//! let fetcher = Arc::new(GitHubPageFetcher::new()?);
//! let result = enrich_all(fetcher, &repos, &EnrichOptions::default(), None).await;
//! println!("{} pages, {} failed", result.pages.len(), result.failed);
//! ```

pub mod crawl;
pub mod enrich;
pub mod github;
pub mod http;
pub mod progress;
pub mod retry;
pub mod search;
pub mod store;
mod types;

pub use http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport, header_get};
pub use progress::{Progress, ProgressCallback, emit};
pub use types::{NETWORK_ERROR_MARKER, RepoPage, StarredRepo};
