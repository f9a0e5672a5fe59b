//! GitHub API access for the viewer's starred repositories.
//!
//! # Module Structure
//!
//! - [`error`] - Error types, including the partial-walk error
//! - [`types`] - GraphQL request/response shapes and page types
//! - [`client`] - Authenticated client and single-page fetch
//! - [`pagination`] - The full cursor walk with courtesy delays
//!
//! ```ignore
//! use starsearch::github::{GitHubClient, PaginateOptions};
//!
//! let client = GitHubClient::new(&token)?;
//! let fetch = client.fetch_all_starred(&PaginateOptions::default(), None).await?;
//! println!("{} starred repositories", fetch.repos.len());
//! ```

mod client;
mod error;
mod pagination;
mod types;

pub use client::GitHubClient;
pub use error::{GitHubError, PartialFetchError};
pub use pagination::{PaginateOptions, StarredFetch};
pub use types::{GITHUB_GRAPHQL_URL, MAX_PAGE_SIZE, PageInfo, StarredPage};
