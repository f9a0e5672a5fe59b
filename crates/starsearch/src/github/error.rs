//! GitHub API error types.

use thiserror::Error;

use crate::StarredRepo;

/// Errors that can occur when interacting with the GitHub GraphQL API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Bad credentials, maybe wrong token")]
    BadCredentials,

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub GraphQL error: {0}")]
    GraphQl(String),

    #[error("GitHub reported another page but returned no cursor")]
    MissingCursor,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GitHubError {
    /// Whether the error means the token was rejected.
    #[inline]
    pub fn is_bad_credentials(&self) -> bool {
        matches!(self, Self::BadCredentials)
    }
}

/// A starred-repository walk that stopped on a failing page.
///
/// Carries every repository accumulated before the failure so callers can
/// decide whether a prefix is good enough.
#[derive(Debug, Error)]
#[error("failed to fetch page {page} of starred repositories: {source}")]
pub struct PartialFetchError {
    /// The page that failed (1-indexed).
    pub page: u32,
    /// Repositories from the pages before `page`, in API order.
    pub repos: Vec<StarredRepo>,
    #[source]
    pub source: GitHubError,
}

impl PartialFetchError {
    /// Give up on the error and keep the accumulated prefix.
    #[must_use]
    pub fn into_repos(self) -> Vec<StarredRepo> {
        self.repos
    }
}
