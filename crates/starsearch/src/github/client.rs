//! GitHub GraphQL client.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::error::GitHubError;
use super::types::{
    GITHUB_GRAPHQL_URL, GraphQlRequest, STARRED_QUERY, StarredPage, StarredResponse,
    StarredVariables,
};
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};

const BAD_CREDENTIALS: &str = "Bad credentials";

/// GitHub API client authenticated with a personal access token.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for `api.github.com` backed by reqwest.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        Self::with_endpoint(token, GITHUB_GRAPHQL_URL)
    }

    /// Create a client for a specific GraphQL endpoint (e.g. GitHub Enterprise).
    pub fn with_endpoint(token: &str, endpoint: &str) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| GitHubError::Config(e.to_string()))?;

        Ok(Self::new_with_transport(
            token,
            endpoint,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        token: &str,
        endpoint: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        }
    }

    /// Fetch a single page of the viewer's starred repositories.
    ///
    /// `after` is the previous page's end cursor; `None` requests the first page.
    pub async fn fetch_starred_page(
        &self,
        after: Option<&str>,
        first: usize,
    ) -> Result<StarredPage, GitHubError> {
        let body = serde_json::to_vec(&GraphQlRequest {
            query: STARRED_QUERY,
            variables: StarredVariables { first, after },
        })?;

        let request = HttpRequest::post_json(&self.endpoint, body)
            .header("Accept", "application/json")
            .header("User-Agent", "starsearch")
            .header("Authorization", format!("Bearer {}", self.token));

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GitHubError::Http(e.to_string()))?;

        if response.status == 401 {
            return Err(GitHubError::BadCredentials);
        }

        let parsed: StarredResponse = match serde_json::from_slice(&response.body) {
            Ok(parsed) => parsed,
            Err(_) if !response.is_success() => {
                return Err(GitHubError::Api {
                    status: response.status,
                    message: response.text(),
                });
            }
            Err(e) => return Err(GitHubError::Json(e)),
        };

        if parsed.message.as_deref() == Some(BAD_CREDENTIALS) {
            return Err(GitHubError::BadCredentials);
        }

        if !response.is_success() {
            return Err(GitHubError::Api {
                status: response.status,
                message: parsed.message.unwrap_or_default(),
            });
        }

        match parsed.data {
            Some(data) => Ok(data.viewer.starred_repositories.into()),
            None if !parsed.errors.is_empty() => {
                let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
                Err(GitHubError::GraphQl(messages.join("; ")))
            }
            None => Ok(StarredPage::default()),
        }
    }
}
