//! GraphQL request and response shapes for the starred repositories query.
//!
//! Every response field defaults when absent, so a truncated or unexpected
//! payload degrades to an empty page instead of failing to parse.

use serde::{Deserialize, Serialize};

use crate::StarredRepo;
use crate::types::null_as_default;

/// Maximum page size accepted by the starred repositories connection.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default GraphQL endpoint.
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

pub(crate) const STARRED_QUERY: &str = "query($first: Int!, $after: String) { \
viewer { starredRepositories(first: $first, after: $after, \
orderBy: {field: STARRED_AT, direction: ASC}) { \
pageInfo { hasNextPage startCursor endCursor } nodes { name url } totalCount } } }";

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: StarredVariables<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StarredVariables<'a> {
    pub first: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<&'a str>,
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StarredResponse {
    pub data: Option<ViewerData>,
    #[serde(deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQlErrorMessage>,
    /// REST-style error message, e.g. `"Bad credentials"`.
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GraphQlErrorMessage {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ViewerData {
    #[serde(deserialize_with = "null_as_default")]
    pub viewer: Viewer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Viewer {
    #[serde(deserialize_with = "null_as_default")]
    pub starred_repositories: StarredConnection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct StarredConnection {
    #[serde(deserialize_with = "null_as_default")]
    pub page_info: PageInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<Option<StarredRepo>>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_count: usize,
}

/// Cursor information for one page of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of starred repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarredPage {
    pub repos: Vec<StarredRepo>,
    pub page_info: PageInfo,
    pub total_count: usize,
}

impl From<StarredConnection> for StarredPage {
    fn from(conn: StarredConnection) -> Self {
        Self {
            repos: conn
                .nodes
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
            page_info: conn.page_info,
            total_count: conn.total_count,
        }
    }
}
