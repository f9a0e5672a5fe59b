use serde::{Deserialize, Deserializer, Serialize};

/// Text stored in place of a description or readme when every fetch attempt failed.
pub const NETWORK_ERROR_MARKER: &str = "network error";

/// A repository the viewer has starred, as listed by the GitHub API.
///
/// Both fields load as empty strings when absent or `null`, whether in an API
/// page or a hand-edited repository file; such records are rejected later by
/// the enrichment intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarredRepo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl StarredRepo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// A repository can be enriched only when it carries both a name and a URL.
    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty()
    }
}

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page content scraped for a starred repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub readme: String,
}

impl RepoPage {
    /// Placeholder recorded once a repository exhausted its fetch attempts.
    pub fn network_error(repo: &StarredRepo) -> Self {
        Self {
            url: repo.url.clone(),
            name: repo.name.clone(),
            description: NETWORK_ERROR_MARKER.to_string(),
            readme: NETWORK_ERROR_MARKER.to_string(),
        }
    }

    pub fn is_network_error(&self) -> bool {
        self.description == NETWORK_ERROR_MARKER && self.readme == NETWORK_ERROR_MARKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starred_repo_missing_fields_deserialize_as_empty() {
        let repo: StarredRepo = serde_json::from_str(r#"{"name":"serde"}"#).unwrap();
        assert_eq!(repo.name, "serde");
        assert_eq!(repo.url, "");
        assert!(!repo.is_complete());
    }

    #[test]
    fn starred_repo_null_fields_deserialize_as_empty() {
        let repos: Vec<StarredRepo> =
            serde_json::from_str(r#"[{"name":"a","url":"u1"},{"name":null,"url":"u2"},{"name":"c","url":null}]"#)
                .unwrap();
        assert_eq!(repos[0], StarredRepo::new("a", "u1"));
        assert_eq!(repos[1], StarredRepo::new("", "u2"));
        assert_eq!(repos[2], StarredRepo::new("c", ""));
        assert!(!repos[1].is_complete());
        assert!(!repos[2].is_complete());
    }

    #[test]
    fn starred_repo_complete_requires_both_fields() {
        assert!(StarredRepo::new("tokio", "https://github.com/tokio-rs/tokio").is_complete());
        assert!(!StarredRepo::new("", "https://github.com/tokio-rs/tokio").is_complete());
        assert!(!StarredRepo::new("tokio", "").is_complete());
    }

    #[test]
    fn network_error_page_keeps_identity() {
        let repo = StarredRepo::new("axum", "https://github.com/tokio-rs/axum");
        let page = RepoPage::network_error(&repo);

        assert_eq!(page.name, "axum");
        assert_eq!(page.url, "https://github.com/tokio-rs/axum");
        assert_eq!(page.description, "network error");
        assert_eq!(page.readme, "network error");
        assert!(page.is_network_error());
    }

    #[test]
    fn repo_page_serializes_with_expected_keys() {
        let page = RepoPage {
            url: "u".to_string(),
            name: "n".to_string(),
            description: "d".to_string(),
            readme: "r".to_string(),
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"url": "u", "name": "n", "description": "d", "readme": "r"})
        );
    }
}
