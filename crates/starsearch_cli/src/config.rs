//! Configuration file support for starsearch.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Legacy environment variables (`GITHUB_PERSONAL_ACCESS_TOKEN`, `REQUEST_BATCH_SIZE`, ...)
//! 3. Environment variables prefixed with `STARSEARCH_`, using `__` between
//!    section and key (e.g. `STARSEARCH_UPDATE__BATCH_SIZE`)
//! 4. Config file (./starsearch.toml, then ~/.config/starsearch/config.toml)
//! 5. Built-in defaults
//!
//! Data files default to the platform data directory
//! (`~/.local/share/starsearch/` on Linux).
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use GITHUB_PERSONAL_ACCESS_TOKEN
//! api_url = "https://api.github.com/graphql"
//!
//! [storage]
//! repos_file = "/data/stars/repos.json"
//! contents_file = "/data/stars/contents.json"
//!
//! [update]
//! page_delay_ms = 500
//! batch_size = 10
//! retry_delay_ms = 1000
//! max_attempts = 3
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use starsearch::enrich::{DEFAULT_BATCH_SIZE, EnrichOptions};
use starsearch::github::{GITHUB_GRAPHQL_URL, MAX_PAGE_SIZE, PaginateOptions};
use starsearch::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PAGE_DELAY_MS, DEFAULT_RETRY_DELAY_MS};

const APP_NAME: &str = "starsearch";
const REPOS_FILE_NAME: &str = "repos.json";
const CONTENTS_FILE_NAME: &str = "contents.json";

/// Environment variable names kept for existing setups, and the key each one sets.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("GITHUB_PERSONAL_ACCESS_TOKEN", "github.token"),
    ("REQUEST_BATCH_SIZE", "update.batch_size"),
    ("ERROR_RETRY_MS", "update.retry_delay_ms"),
    ("ERROR_RETRY_TIMES", "update.max_attempts"),
    ("REPOS_FILE_PATH", "storage.repos_file"),
    ("PAGE_CONTENT_FILE_PATH", "storage.contents_file"),
];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub storage: StorageConfig,
    /// Tuning for the update pipeline.
    pub update: UpdateConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token.
    /// Can also be set via GITHUB_PERSONAL_ACCESS_TOKEN or STARSEARCH_GITHUB__TOKEN.
    pub token: Option<String>,
    /// GraphQL endpoint, for GitHub Enterprise.
    pub api_url: Option<String>,
}

/// Data file locations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub repos_file: Option<PathBuf>,
    pub contents_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Courtesy delay between starred-repository pages.
    pub page_delay_ms: u64,
    /// Repositories crawled concurrently per batch.
    pub batch_size: usize,
    /// Delay before retrying a failed repository page.
    pub retry_delay_ms: u64,
    /// Fetch attempts per repository page.
    pub max_attempts: u32,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            batch_size: DEFAULT_BATCH_SIZE,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/starsearch/config.toml)
    /// 3. Local config file (./starsearch.toml)
    /// 4. Environment variables with STARSEARCH_ prefix
    /// 5. Legacy environment variables
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("starsearch.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./starsearch.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(prefixed_env());

        let built = with_legacy_env(builder, |name| std::env::var(name).ok())
            .and_then(|builder| builder.build());

        match built {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().filter(|t| !t.is_empty())
    }

    /// GraphQL endpoint, defaulting to api.github.com.
    pub fn api_url(&self) -> String {
        self.github
            .api_url
            .clone()
            .unwrap_or_else(|| GITHUB_GRAPHQL_URL.to_string())
    }

    /// Where the starred repository list is saved.
    pub fn repos_file(&self) -> Option<PathBuf> {
        self.storage
            .repos_file
            .clone()
            .or_else(|| Self::default_data_dir().map(|dir| dir.join(REPOS_FILE_NAME)))
    }

    /// Where the crawled page contents are saved.
    pub fn contents_file(&self) -> Option<PathBuf> {
        self.storage
            .contents_file
            .clone()
            .or_else(|| Self::default_data_dir().map(|dir| dir.join(CONTENTS_FILE_NAME)))
    }

    pub fn paginate_options(&self) -> PaginateOptions {
        PaginateOptions {
            page_size: MAX_PAGE_SIZE,
            page_delay: Duration::from_millis(self.update.page_delay_ms),
        }
    }

    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            batch_size: self.update.batch_size,
            max_attempts: self.update.max_attempts,
            retry_delay: Duration::from_millis(self.update.retry_delay_ms),
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default data directory path.
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Save a GitHub token to the default config file.
    ///
    /// Creates the config file and parent directories if they don't exist.
    pub fn save_github_token(token: &str) -> io::Result<PathBuf> {
        let config_path = Self::default_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        save_github_token_to(&config_path, token)?;
        Ok(config_path)
    }
}

fn prefixed_env() -> Environment {
    Environment::with_prefix("STARSEARCH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn with_legacy_env(
    mut builder: config::ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    for (name, key) in LEGACY_ENV {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            tracing::debug!(variable = name, key, "Using legacy environment variable");
            builder = builder.set_override(*key, value)?;
        }
    }
    Ok(builder)
}

/// Set `[github] token` in the TOML file at `path`.
///
/// An existing file keeps its formatting, comments and other settings.
fn save_github_token_to(path: &Path, token: &str) -> io::Result<()> {
    use toml_edit::{DocumentMut, value};

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content.parse().map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Invalid TOML: {}", e))
    })?;

    if !doc.contains_key("github") {
        doc["github"] = toml_edit::table();
    }
    doc["github"]["token"] = value(token);

    fs::write(path, doc.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_toml(content: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.api_url(), GITHUB_GRAPHQL_URL);
        assert_eq!(config.update.page_delay_ms, 500);
        assert_eq!(config.update.batch_size, 10);
        assert_eq!(config.update.retry_delay_ms, 1000);
        assert_eq!(config.update.max_attempts, 3);
    }

    #[test]
    fn test_full_config_parsing() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_test123"
            api_url = "https://github.example.com/api/graphql"

            [storage]
            repos_file = "/tmp/stars/repos.json"
            contents_file = "/tmp/stars/contents.json"

            [update]
            page_delay_ms = 0
            batch_size = 4
            retry_delay_ms = 250
            max_attempts = 5
        "#,
        );

        assert_eq!(config.github_token(), Some("ghp_test123".to_string()));
        assert_eq!(config.api_url(), "https://github.example.com/api/graphql");
        assert_eq!(
            config.repos_file(),
            Some(PathBuf::from("/tmp/stars/repos.json"))
        );
        assert_eq!(
            config.contents_file(),
            Some(PathBuf::from("/tmp/stars/contents.json"))
        );

        let paginate = config.paginate_options();
        assert_eq!(paginate.page_size, 100);
        assert_eq!(paginate.page_delay, Duration::ZERO);

        let enrich = config.enrich_options();
        assert_eq!(enrich.batch_size, 4);
        assert_eq!(enrich.max_attempts, 5);
        assert_eq!(enrich.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = from_toml(
            r#"
            [update]
            batch_size = 20
        "#,
        );

        assert_eq!(config.update.batch_size, 20);
        assert_eq!(config.update.max_attempts, 3);
        assert_eq!(config.update.retry_delay_ms, 1000);
    }

    #[test]
    fn test_empty_token_is_none() {
        let config = from_toml(
            r#"
            [github]
            token = ""
        "#,
        );
        assert!(config.github_token().is_none());
    }

    #[test]
    fn test_data_files_default_to_data_dir() {
        let config = Config::default();
        let repos = config.repos_file().unwrap();
        let contents = config.contents_file().unwrap();

        assert!(repos.ends_with("repos.json"));
        assert!(contents.ends_with("contents.json"));
        assert!(repos.to_string_lossy().contains("starsearch"));
    }

    #[test]
    fn test_prefixed_environment_variables() {
        let mut vars = config::Map::new();
        vars.insert(
            "STARSEARCH_UPDATE__BATCH_SIZE".to_string(),
            "7".to_string(),
        );
        vars.insert(
            "STARSEARCH_GITHUB__TOKEN".to_string(),
            "ghp_env".to_string(),
        );

        let config: Config = ConfigBuilder::builder()
            .add_source(prefixed_env().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.update.batch_size, 7);
        assert_eq!(config.github_token(), Some("ghp_env".to_string()));
    }

    #[test]
    fn test_legacy_environment_overrides_file() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("GITHUB_PERSONAL_ACCESS_TOKEN", "ghp_legacy"),
            ("REQUEST_BATCH_SIZE", "3"),
            ("ERROR_RETRY_MS", "50"),
            ("ERROR_RETRY_TIMES", "6"),
            ("REPOS_FILE_PATH", "/tmp/legacy/repos.json"),
            ("PAGE_CONTENT_FILE_PATH", ""),
        ]);

        let builder = ConfigBuilder::builder().add_source(File::from_str(
            r#"
            [github]
            token = "ghp_file"

            [storage]
            contents_file = "/tmp/file/contents.json"
        "#,
            FileFormat::Toml,
        ));

        let config: Config = with_legacy_env(builder, |name| vars.get(name).map(|v| v.to_string()))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.github_token(), Some("ghp_legacy".to_string()));
        assert_eq!(config.update.batch_size, 3);
        assert_eq!(config.update.retry_delay_ms, 50);
        assert_eq!(config.update.max_attempts, 6);
        assert_eq!(
            config.repos_file(),
            Some(PathBuf::from("/tmp/legacy/repos.json"))
        );
        // Empty legacy values are ignored.
        assert_eq!(
            config.contents_file(),
            Some(PathBuf::from("/tmp/file/contents.json"))
        );
    }

    #[test]
    fn test_config_invalid_toml() {
        let result = ConfigBuilder::builder()
            .add_source(File::from_str("[update\nbatch_size = 1", FileFormat::Toml))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_save_github_token_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        save_github_token_to(&path, "ghp_new").unwrap();

        let config = from_toml(&fs::read_to_string(&path).unwrap());
        assert_eq!(config.github_token(), Some("ghp_new".to_string()));
    }

    #[test]
    fn test_save_github_token_preserves_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "# my settings\n[github]\ntoken = \"ghp_old\"\n\n[update]\nbatch_size = 4\n",
        )
        .unwrap();

        save_github_token_to(&path, "ghp_new").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# my settings"));
        let config = from_toml(&content);
        assert_eq!(config.github_token(), Some("ghp_new".to_string()));
        assert_eq!(config.update.batch_size, 4);
    }
}
