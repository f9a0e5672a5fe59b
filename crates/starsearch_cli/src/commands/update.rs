use std::path::PathBuf;
use std::sync::Arc;

use console::Term;
use starsearch::StarredRepo;
use starsearch::crawl::GitHubPageFetcher;
use starsearch::enrich::enrich_all;
use starsearch::github::GitHubClient;
use starsearch::store::{read_json, write_json};

use crate::config::Config;
use crate::progress::ProgressReporter;

const MISSING_TOKEN: &str = "GitHub personal access token required.\n\
    Pass one with `starsearch update --token <TOKEN>` or set GITHUB_PERSONAL_ACCESS_TOKEN.\n\
    Create a token at https://github.com/settings/tokens";

/// Fetch every starred repository, save the list, then crawl each page.
pub(crate) async fn handle_update(
    token: Option<String>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref token) = token {
        let config_path = Config::save_github_token(token)?;
        notify(&format!("GitHub token saved to: {}", config_path.display()));
    }

    let token = token
        .or_else(|| config.github_token())
        .ok_or(MISSING_TOKEN)?;
    let repos_file = data_file(config.repos_file(), "storage.repos_file")?;

    let client = GitHubClient::with_endpoint(&token, &config.api_url())?;
    let reporter = Arc::new(ProgressReporter::new());
    let progress = reporter.as_callback();

    let repos = match client
        .fetch_all_starred(&config.paginate_options(), Some(progress.as_ref()))
        .await
    {
        Ok(fetch) => fetch.repos,
        Err(partial) if partial.repos.is_empty() => {
            reporter.finish();
            return Err(partial.into());
        }
        Err(partial) => {
            tracing::warn!(
                page = partial.page,
                kept = partial.repos.len(),
                error = %partial.source,
                "Keeping repositories fetched before the failure"
            );
            partial.into_repos()
        }
    };

    write_json(&repos_file, &repos)?;
    notify(&format!("Saved file to {}", repos_file.display()));

    crawl(config, &repos, reporter).await
}

/// Crawl repository pages from a previously saved repository list.
pub(crate) async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let repos_file = data_file(config.repos_file(), "storage.repos_file")?;
    let repos: Vec<StarredRepo> = read_json(&repos_file).map_err(|e| -> Box<dyn std::error::Error> {
        if e.is_not_found() {
            format!(
                "No repository list at {}. Run `starsearch update` first.",
                repos_file.display()
            )
            .into()
        } else {
            e.into()
        }
    })?;

    crawl(config, &repos, Arc::new(ProgressReporter::new())).await
}

async fn crawl(
    config: &Config,
    repos: &[StarredRepo],
    reporter: Arc<ProgressReporter>,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents_file = data_file(config.contents_file(), "storage.contents_file")?;
    let fetcher = Arc::new(GitHubPageFetcher::new()?);

    let result = enrich_all(
        fetcher,
        repos,
        &config.enrich_options(),
        Some(reporter.as_callback()),
    )
    .await;
    reporter.finish();

    write_json(&contents_file, &result.pages)?;
    notify(&format!("Saved file to {}", contents_file.display()));
    notify("Try searching with: starsearch search express");
    Ok(())
}

fn data_file(path: Option<PathBuf>, key: &str) -> Result<PathBuf, String> {
    path.ok_or_else(|| format!("Could not determine data directory; set {key} in the config file"))
}

fn notify(message: &str) {
    if Term::stdout().is_term() {
        println!("{message}");
    } else {
        tracing::info!("{}", message);
    }
}
