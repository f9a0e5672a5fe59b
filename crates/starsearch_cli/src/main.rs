//! Starsearch CLI - search your starred GitHub repositories.

mod commands;
mod config;
mod progress;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::search::OutputFormat;

#[derive(Parser)]
#[command(name = "starsearch")]
#[command(version)]
#[command(about = "Search your starred GitHub repositories with ease")]
#[command(
    long_about = "Starsearch downloads the list of repositories you have starred on GitHub, \
crawls each repository page for its description and readme, and lets you search \
that content by keyword."
)]
#[command(after_long_help = r#"EXAMPLES
    Fetch your stars and crawl their pages, saving the token for later runs:
        $ starsearch update --token ghp_xxxxxxxxxxxx

    Refresh using the saved token:
        $ starsearch update

    Search by keyword:
        $ starsearch search express

    Generate shell completions:
        $ starsearch completions bash > ~/.local/share/bash-completion/completions/starsearch

CONFIGURATION
    Starsearch reads configuration from:
      1. ~/.config/starsearch/config.toml (or $XDG_CONFIG_HOME/starsearch/config.toml)
      2. ./starsearch.toml
      3. Environment variables (STARSEARCH_ prefix, e.g., STARSEARCH_UPDATE__BATCH_SIZE)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GITHUB_PERSONAL_ACCESS_TOKEN   GitHub token (needs the public_repo scope)
    REQUEST_BATCH_SIZE             Repository pages crawled concurrently (default: 10)
    ERROR_RETRY_MS                 Delay before retrying a failed page in ms (default: 1000)
    ERROR_RETRY_TIMES              Attempts per repository page (default: 3)
    REPOS_FILE_PATH                Where the starred repository list is saved
    PAGE_CONTENT_FILE_PATH         Where the crawled page contents are saved
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch starred repositories and crawl their pages
    ///
    /// Walks the starred repository list through the GitHub GraphQL API,
    /// saves it, then crawls every repository page for its description and
    /// readme.
    Update {
        /// GitHub personal access token (saved to the config file)
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Crawl repository pages from the saved starred repository list
    Crawl,
    /// Search crawled repositories by keyword
    Search {
        /// Keyword(s); every word has to match
        #[arg(required = true)]
        keyword: Vec<String>,

        /// Maximum number of results (0 for all)
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when not attached to a terminal
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("starsearch=info,starsearch_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        commands::meta::handle_completions(*shell)?;
        return Ok(());
    }

    let config = config::Config::load();

    match cli.command {
        Commands::Update { token } => {
            commands::update::handle_update(token, &config).await?;
        }
        Commands::Crawl => {
            commands::update::handle_crawl(&config).await?;
        }
        Commands::Search {
            keyword,
            limit,
            output,
        } => {
            commands::search::handle_search(&keyword.join(" "), limit, output, &config)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
