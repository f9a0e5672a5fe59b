use clap::ValueEnum;
use starsearch::RepoPage;
use starsearch::search::{SearchHit, search};
use starsearch::store::read_json;

use crate::config::Config;

const DESCRIPTION_WIDTH: usize = 60;

/// Output format for search results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One search result for table display.
#[derive(Debug, Clone, tabled::Tabled)]
pub(crate) struct SearchRow {
    #[tabled(rename = "Score")]
    pub score: u32,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "URL")]
    pub url: String,
}

impl From<&SearchHit<'_>> for SearchRow {
    fn from(hit: &SearchHit<'_>) -> Self {
        Self {
            score: hit.score,
            name: hit.page.name.clone(),
            description: truncate(&hit.page.description, DESCRIPTION_WIDTH),
            url: hit.page.url.clone(),
        }
    }
}

/// Search the crawled page contents for `keyword`.
pub(crate) fn handle_search(
    keyword: &str,
    limit: usize,
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents_file = config
        .contents_file()
        .ok_or("Could not determine data directory; set storage.contents_file in the config file")?;

    let pages: Vec<RepoPage> = read_json(&contents_file).map_err(|e| -> Box<dyn std::error::Error> {
        if e.is_not_found() {
            format!(
                "No crawled content at {}. Run `starsearch update` first.",
                contents_file.display()
            )
            .into()
        } else {
            e.into()
        }
    })?;

    let mut hits = search(&pages, keyword);
    tracing::debug!(keyword, matches = hits.len(), searched = pages.len(), "Search complete");
    if limit > 0 {
        hits.truncate(limit);
    }

    print!("{}", render(&hits, keyword, output)?);
    Ok(())
}

fn render(
    hits: &[SearchHit<'_>],
    keyword: &str,
    output: OutputFormat,
) -> Result<String, serde_json::Error> {
    match output {
        OutputFormat::Table => {
            if hits.is_empty() {
                return Ok(format!("No starred repositories match \"{keyword}\"\n"));
            }
            let rows: Vec<SearchRow> = hits.iter().map(SearchRow::from).collect();
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            Ok(format!("{table}\n"))
        }
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(hits)?)),
    }
}

/// Shorten `text` to at most `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<RepoPage> {
        vec![
            RepoPage {
                url: "https://github.com/expressjs/express".to_string(),
                name: "express".to_string(),
                description: "Fast, unopinionated, minimalist web framework for node.".to_string(),
                readme: "express middleware routing".to_string(),
            },
            RepoPage {
                url: "https://github.com/koajs/koa".to_string(),
                name: "koa".to_string(),
                description: "Expressive middleware for node.js".to_string(),
                readme: String::new(),
            },
        ]
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_long_text() {
        let cut = truncate("abcdefghijkl", 5);
        assert_eq!(cut, "abcd…");
        assert_eq!(cut.chars().count(), 5);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("日本語のテキスト", 4), "日本語…");
    }

    #[test]
    fn test_render_table() {
        let pages = pages();
        let hits = search(&pages, "express");
        let table = render(&hits, "express", OutputFormat::Table).unwrap();

        assert!(table.contains("Score"));
        assert!(table.contains("https://github.com/expressjs/express"));
        assert!(table.find("expressjs").unwrap() < table.find("koajs").unwrap());
    }

    #[test]
    fn test_render_no_matches() {
        let table = render(&[], "zig", OutputFormat::Table).unwrap();
        assert_eq!(table, "No starred repositories match \"zig\"\n");
    }

    #[test]
    fn test_render_json() {
        let pages = pages();
        let hits = search(&pages, "middleware");
        let json = render(&hits, "middleware", OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let results = value.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "koa");
        assert!(results[0]["score"].as_u64().unwrap() >= results[1]["score"].as_u64().unwrap());
    }

    #[test]
    fn test_search_missing_contents_hints_update() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.contents_file = Some(dir.path().join("contents.json"));

        let err = handle_search("rust", 10, OutputFormat::Table, &config).unwrap_err();
        assert!(err.to_string().contains("starsearch update"));
    }
}
