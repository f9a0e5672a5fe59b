//! Keyword search over enriched repository pages.
//!
//! Matching is case-insensitive and every whitespace-separated term has to
//! appear somewhere in the record. Hits are weighted by where they land:
//! a name hit counts more than a description hit, which counts more than a
//! readme hit.

use serde::Serialize;

use crate::RepoPage;

const NAME_WEIGHT: u32 = 3;
const DESCRIPTION_WEIGHT: u32 = 2;
const README_WEIGHT: u32 = 1;

/// A matching page and its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit<'a> {
    pub score: u32,
    #[serde(flatten)]
    pub page: &'a RepoPage,
}

/// Search `pages` for `keyword`, best matches first.
///
/// Placeholder records left by failed fetches only match on their name.
/// Ties are broken by name so the ordering is stable across runs.
pub fn search<'a>(pages: &'a [RepoPage], keyword: &str) -> Vec<SearchHit<'a>> {
    let terms: Vec<String> = keyword
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a>> = pages
        .iter()
        .filter_map(|page| score(page, &terms).map(|score| SearchHit { score, page }))
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.page.name.cmp(&b.page.name))
    });
    hits
}

/// Score one page, or `None` when some term is absent.
fn score(page: &RepoPage, terms: &[String]) -> Option<u32> {
    let name = page.name.to_lowercase();
    let (description, readme) = if page.is_network_error() {
        (String::new(), String::new())
    } else {
        (page.description.to_lowercase(), page.readme.to_lowercase())
    };

    let mut total = 0u32;
    for term in terms {
        let in_name = count(&name, term);
        let in_description = count(&description, term);
        let in_readme = count(&readme, term);

        if in_name + in_description + in_readme == 0 {
            return None;
        }

        total += in_name * NAME_WEIGHT
            + in_description * DESCRIPTION_WEIGHT
            + in_readme * README_WEIGHT;
    }
    Some(total)
}

fn count(haystack: &str, needle: &str) -> u32 {
    haystack.matches(needle).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StarredRepo;

    fn page(name: &str, description: &str, readme: &str) -> RepoPage {
        RepoPage {
            url: format!("https://github.com/o/{name}"),
            name: name.to_string(),
            description: description.to_string(),
            readme: readme.to_string(),
        }
    }

    fn names<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|h| h.page.name.as_str()).collect()
    }

    #[test]
    fn test_empty_keyword_matches_nothing() {
        let pages = vec![page("express", "web framework", "")];
        assert!(search(&pages, "   ").is_empty());
    }

    #[test]
    fn test_case_insensitive_match() {
        let pages = vec![
            page("Express", "Fast web framework", ""),
            page("koa", "middleware", ""),
        ];
        assert_eq!(names(&search(&pages, "EXPRESS")), vec!["Express"]);
    }

    #[test]
    fn test_name_outranks_description_outranks_readme() {
        let pages = vec![
            page("in-readme", "", "uses tokio"),
            page("tokio", "", ""),
            page("in-description", "built on tokio", ""),
        ];

        let hits = search(&pages, "tokio");
        assert_eq!(names(&hits), vec!["tokio", "in-description", "in-readme"]);
        assert_eq!(
            hits.iter().map(|h| h.score).collect::<Vec<_>>(),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn test_all_terms_required() {
        let pages = vec![
            page("serde", "serialization framework", "json yaml"),
            page("serde_json", "JSON support for serde", ""),
        ];

        assert_eq!(names(&search(&pages, "serde yaml")), vec!["serde"]);
        assert!(search(&pages, "serde toml").is_empty());
    }

    #[test]
    fn test_repeated_hits_accumulate() {
        let pages = vec![page("a", "", "grep grep grep"), page("b", "", "grep")];
        let hits = search(&pages, "grep");
        assert_eq!(names(&hits), vec!["a", "b"]);
        assert_eq!(hits[0].score, 3);
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let pages = vec![page("zeta", "cli", ""), page("alpha", "cli", "")];
        assert_eq!(names(&search(&pages, "cli")), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_placeholder_matches_name_only() {
        let failed = RepoPage::network_error(&StarredRepo::new(
            "network-tools",
            "https://github.com/o/network-tools",
        ));
        let pages = vec![failed];

        assert_eq!(names(&search(&pages, "network")), vec!["network-tools"]);
        assert!(search(&pages, "error").is_empty());
    }

    #[test]
    fn test_hit_serializes_flat() {
        let pages = vec![page("ripgrep", "fast", "")];
        let hits = search(&pages, "ripgrep");
        let value = serde_json::to_value(&hits[0]).unwrap();
        assert_eq!(value["score"], 3);
        assert_eq!(value["name"], "ripgrep");
        assert_eq!(value["url"], "https://github.com/o/ripgrep");
    }
}
