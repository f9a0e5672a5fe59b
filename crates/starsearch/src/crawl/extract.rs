use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static ABOUT: LazyLock<Selector> = LazyLock::new(|| selector("p.f4.my-3"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static README: LazyLock<Selector> = LazyLock::new(|| selector("#readme article"));
static MARKDOWN_BODY: LazyLock<Selector> = LazyLock::new(|| selector("article.markdown-body"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector should parse")
}

/// Text pulled from a repository page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub description: String,
    pub readme: String,
}

/// Extract the "About" description and rendered readme from a repository page.
///
/// Missing sections come back empty; an unrecognised page is not an error.
pub fn extract_page_text(body: &str) -> PageText {
    let document = Html::parse_document(body);

    let description = document
        .select(&ABOUT)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .or_else(|| {
            document
                .select(&META_DESCRIPTION)
                .next()
                .and_then(|el| el.value().attr("content"))
                .map(collapse_whitespace)
        })
        .unwrap_or_default();

    let readme = document
        .select(&README)
        .next()
        .or_else(|| document.select(&MARKDOWN_BODY).next())
        .map(element_text)
        .unwrap_or_default();

    PageText {
        description,
        readme,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
