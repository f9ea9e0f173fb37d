//! Document query surface
//!
//! A [`Document`] is what a fetcher hands back: the final URL and the raw body.
//! It is cheap to move between tasks. Handlers call [`Document::parse`] to get
//! a [`ParsedPage`], which offers the handful of typed queries the crawler needs:
//! - Descendant text nodes under matching elements
//! - Attribute values of matching elements
//! - The value cells of a labeled table row
//! - Link resolution against the page URL

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

static ROW_HEADER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("row header selector is valid"));

/// A fetched response body
#[derive(Debug, Clone)]
pub struct Document {
    /// Final URL after redirects
    url: Url,

    /// Raw response body
    body: String,
}

impl Document {
    /// Creates a document from a URL and a response body
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    /// The URL the body was served from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The raw response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the raw body contains `marker`
    pub fn contains(&self, marker: &str) -> bool {
        self.body.contains(marker)
    }

    /// Parses the body into a queryable page
    pub fn parse(&self) -> ParsedPage {
        parse_html(&self.body, &self.url)
    }
}

/// A parsed HTML page with its base URL
///
/// Holds a `scraper::Html`, so it must stay on the thread that built it;
/// handlers parse, query and drop it without crossing an await point.
pub struct ParsedPage {
    html: Html,
    base_url: Url,
}

/// Parses HTML content into a queryable page
///
/// Parsing never fails: malformed markup is repaired by the HTML5 parser,
/// and queries against missing structure simply return nothing.
///
/// # Example
///
/// ```
/// use kino_crawler::crawler::parse_html;
/// use scraper::Selector;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Брат <i>1997</i></h1></body></html>"#;
/// let base_url = Url::parse("https://ru.wikipedia.org/wiki/Брат").unwrap();
/// let page = parse_html(html, &base_url);
/// let h1 = Selector::parse("h1").unwrap();
/// assert_eq!(page.texts(&h1), vec!["Брат ", "1997"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    ParsedPage {
        html: Html::parse_document(html),
        base_url: base_url.clone(),
    }
}

impl ParsedPage {
    /// The URL relative links are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns every descendant text node of every element matching `selector`
    ///
    /// Nodes are returned raw and in document order, whitespace-only nodes included.
    pub fn texts(&self, selector: &Selector) -> Vec<String> {
        self.html
            .select(selector)
            .flat_map(|element| element.text())
            .map(str::to_string)
            .collect()
    }

    /// Returns the first non-blank text node under the first matching element, trimmed
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.html.select(selector).find_map(|element| {
            element
                .text()
                .map(str::trim)
                .find(|text| !text.is_empty())
                .map(str::to_string)
        })
    }

    /// Returns the `attr` value of every matching element
    pub fn attrs(&self, selector: &Selector, attr: &str) -> Vec<String> {
        self.html
            .select(selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::to_string)
            .collect()
    }

    /// Returns the `attr` value of the first matching element that has one
    pub fn attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.html
            .select(selector)
            .find_map(|element| element.value().attr(attr))
            .map(str::to_string)
    }

    /// Finds the first row whose header starts with `label_prefix`
    ///
    /// Returns the text nodes of the cell immediately following the header,
    /// or `None` if no row matches. A prefix match tolerates inflected labels
    /// ("Режиссёр", "Режиссёры" for "Режисс").
    pub fn row_texts(&self, rows: &Selector, label_prefix: &str) -> Option<Vec<String>> {
        self.html.select(rows).find_map(|row| {
            let header = row.select(&ROW_HEADER).find(|th| {
                th.text()
                    .collect::<String>()
                    .trim()
                    .starts_with(label_prefix)
            })?;

            let cell = header
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .filter(|sibling| sibling.value().name() == "td")?;

            Some(cell.text().map(str::to_string).collect())
        })
    }

    /// Returns the resolved targets of all links whose text contains `label`
    pub fn links_with_text(&self, label: &str) -> Vec<Url> {
        self.html
            .select(&ANCHOR)
            .filter(|a| a.text().collect::<String>().contains(label))
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| self.resolve(href))
            .collect()
    }

    /// Returns the first link whose raw `href` contains `pattern`, resolved
    pub fn link_containing(&self, pattern: &str) -> Option<Url> {
        self.html
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| href.contains(pattern))
            .find_map(|href| self.resolve(href))
    }

    /// Resolves a link href against the page URL
    ///
    /// Returns None if the link should not be followed:
    /// - javascript:, mailto:, tel: schemes
    /// - data: URIs
    /// - Fragment-only links
    /// - Invalid URLs
    /// - Non-HTTP(S) URLs after resolution
    pub fn resolve(&self, href: &str) -> Option<Url> {
        resolve_link(href, &self.base_url)
    }
}

fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        _ => None,
    }
}
