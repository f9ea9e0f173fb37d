//! Category listing walker

use crate::crawler::counter::CompletionCounter;
use crate::crawler::parser::ParsedPage;
use scraper::Selector;
use std::sync::LazyLock;
use url::Url;

static ITEM_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#mw-pages div.mw-category-group a").expect("item link selector is valid")
});

/// What one listing page yields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Film article links, in document order
    pub item_links: Vec<Url>,

    /// The following listing page, if there is one and work is still wanted
    pub next_page: Option<Url>,
}

/// Reads item links and the next-page link from a category listing
///
/// Nothing is collected once `counter` has reached its limit. A listing with
/// no links at all is the natural end of the category, not an error.
pub fn walk_category(page: &ParsedPage, next_label: &str, counter: &CompletionCounter) -> ListingPage {
    let mut item_links = Vec::new();
    for href in page.attrs(&ITEM_LINKS, "href") {
        if counter.at_limit() {
            break;
        }
        match page.resolve(&href) {
            Some(url) => item_links.push(url),
            None => tracing::debug!("Skipping unresolvable item link {}", href),
        }
    }

    let next_page = if counter.at_limit() {
        None
    } else {
        page.links_with_text(next_label).into_iter().next()
    };

    tracing::debug!(
        "Listing {}: {} items, next page {}",
        page.base_url(),
        item_links.len(),
        next_page.as_ref().map(Url::as_str).unwrap_or("none")
    );

    ListingPage {
        item_links,
        next_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_NEXT_PAGE_LABEL;
    use crate::crawler::parser::parse_html;

    fn listing(html: &str) -> ParsedPage {
        parse_html(
            html,
            &Url::parse("https://ru.wikipedia.org/wiki/Категория:Фильмы").unwrap(),
        )
    }

    const TWO_ITEMS: &str = r#"<html><body><div id="mw-pages">
        <div class="mw-category-group"><h3>А</h3><ul>
            <li><a href="/wiki/A">A</a></li>
            <li><a href="/wiki/B">B</a></li>
        </ul></div>
    </div></body></html>"#;

    #[test]
    fn test_items_without_next_page() {
        let counter = CompletionCounter::new(10);
        let result = walk_category(&listing(TWO_ITEMS), DEFAULT_NEXT_PAGE_LABEL, &counter);

        let paths: Vec<_> = result.item_links.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/wiki/A", "/wiki/B"]);
        assert!(result.next_page.is_none());
    }

    #[test]
    fn test_next_page_found_by_label() {
        let html = r#"<div id="mw-pages">
            <a href="/w/index.php?pagefrom=A">Предыдущая страница</a>
            <a href="/w/index.php?pagefrom=B">Следующая страница</a>
            <div class="mw-category-group"><a href="/wiki/A">A</a></div>
            <a href="/w/index.php?pagefrom=B">Следующая страница</a>
        </div>"#;
        let counter = CompletionCounter::new(10);
        let result = walk_category(&listing(html), DEFAULT_NEXT_PAGE_LABEL, &counter);

        assert_eq!(result.item_links.len(), 1);
        assert_eq!(
            result.next_page.map(|u| u.query().unwrap_or_default().to_string()),
            Some("pagefrom=B".to_string())
        );
    }

    #[test]
    fn test_next_page_label_with_surrounding_text() {
        let html = r#"<div id="mw-pages">
            (<a href="/w/index.php?pagefrom=A">предыдущая страница</a>)
            (<a href="/w/index.php?pagefrom=B">Следующая страница</a> →)
            <div class="mw-category-group"><a href="/wiki/A">A</a></div>
        </div>
        <a href="/w/index.php?pagefrom=C">→ Следующая страница (200)</a>"#;
        let counter = CompletionCounter::new(10);
        let result = walk_category(&listing(html), DEFAULT_NEXT_PAGE_LABEL, &counter);

        assert_eq!(
            result.next_page.map(|u| u.query().unwrap_or_default().to_string()),
            Some("pagefrom=B".to_string())
        );
    }

    #[test]
    fn test_links_outside_groups_are_not_items() {
        let html = r#"<a href="/wiki/Main">Main</a>
            <div id="mw-pages"><div class="mw-category-group"><a href="/wiki/A">A</a>
            <a href="javascript:void(0)">x</a></div></div>
            <div class="mw-category-group"><a href="/wiki/Subcategory">S</a></div>"#;
        let counter = CompletionCounter::new(10);
        let result = walk_category(&listing(html), DEFAULT_NEXT_PAGE_LABEL, &counter);

        let paths: Vec<_> = result.item_links.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/wiki/A"]);
    }

    #[test]
    fn test_nothing_collected_at_limit() {
        let html = r#"<div id="mw-pages">
            <div class="mw-category-group"><a href="/wiki/A">A</a></div>
            <a href="/w/index.php?pagefrom=B">Следующая страница</a>
        </div>"#;
        let counter = CompletionCounter::new(1);
        counter.increment();

        let result = walk_category(&listing(html), DEFAULT_NEXT_PAGE_LABEL, &counter);
        assert_eq!(result, ListingPage::default());
    }

    #[test]
    fn test_empty_listing() {
        let counter = CompletionCounter::new(1);
        let result = walk_category(&listing("<html></html>"), DEFAULT_NEXT_PAGE_LABEL, &counter);
        assert_eq!(result, ListingPage::default());
    }
}
