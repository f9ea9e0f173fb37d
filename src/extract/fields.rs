//! Infobox field lookup

use super::normalize;
use crate::crawler::ParsedPage;
use crate::record::PartialRecord;
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Row label prefix for the genre row
pub const GENRE_LABEL: &str = "Жанр";

/// Row label prefix for the director row ("Режиссёр", "Режиссёры")
pub const DIRECTOR_LABEL: &str = "Режисс";

/// Row label prefix for the country row ("Страна", "Страны")
pub const COUNTRY_LABEL: &str = "Стран";

/// Row label prefix for the release year row ("Год", "Годы")
pub const YEAR_LABEL: &str = "Год";

static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.infobox th.infobox-above").expect("title selector is valid")
});

static ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.infobox tr").expect("row selector is valid"));

static FOUR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]{4}").expect("year pattern is valid"));

/// Extracts the film fields from a parsed article
///
/// Missing rows yield empty strings. Genre, director and country are
/// normalized; the title is only trimmed.
pub fn extract_fields(page: &ParsedPage) -> PartialRecord {
    let title = page.first_text(&TITLE).unwrap_or_default();

    PartialRecord {
        title,
        genre: normalize(&raw_row(page, GENRE_LABEL)),
        director: normalize(&raw_row(page, DIRECTOR_LABEL)),
        country: normalize(&raw_row(page, COUNTRY_LABEL)),
        year: extract_years(&raw_row(page, YEAR_LABEL)),
    }
}

/// Returns the text nodes of the first infobox row labeled `label_prefix`, comma-joined
///
/// Nothing is cleaned here, so `"драма"`, `"\u{a0}"`, `"[1]"` becomes `"драма, \u{a0}, [1]"`.
pub fn raw_row(page: &ParsedPage, label_prefix: &str) -> String {
    page.row_texts(&ROWS, label_prefix)
        .map(|texts| texts.join(", "))
        .unwrap_or_default()
}

/// Collects every non-overlapping group of four digits, in order, joined with `", "`
///
/// A range such as `"2010—2012"` yields two years. Other numbers in the row
/// are picked up too: longer digit runs are cut into four-digit chunks from
/// the left, and a leftover tail shorter than four is ignored.
///
/// # Examples
///
/// ```
/// use kino_crawler::extract::extract_years;
///
/// assert_eq!(extract_years("2010—2012 (сериал)"), "2010, 2012");
/// assert_eq!(extract_years("12 мая 1997"), "1997");
/// ```
pub fn extract_years(text: &str) -> String {
    FOUR_DIGITS
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
