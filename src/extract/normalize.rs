//! Text cleanup for infobox values

use regex::Regex;
use std::sync::LazyLock;

/// Footnote markers, line breaks, punctuation and inline language tags
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:\d+|…|d|en|ru)\]|[\n\x{A0}/()—]|рус\.|англ\.|\b(?:ru|en)\b")
        .expect("noise pattern is valid")
});

/// Cleans a comma-joined infobox value
///
/// # Cleanup Steps
///
/// 1. Strip footnote markers (`[1]`, `[…]`, `[d]`, `[en]`, `[ru]`)
/// 2. Strip newlines, non-breaking spaces and `/ ( ) —`
/// 3. Strip language tags (`рус.`, `англ.`, standalone `ru` / `en`)
/// 4. Repeat 1-3 until nothing matches, so removals cannot leave a new marker behind
/// 5. Split on commas, trim each piece, drop empty pieces, re-join with `", "`
///
/// The result is idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use kino_crawler::extract::normalize;
///
/// assert_eq!(normalize("драма, \u{a0}, [1]"), "драма");
/// assert_eq!(normalize(", США, , Франция[2], "), "США, Франция");
/// ```
pub fn normalize(text: &str) -> String {
    let mut current = text.to_string();
    while NOISE.is_match(&current) {
        current = NOISE.replace_all(&current, "").into_owned();
    }

    current
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
