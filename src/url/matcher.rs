/// Checks if a host is covered by an allow-list entry
///
/// An entry covers its own host and every subdomain of it, so `imdb.com`
/// admits `www.imdb.com` and `m.imdb.com`. A leading `*.` is accepted and
/// means the same thing.
///
/// Both sides are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use kino_crawler::url::matches_host;
///
/// assert!(matches_host("imdb.com", "imdb.com"));
/// assert!(matches_host("imdb.com", "www.imdb.com"));
/// assert!(matches_host("*.wikipedia.org", "ru.wikipedia.org"));
/// assert!(!matches_host("ru.wikipedia.org", "en.wikipedia.org"));
/// assert!(!matches_host("imdb.com", "notimdb.com"));
/// ```
pub fn matches_host(entry: &str, candidate: &str) -> bool {
    let base = entry.strip_prefix("*.").unwrap_or(entry);
    if base.is_empty() {
        return false;
    }

    candidate == base
        || candidate
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
