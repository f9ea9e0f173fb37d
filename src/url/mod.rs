//! URL handling module for Kino-Crawler
//!
//! This module provides host extraction, allow-list matching and strict
//! parsing of configured URLs.

mod matcher;

use crate::{UrlError, UrlResult};
use url::Url;

pub use matcher::matches_host;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kino_crawler::url::extract_domain;
///
/// let url = Url::parse("https://RU.Wikipedia.org/wiki/Брат").unwrap();
/// assert_eq!(extract_domain(&url), Some("ru.wikipedia.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host is covered by any allow-list entry
///
/// An empty allow-list admits every host.
pub fn is_allowed_host(url: &Url, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }

    match extract_domain(url) {
        Some(host) => allowed
            .iter()
            .any(|entry| matches_host(&entry.to_lowercase(), &host)),
        None => false,
    }
}

/// Parses an absolute http(s) URL with a host
///
/// # Examples
///
/// ```
/// use kino_crawler::url::parse_http_url;
///
/// assert!(parse_http_url("https://ru.wikipedia.org/wiki/Категория:Фильмы").is_ok());
/// assert!(parse_http_url("ftp://example.com/").is_err());
/// assert!(parse_http_url("/wiki/relative").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
