use serde::Deserialize;
use std::time::Duration;

/// Anchor text of the "next page" link on a category listing
pub const DEFAULT_NEXT_PAGE_LABEL: &str = "Следующая страница";

/// Substring identifying a rating-site link in an article
pub const DEFAULT_RATING_LINK: &str = "imdb.com";

/// Text every genuine rating-site response contains
pub const DEFAULT_RATING_MARKER: &str = "IMDb";

/// Main configuration structure for Kino-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    pub sites: SitesConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of records after which no new work is scheduled
    #[serde(rename = "target-records")]
    pub target_records: usize,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "concurrent-requests")]
    pub concurrent_requests: u32,

    /// Maximum number of fetches in flight per host
    #[serde(rename = "concurrent-requests-per-domain", default = "default_per_domain")]
    pub concurrent_requests_per_domain: u32,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "download-delay", default)]
    pub download_delay: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Retry policy for transient HTTP failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_retry_times")]
    pub times: u32,

    /// Status codes that trigger a retry
    #[serde(rename = "http-codes", default = "default_retry_codes")]
    pub http_codes: Vec<u16>,

    /// Base backoff between attempts (milliseconds), doubled every retry
    #[serde(default = "default_backoff")]
    pub backoff: u64,
}

impl RetryConfig {
    /// Backoff before retry number `retry` (0-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        Duration::from_millis(self.backoff.saturating_mul(1u64 << retry.min(16)))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            times: default_retry_times(),
            http_codes: default_retry_codes(),
            backoff: default_backoff(),
        }
    }
}

/// Sites the crawl starts from and may visit
#[derive(Debug, Clone, Deserialize)]
pub struct SitesConfig {
    /// Category listing URLs to start from
    pub seeds: Vec<String>,

    /// Hosts the fetcher may contact; subdomains are included
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,

    /// Anchor text of the "next page" link on listings
    #[serde(rename = "next-page-label", default = "default_next_page_label")]
    pub next_page_label: String,

    /// Substring of an article link that leads to the rating site
    #[serde(rename = "rating-link", default = "default_rating_link")]
    pub rating_link: String,

    /// Text a rating page must contain; its absence means the request was blocked
    #[serde(rename = "rating-marker", default = "default_rating_marker")]
    pub rating_marker: String,
}

/// Request identity rotation
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// User-Agent strings rotated between requests
    #[serde(default = "default_user_agents")]
    pub pool: Vec<String>,

    /// Proxy URLs rotated between requests; empty means direct connections
    #[serde(default)]
    pub proxies: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_user_agents(),
            proxies: Vec::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV file, truncated at the start of every run
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

fn default_per_domain() -> u32 {
    1
}

fn default_timeout() -> u64 {
    15
}

fn default_retry_times() -> u32 {
    5
}

fn default_retry_codes() -> Vec<u16> {
    vec![503]
}

fn default_backoff() -> u64 {
    1000
}

fn default_next_page_label() -> String {
    DEFAULT_NEXT_PAGE_LABEL.to_string()
}

fn default_rating_link() -> String {
    DEFAULT_RATING_LINK.to_string()
}

fn default_rating_marker() -> String {
    DEFAULT_RATING_MARKER.to_string()
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryConfig {
            times: 3,
            http_codes: vec![503],
            backoff: 100,
        };
        assert_eq!(retry.backoff_for(0), Duration::from_millis(100));
        assert_eq!(retry.backoff_for(1), Duration::from_millis(200));
        assert_eq!(retry.backoff_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_saturates() {
        let retry = RetryConfig {
            times: 100,
            http_codes: vec![],
            backoff: u64::MAX / 2,
        };
        assert_eq!(retry.backoff_for(40), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_default_user_agents_not_empty() {
        assert!(!UserAgentConfig::default().pool.is_empty());
    }
}
