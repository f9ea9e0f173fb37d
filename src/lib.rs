//! Kino-Crawler: a chained film catalogue crawler
//!
//! This crate walks a paginated film category on a wiki, follows every listed
//! film to its article, optionally hops to a rating site for the film's score,
//! and writes one normalized record per film until a target count is reached.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Kino-Crawler operations
#[derive(Debug, Error)]
pub enum KinoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid chain transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::ChainState,
        to: state::ChainState,
    },

    #[error("Task {url} reached the {stage:?} handler without carried data")]
    MissingCarried {
        url: String,
        stage: crawler::Stage,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Terminal transport failures reported by a fetcher
///
/// Retries happen inside the fetcher; one of these means the task is given up.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Host not in allow-list: {url}")]
    OffSite { url: String },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Http { url, .. }
            | Self::Timeout { url }
            | Self::OffSite { url } => url,
        }
    }
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Kino-Crawler operations
pub type Result<T> = std::result::Result<T, KinoError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{PartialRecord, Record, RATING_SENTINEL};
pub use state::ChainState;
pub use crate::url::{extract_domain, is_allowed_host, parse_http_url};
