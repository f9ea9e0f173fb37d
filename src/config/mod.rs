//! Configuration module for Kino-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kino_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kino.toml")).unwrap();
//! println!("Crawler will stop after {} records", config.crawler.target_records);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, RetryConfig, SitesConfig, UserAgentConfig,
    DEFAULT_NEXT_PAGE_LABEL, DEFAULT_RATING_LINK, DEFAULT_RATING_MARKER,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
