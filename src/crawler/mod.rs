//! Crawler module for the category-to-rating traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Request throttling per host
//! - HTML parsing and typed page queries
//! - Category walking and cross-site chaining
//! - Overall crawl coordination

mod chainer;
mod coordinator;
mod counter;
mod fetcher;
mod parser;
mod scheduler;
mod task;
mod walker;

pub use chainer::{handle_detail, handle_rating, ChainOutcome};
pub use coordinator::{Coordinator, CrawlSettings};
pub use counter::CompletionCounter;
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use parser::{parse_html, Document, ParsedPage};
pub use scheduler::{ScheduledFetch, Scheduler};
pub use task::{CrawlTask, Stage};
pub use walker::{walk_category, ListingPage};

use crate::config::Config;
use crate::output::{CrawlStatistics, CsvSink};
use crate::url::parse_http_url;
use crate::KinoError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the seed URLs
/// 2. Build the HTTP fetcher
/// 3. Create (and truncate) the CSV output
/// 4. Walk, chain and emit until the target is reached or the work runs out
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed
/// * `Err(KinoError)` - Crawl could not start, or the output failed
pub async fn crawl(config: &Config) -> Result<CrawlStatistics, KinoError> {
    let seeds = config
        .sites
        .seeds
        .iter()
        .map(|seed| parse_http_url(seed))
        .collect::<Result<Vec<_>, _>>()?;

    let fetcher = HttpFetcher::new(config)?;
    let sink = CsvSink::create(Path::new(&config.output.csv_path))?;

    let mut coordinator = Coordinator::new(fetcher, sink, CrawlSettings::from(config));
    coordinator.run(seeds).await
}
