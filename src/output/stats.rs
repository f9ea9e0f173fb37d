//! Run statistics
//!
//! Counters the coordinator keeps while crawling, printed at the end of a run.

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Category listing pages walked
    pub category_pages: u64,

    /// Film articles processed
    pub detail_pages: u64,

    /// Rating pages processed (blocked ones included)
    pub rating_pages: u64,

    /// Records handed to the sink
    pub records_emitted: u64,

    /// Chains dropped because the rating site blocked the request
    pub chains_abandoned: u64,

    /// Tasks given up on a fetch or handler error
    pub tasks_failed: u64,

    /// Tasks not run, or run without effect, because the target was reached
    pub tasks_skipped: u64,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    /// Creates empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock duration of the run, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => Some((finished - started).num_seconds()),
            _ => None,
        }
    }

    /// Total pages fetched and handled
    pub fn pages_handled(&self) -> u64 {
        self.category_pages + self.detail_pages + self.rating_pages
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Category listings: {}", stats.category_pages);
    println!("  Film articles: {}", stats.detail_pages);
    println!("  Rating pages: {}", stats.rating_pages);
    println!();

    println!("Records:");
    println!("  Emitted: {}", stats.records_emitted);
    println!("  Chains abandoned (blocked): {}", stats.chains_abandoned);
    println!("  Tasks failed: {}", stats.tasks_failed);
    println!("  Tasks skipped at target: {}", stats.tasks_skipped);
    println!();

    if let Some(duration) = stats.duration_seconds() {
        println!("Duration: {} seconds", duration);
    }
}
