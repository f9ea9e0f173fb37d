//! Output module for finished records and run reports
//!
//! This module handles:
//! - The item sink seam the coordinator writes records through
//! - CSV output, truncated once at the start of a run
//! - Run statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{CsvSink, CSV_HEADERS};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{ItemSink, MemorySink, OutputError, OutputResult};
