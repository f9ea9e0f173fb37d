//! Item sink trait and output errors
//!
//! An item sink receives every finished record, in the order the coordinator
//! sees them complete.

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write record: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for finished records
///
/// Implementations own any reset of their destination; it happens once,
/// when the sink is created, never per record.
pub trait ItemSink {
    /// Appends one record
    fn emit(&mut self, record: &Record) -> OutputResult<()>;

    /// Flushes anything still buffered at the end of a run
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Sink that keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl ItemSink for MemorySink {
    fn emit(&mut self, record: &Record) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
