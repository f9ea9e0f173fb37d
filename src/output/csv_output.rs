//! CSV item sink

use crate::output::traits::{ItemSink, OutputResult};
use crate::record::Record;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Column names, in record field order
pub const CSV_HEADERS: [&str; 6] = [
    "Название",
    "Жанр",
    "Режиссёр",
    "Страна",
    "Год",
    "IMDB Rating",
];

/// Writes records to a CSV file
///
/// The file is truncated and the header written when the sink is created;
/// every record is flushed as soon as it is written.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    written: usize,
}

impl CsvSink {
    /// Creates (or truncates) the file at `path` and writes the header row
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(CSV_HEADERS)?;
        writer.flush()?;

        tracing::debug!("Opened CSV output at {}", path.display());

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ItemSink for CsvSink {
    fn emit(&mut self, record: &Record) -> OutputResult<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        tracing::info!("Wrote {} records to {}", self.written, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PartialRecord;
    use tempfile::NamedTempFile;

    fn record(title: &str, rating: Option<&str>) -> Record {
        PartialRecord {
            title: title.to_string(),
            genre: "драма, криминал".to_string(),
            director: "Алексей Балабанов".to_string(),
            country: "Россия".to_string(),
            year: "1997".to_string(),
        }
        .finalize(rating.map(str::to_string))
    }

    #[test]
    fn test_header_written_on_create() {
        let file = NamedTempFile::new().unwrap();
        let mut sink = CsvSink::create(file.path()).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "Название,Жанр,Режиссёр,Страна,Год,IMDB Rating\n");
    }

    #[test]
    fn test_records_written_in_field_order() {
        let file = NamedTempFile::new().unwrap();
        let mut sink = CsvSink::create(file.path()).unwrap();
        sink.emit(&record("Брат", Some("7.9"))).unwrap();
        sink.emit(&record("Брат 2", None)).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 2);

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "Брат,\"драма, криминал\",Алексей Балабанов,Россия,1997,7.9"
        );
        assert_eq!(
            lines[2],
            "Брат 2,\"драма, криминал\",Алексей Балабанов,Россия,1997,Not specified"
        );
    }

    #[test]
    fn test_existing_file_truncated_once() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "stale,data\nfrom,last run\n").unwrap();

        let mut sink = CsvSink::create(file.path()).unwrap();
        sink.emit(&record("Брат", Some("7.9"))).unwrap();
        sink.emit(&record("Брат 2", Some("7.3"))).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 3);
    }
}
