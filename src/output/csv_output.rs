//! CSV output for harvested rows

use crate::harvest::Row;
use crate::output::traits::{OutputResult, RowSink};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes rows as comma-separated records
///
/// Rows may differ in length (a header row and short malformed rows are
/// written as-is), so the writer runs in flexible mode.
pub struct CsvRowWriter<W: Write> {
    writer: Writer<W>,
    rows_written: usize,
}

impl CsvRowWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        tracing::debug!("Opening csv output file {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> CsvRowWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = WriterBuilder::new().flexible(true).from_writer(inner);
        Self {
            writer,
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::output::OutputError::Io(e.into_error()))
    }
}

impl<W: Write> RowSink for CsvRowWriter<W> {
    fn write_row(&mut self, row: &Row) -> OutputResult<()> {
        self.writer.write_record(row)?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
