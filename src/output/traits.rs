//! Output sink trait and error types
//!
//! A sink receives harvested rows one at a time so that a single bad row can
//! be reported and skipped without losing the rest.

use crate::harvest::Row;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write row: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for harvested rows
pub trait RowSink {
    /// Writes one row as a single record
    fn write_row(&mut self, row: &Row) -> OutputResult<()>;

    /// Pushes buffered records to the underlying storage
    fn flush(&mut self) -> OutputResult<()>;
}
