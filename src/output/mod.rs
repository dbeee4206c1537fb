//! Output module for writing harvested rows
//!
//! This module handles:
//! - The `RowSink` abstraction over row destinations
//! - CSV file output
//! - Skipping rows that fail to serialize without aborting the write

mod csv_output;
mod traits;

pub use csv_output::CsvRowWriter;
pub use traits::{OutputError, OutputResult, RowSink};

use crate::harvest::Row;
use std::path::Path;

/// Writes every row to a sink, skipping rows that fail
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows written
/// * `Err(OutputError)` - The final flush failed
pub fn write_rows(sink: &mut dyn RowSink, rows: &[Row]) -> OutputResult<usize> {
    let mut written = 0;
    for (index, row) in rows.iter().enumerate() {
        match sink.write_row(row) {
            Ok(()) => written += 1,
            Err(e) => {
                tracing::error!("Error {} occurred in row {}: {:?}", e, index, row);
            }
        }
    }

    sink.flush()?;
    tracing::info!("Wrote {} of {} rows", written, rows.len());
    Ok(written)
}

/// Writes rows to a CSV file at `path`
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows written
/// * `Err(OutputError)` - The file could not be created or flushed
pub fn write_csv(path: &Path, rows: &[Row]) -> OutputResult<usize> {
    let mut writer = CsvRowWriter::create(path)?;
    let written = write_rows(&mut writer, rows)?;
    tracing::info!("Closing csv output file {}", path.display());
    Ok(written)
}
