//! CSV Export
//!
//! Serialises rows to CSV with a fixed header line.

use crate::error::{Error, Result};
use std::io::Write;

/// A row that can be written as one CSV record
pub trait CsvRecord {
    /// Header line, one entry per field
    const HEADERS: &'static [&'static str];

    /// Field values in header order
    fn record(&self) -> Vec<String>;
}

/// Write a header plus one record per row; returns the number of rows written
pub fn write_csv<'a, R, I, W>(writer: W, rows: I) -> Result<usize>
where
    R: CsvRecord + 'a,
    I: IntoIterator<Item = &'a R>,
    W: Write,
{
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(R::HEADERS)?;
    let mut count = 0;
    for row in rows {
        csv.write_record(row.record())?;
        count += 1;
    }
    csv.flush()?;
    Ok(count)
}

/// Render rows to an in-memory CSV document
pub fn export_csv_string<'a, R, I>(rows: I) -> Result<String>
where
    R: CsvRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    String::from_utf8(buffer).map_err(|e| Error::Invalid {
        message: format!("CSV output is not UTF-8: {e}"),
    })
}
