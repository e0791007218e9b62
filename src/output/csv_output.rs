//! CSV record sink
//!
//! Writes the header row on creation, then one row per record. Fields are
//! quoted only when they contain the separator, a quote, CR or LF.

use crate::output::traits::{OutputRecord, OutputResult, RecordSink, OUTPUT_COLUMNS};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const SEPARATOR: char = ',';

/// Record sink writing comma-separated rows to any writer
pub struct CsvSink<W: Write> {
    writer: W,
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) the CSV file at `path` and writes the header
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer and writes the header row
    pub fn new(mut writer: W) -> OutputResult<Self> {
        write_row(&mut writer, &OUTPUT_COLUMNS)?;
        Ok(Self { writer })
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn emit(&mut self, record: &OutputRecord) -> OutputResult<()> {
        write_row(&mut self.writer, &record.fields())?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes a single CSV row, CRLF-terminated
fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", SEPARATOR)?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    write!(w, "\r\n")
}
