//! Delimited text tables.
//!
//! Every cell is read as text; typing happens in the record converter.
//! Written files carry a header row and, optionally, a leading unnamed index
//! column numbering the rows from zero.

use crate::io::traits::{TableSink, TableSource};
use crate::models::{Table, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Settings shared by CSV reading and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Whether exported element files get a leading index column.
    pub write_index: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            write_index: true,
        }
    }
}

impl CsvOptions {
    /// Returns a copy with the index column disabled.
    #[must_use]
    pub const fn without_index(self) -> Self {
        Self {
            write_index: false,
            ..self
        }
    }
}

/// Reads a table from delimited text.
pub struct CsvTableSource<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CsvTableSource<R> {
    /// Creates a source over `reader`.
    pub fn new(reader: R, options: &CsvOptions) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(options.delimiter)
            .flexible(true) // width is checked per row with a better message
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        Self { reader }
    }
}

impl<R: Read> TableSource for CsvTableSource<R> {
    fn read_table(&mut self) -> Result<Table> {
        let headers = self
            .reader
            .headers()
            .map_err(|e| Error::operation("read_csv_headers", e))?
            .clone();
        let mut table = Table::new(headers.iter());

        let mut record = csv::StringRecord::new();
        while self
            .reader
            .read_record(&mut record)
            .map_err(|e| Error::operation("read_csv", e))?
        {
            let line = record.position().map_or(0, csv::Position::line);
            table
                .push_row(record.iter().map(Value::text).collect())
                .map_err(|e| Error::InvalidInput(format!("line {line}: {e}")))?;
        }
        Ok(table)
    }
}

/// Writes a table as delimited text.
pub struct CsvTableSink<W: Write> {
    writer: csv::Writer<W>,
    write_index: bool,
}

impl<W: Write> CsvTableSink<W> {
    /// Creates a sink over `writer`.
    pub fn new(writer: W, options: &CsvOptions) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(options.delimiter)
            .from_writer(writer);
        Self {
            writer,
            write_index: options.write_index,
        }
    }
}

impl<W: Write> TableSink for CsvTableSink<W> {
    fn write_table(&mut self, table: &Table) -> Result<()> {
        let index_header = self.write_index.then_some("");
        let header = index_header
            .into_iter()
            .chain(table.columns().iter().map(String::as_str));
        self.writer
            .write_record(header)
            .map_err(|e| Error::operation("write_csv_headers", e))?;

        for (idx, row) in table.rows().iter().enumerate() {
            let index = self.write_index.then(|| idx.to_string());
            let cells = index.into_iter().chain(row.iter().map(Value::to_cell));
            self.writer
                .write_record(cells)
                .map_err(|e| Error::operation("write_csv", e))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::operation("flush_csv", e))
    }
}

/// Reads the whole CSV file at `path` into a table.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be opened or parsed.
pub fn read_table_file(path: &Path, options: &CsvOptions) -> Result<Table> {
    let file = File::open(path)
        .map_err(|e| Error::operation("open_csv", format!("{}: {e}", path.display())))?;
    CsvTableSource::new(BufReader::new(file), options).read_table()
}

/// Writes `table` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be written.
pub fn write_table_file(path: &Path, table: &Table, options: &CsvOptions) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::operation("create_csv", format!("{}: {e}", path.display())))?;
    let mut sink = CsvTableSink::new(BufWriter::new(file), options);
    sink.write_table(table)?;
    sink.finish()
}
