//! File format adapters.
//!
//! Each format implements [`TableSource`](super::traits::TableSource) and
//! [`TableSink`](super::traits::TableSink).

pub mod csv;

pub use self::csv::{CsvOptions, CsvTableSink, CsvTableSource, read_table_file, write_table_file};
