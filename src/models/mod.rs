//! Data models for loopcsv.
//!
//! Element kinds, column schemas, the in-memory table exchanged with CSV
//! files, the fixed-layout record sets exchanged with the store, and the
//! flat extents record.

mod element;
mod extents;
mod record;
mod schema;
mod table;
mod value;

pub use element::ElementKind;
pub use extents::{EXTENTS_COLUMNS, Extents, ExtentsSummary};
pub use record::{Field, RecordSet, truncate_utf8};
pub use schema::{Column, ColumnType, Schema};
pub use table::Table;
pub use value::{Value, decode_bytes, format_float, parse_float, parse_integer};
