//! # loopcsv
//!
//! Converts Loop geological project files to and from directories of CSV
//! tables.
//!
//! A project file holds one record set per geological element (contacts,
//! fault/fold/foliation/discontinuity logs and observations, stratigraphy,
//! event relationships) plus a flat extents record. Every element has a fixed,
//! typed column layout kept in the [`registry::SchemaRegistry`]; a single
//! schema-driven converter maps CSV tables onto those layouts and back.
//!
//! ## Example
//!
//! ```rust,ignore
//! use loopcsv::io::{CsvOptions, ExportService, ImportService};
//! use loopcsv::registry::SchemaRegistry;
//! use loopcsv::storage::SqliteProjectStore;
//!
//! let registry = SchemaRegistry::standard();
//! let store = SqliteProjectStore::new();
//! let import = ImportService::new(&store, &registry, CsvOptions::default());
//! let result = import.import_project("/tmp/p.loop3d".as_ref(), "/data/proj/".as_ref(), true)?;
//! println!("{} elements written", result.report.written());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod registry;
pub mod storage;

// Re-exports for convenience
pub use config::LoopCsvConfig;
pub use models::{ColumnType, ElementKind, Extents, RecordSet, Schema, Table, Value};
pub use registry::SchemaRegistry;
pub use storage::{MemoryProjectStore, ProjectStore, SqliteProjectStore};

/// Error type for loopcsv operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `SourceMissing` | A CSV file named for import does not exist |
/// | `ContainerMissing` | The project file has not been created yet |
/// | `AlreadyExists` | Import would replace a project file without overwrite |
/// | `SourceDirMissing` | The CSV import directory is not a directory |
/// | `SchemaMismatch` | Table columns differ from the element schema |
/// | `TypeCoercion` | A cell cannot be converted to its column type |
/// | `NotFound` | An element is absent from the project file |
/// | `NotAProjectFile` | The file carries no format version marker |
/// | `Store` | The backing store rejected a read or write |
/// | `InvalidInput` | Unknown element names, malformed extents rows |
/// | `OperationFailed` | Filesystem, CSV, or config I/O fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A source CSV file does not exist.
    #[error("source file {} does not exist", .0.display())]
    SourceMissing(PathBuf),

    /// The project file does not exist.
    ///
    /// Single-element import requires a bootstrapped container; create one
    /// with `ProjectStore::create_basic` first.
    #[error("project file {} does not exist", .0.display())]
    ContainerMissing(PathBuf),

    /// The project file exists and overwrite was not requested.
    #[error("project file {} already exists and overwrite not set", .0.display())]
    AlreadyExists(PathBuf),

    /// The import directory is missing or not a directory.
    #[error("import path {} does not exist", .0.display())]
    SourceDirMissing(PathBuf),

    /// Table columns do not match the element schema.
    ///
    /// Carries both column lists so the difference can be diagnosed without
    /// inspecting the file.
    #[error("columns of '{element}' {table_columns:?} do not match schema {schema_columns:?}")]
    SchemaMismatch {
        /// Element being converted.
        element: String,
        /// Column names found in the table.
        table_columns: Vec<String>,
        /// Column names required by the schema.
        schema_columns: Vec<String>,
    },

    /// A cell could not be coerced to the column's declared type.
    #[error("row {row}, column '{column}': cannot convert {value:?} to {expected}")]
    TypeCoercion {
        /// Column name.
        column: String,
        /// Zero-based data row index.
        row: usize,
        /// Offending cell text.
        value: String,
        /// Declared column type.
        expected: String,
    },

    /// The element is absent from the project file.
    #[error("no {element} present in {} for access request", container.display())]
    NotFound {
        /// Requested element.
        element: String,
        /// Project file path.
        container: PathBuf,
    },

    /// The file has no format version marker.
    #[error("{} is not a loop project file", .0.display())]
    NotAProjectFile(PathBuf),

    /// The store rejected an operation; message passed through verbatim.
    #[error("{0}")]
    Store(String),

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Wraps any displayable cause as [`Error::OperationFailed`].
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Returns true for errors meaning "nothing to process here" rather than
    /// a broken input.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::SourceMissing(_) | Self::NotFound { .. })
    }
}

/// Result type alias for loopcsv operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::operation("read_csv", "failed");
        assert_eq!(err.to_string(), "operation 'read_csv' failed: failed");

        let err = Error::NotAProjectFile(PathBuf::from("/tmp/x.loop3d"));
        assert_eq!(err.to_string(), "/tmp/x.loop3d is not a loop project file");
    }

    #[test]
    fn test_schema_mismatch_lists_both_sides() {
        let err = Error::SchemaMismatch {
            element: "contacts".to_string(),
            table_columns: vec!["a".to_string()],
            schema_columns: vec!["eventId".to_string(), "X".to_string()],
        };
        let display = err.to_string();
        assert!(display.contains("contacts"));
        assert!(display.contains("\"a\""));
        assert!(display.contains("\"eventId\", \"X\""));
    }

    #[test]
    fn test_is_skip() {
        assert!(Error::SourceMissing(PathBuf::from("a.csv")).is_skip());
        assert!(
            Error::NotFound {
                element: "faultLog".to_string(),
                container: PathBuf::from("p.loop3d"),
            }
            .is_skip()
        );
        assert!(!Error::Store("disk full".to_string()).is_skip());
    }
}
