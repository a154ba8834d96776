//! CSV import and export.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`TableSource`] and [`TableSink`]
//! - **Converter** turns tables into record sets and back, driven by a schema
//! - **Services** orchestrate files, the registry and the project store
//!
//! # Examples
//!
//! ```rust,no_run
//! use loopcsv::io::{CsvOptions, ImportService};
//! use loopcsv::{SchemaRegistry, SqliteProjectStore};
//! use std::path::Path;
//!
//! let registry = SchemaRegistry::standard();
//! let service = ImportService::new(SqliteProjectStore::new(), &registry, CsvOptions::default());
//! let result = service.import_project(Path::new("model.loop3d"), Path::new("csv/"), true)?;
//! println!("{} elements written", result.report.written());
//! # Ok::<(), loopcsv::Error>(())
//! ```

pub mod convert;
pub mod formats;
pub mod services;
pub mod traits;

pub use convert::{to_record_set, to_table};
pub use formats::{CsvOptions, CsvTableSink, CsvTableSource};
pub use services::{
    ConversionReport, ElementOutcome, ElementReport, ExportReport, ExportService, ImportReport,
    ImportService,
};
pub use traits::{TableSink, TableSource};
