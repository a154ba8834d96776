//! CSV to project file import.

use super::{ConversionReport, ElementOutcome, normalize_dir};
use crate::io::convert::to_record_set;
use crate::io::formats::{CsvOptions, read_table_file};
use crate::models::{ElementKind, Extents, Table};
use crate::registry::SchemaRegistry;
use crate::storage::ProjectStore;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Result of [`ImportService::import_project`].
#[derive(Debug)]
pub struct ImportReport {
    /// Project file written.
    pub container: PathBuf,
    /// Normalized source directory.
    pub source_dir: PathBuf,
    /// Per-element outcomes, extents first.
    pub report: ConversionReport,
}

/// Imports CSV tables into project files.
pub struct ImportService<'a, S: ProjectStore> {
    store: S,
    registry: &'a SchemaRegistry,
    options: CsvOptions,
}

impl<'a, S: ProjectStore> ImportService<'a, S> {
    /// Creates an import service.
    #[must_use]
    pub const fn new(store: S, registry: &'a SchemaRegistry, options: CsvOptions) -> Self {
        Self {
            store,
            registry,
            options,
        }
    }

    /// Imports one CSV file into one element of an existing project file.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceMissing`] if `source` is not a file
    /// - [`Error::ContainerMissing`] if the project file does not exist
    /// - conversion and store errors from [`Self::import_table`]
    #[instrument(skip_all, fields(element = %element))]
    pub fn import_element(
        &self,
        container: &Path,
        source: &Path,
        element: ElementKind,
    ) -> Result<usize> {
        if !source.is_file() {
            return Err(Error::SourceMissing(source.to_path_buf()));
        }
        self.require_container(container)?;

        let mut table = read_table_file(source, &self.options)?;
        let schema = self.registry.schema(element);
        if table.strip_index_column(schema.len()) {
            tracing::debug!(source = %source.display(), "Dropped index column");
        }
        self.import_table(container, &table, element)
    }

    /// Writes an in-memory table into one element of an existing project
    /// file, replacing its previous contents.
    ///
    /// For [`ElementKind::Extents`] the table must hold exactly one row.
    ///
    /// # Errors
    ///
    /// - [`Error::ContainerMissing`] if the project file does not exist
    /// - [`Error::SchemaMismatch`] or [`Error::TypeCoercion`] from conversion
    /// - [`Error::InvalidInput`] for an extents table without exactly one row
    /// - [`Error::Store`] if the write is rejected
    pub fn import_table(
        &self,
        container: &Path,
        table: &Table,
        element: ElementKind,
    ) -> Result<usize> {
        self.require_container(container)?;
        let schema = self.registry.schema(element);

        if element == ElementKind::Extents {
            let extents = extents_from_table(table, self.registry)?;
            self.store.set_extents(container, &extents)?;
            return Ok(1);
        }

        let records = to_record_set(table, element, schema)?;
        self.store.set_records(container, element, &records)?;
        Ok(records.len())
    }

    /// Builds a project file from a directory of CSV files.
    ///
    /// A missing or malformed element file is reported and skipped. Only a
    /// failure to set up the project file aborts the run.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyExists`] if the project file exists and `overwrite`
    ///   is false
    /// - [`Error::SourceDirMissing`] if `source_dir` is blank or not a
    ///   directory
    /// - store errors from removing or creating the project file
    #[instrument(skip(self))]
    pub fn import_project(
        &self,
        container: &Path,
        source_dir: &Path,
        overwrite: bool,
    ) -> Result<ImportReport> {
        let exists = self.store.exists(container);
        if exists && !overwrite {
            return Err(Error::AlreadyExists(container.to_path_buf()));
        }

        // Checked before any removal.
        let source_dir = normalize_dir(source_dir)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| Error::SourceDirMissing(source_dir.to_path_buf()))?;

        if exists {
            info!(container = %container.display(), "Replacing existing project file");
            self.store.remove(container)?;
        }
        self.store.create_basic(container)?;

        let mut report = ConversionReport::default();
        let extents_file = source_dir.join(ElementKind::Extents.file_name());
        let extents_outcome = if extents_file.is_file() {
            ElementOutcome::from_result(self.import_element(
                container,
                &extents_file,
                ElementKind::Extents,
            ))
        } else {
            ElementOutcome::Skipped {
                reason: format!("{} not found", extents_file.display()),
            }
        };
        report.record("import", ElementKind::Extents, extents_outcome);

        for (element, _) in self.registry.row_elements() {
            let source = source_file(&source_dir, element);
            let outcome =
                ElementOutcome::from_result(self.import_element(container, &source, element));
            report.record("import", element, outcome);
        }

        info!(
            written = report.written(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Import finished"
        );
        Ok(ImportReport {
            container: container.to_path_buf(),
            source_dir,
            report,
        })
    }

    fn require_container(&self, container: &Path) -> Result<()> {
        if self.store.exists(container) {
            Ok(())
        } else {
            Err(Error::ContainerMissing(container.to_path_buf()))
        }
    }
}

/// Picks `<stem>.csv`, falling back to `<element>.csv` when only that exists.
fn source_file(dir: &Path, element: ElementKind) -> PathBuf {
    let primary = dir.join(element.file_name());
    if primary.is_file() {
        return primary;
    }
    let fallback = dir.join(format!("{}.csv", element.as_str()));
    if fallback.is_file() {
        warn!(
            element = %element,
            file = %fallback.display(),
            "Using element-named file"
        );
        return fallback;
    }
    primary
}

/// Casts a one-row extents table and partitions it into groups.
fn extents_from_table(table: &Table, registry: &SchemaRegistry) -> Result<Extents> {
    let schema = registry.schema(ElementKind::Extents);
    if !schema.matches_names(table.columns()) {
        return Err(Error::SchemaMismatch {
            element: ElementKind::Extents.to_string(),
            table_columns: table.columns().to_vec(),
            schema_columns: schema.names(),
        });
    }
    if table.len() != 1 {
        return Err(Error::InvalidInput(format!(
            "extents needs exactly one data row, found {}",
            table.len()
        )));
    }
    let cast = table.cast(schema)?;
    let row = cast.rows().first().map_or(&[][..], Vec::as_slice);
    Extents::from_row(row)
}
