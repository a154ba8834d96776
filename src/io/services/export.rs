//! Project file to CSV export.

use super::{ConversionReport, ElementOutcome, normalize_dir};
use crate::io::convert::to_table;
use crate::io::formats::{CsvOptions, write_table_file};
use crate::models::{ElementKind, Table};
use crate::registry::SchemaRegistry;
use crate::storage::{FormatVersion, ProjectStore};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Result of [`ExportService::export_project`].
#[derive(Debug)]
pub struct ExportReport {
    /// Normalized output directory.
    pub output_dir: PathBuf,
    /// Format version of the project file.
    pub version: FormatVersion,
    /// Printable summary of the extents.
    pub extents_summary: String,
    /// Per-element outcomes, extents first.
    pub report: ConversionReport,
}

/// Exports project file elements to CSV tables.
pub struct ExportService<'a, S: ProjectStore> {
    store: S,
    registry: &'a SchemaRegistry,
    options: CsvOptions,
}

impl<'a, S: ProjectStore> ExportService<'a, S> {
    /// Creates an export service.
    #[must_use]
    pub const fn new(store: S, registry: &'a SchemaRegistry, options: CsvOptions) -> Self {
        Self {
            store,
            registry,
            options,
        }
    }

    /// Reads one element into a table with decoded, typed cells.
    ///
    /// Extents come back as a single 15-column row.
    ///
    /// # Errors
    ///
    /// - [`Error::ContainerMissing`] if the project file does not exist
    /// - [`Error::NotFound`] if the element is absent
    /// - [`Error::Store`] if the read is rejected
    pub fn export_table(&self, container: &Path, element: ElementKind) -> Result<Table> {
        if !self.store.exists(container) {
            return Err(Error::ContainerMissing(container.to_path_buf()));
        }
        let schema = self.registry.schema(element);

        if element == ElementKind::Extents {
            let extents = self.store.get_extents(container, schema)?;
            return Table::from_rows(schema.names(), vec![extents.to_row()]);
        }

        let records = self.store.get_records(container, element, schema)?;
        to_table(&records, schema)
    }

    /// Writes one element to a CSV file, replacing the file.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Errors from [`Self::export_table`], and [`Error::OperationFailed`] if
    /// the file cannot be written.
    #[instrument(skip_all, fields(element = %element))]
    pub fn export_element(
        &self,
        container: &Path,
        dest: &Path,
        element: ElementKind,
    ) -> Result<usize> {
        let table = self.export_table(container, element)?;
        let options = if element == ElementKind::Extents {
            self.options.without_index()
        } else {
            self.options
        };
        write_table_file(dest, &table, &options)?;
        Ok(table.len())
    }

    /// Writes every element of a project file into `output_dir`.
    ///
    /// Nothing is written unless the file carries a version marker. Missing
    /// extents abort the run; a missing row element is reported as skipped.
    ///
    /// # Errors
    ///
    /// - [`Error::ContainerMissing`] if the project file does not exist
    /// - [`Error::NotAProjectFile`] if it has no version marker
    /// - [`Error::InvalidInput`] if `output_dir` is blank
    /// - [`Error::OperationFailed`] if `output_dir` cannot be created
    /// - any error reading or writing extents
    #[instrument(skip(self))]
    pub fn export_project(&self, container: &Path, output_dir: &Path) -> Result<ExportReport> {
        if !self.store.exists(container) {
            return Err(Error::ContainerMissing(container.to_path_buf()));
        }
        let version = self.store.version(container)?;
        info!(version = %version, "Exporting project file");

        let output_dir = normalize_dir(output_dir)
            .ok_or_else(|| Error::InvalidInput("output directory is empty".to_string()))?;
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            Error::operation("create_output_dir", format!("{}: {e}", output_dir.display()))
        })?;

        let schema = self.registry.schema(ElementKind::Extents);
        let extents = self.store.get_extents(container, schema)?;
        let extents_table = Table::from_rows(schema.names(), vec![extents.to_row()])?;
        write_table_file(
            &output_dir.join(ElementKind::Extents.file_name()),
            &extents_table,
            &self.options.without_index(),
        )?;
        let extents_summary = extents.summary().to_string();
        info!(summary = %extents_summary, "Exported extents");

        let mut report = ConversionReport::default();
        report.record("export", ElementKind::Extents, ElementOutcome::Written { rows: 1 });

        for (element, _) in self.registry.row_elements() {
            let dest = output_dir.join(element.file_name());
            let outcome =
                ElementOutcome::from_result(self.export_element(container, &dest, element));
            report.record("export", element, outcome);
        }

        info!(
            written = report.written(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Export finished"
        );
        Ok(ExportReport {
            output_dir,
            version,
            extents_summary,
            report,
        })
    }
}
