//! Conversion command handlers.

use std::path::Path;

use loopcsv::config::LoopCsvConfig;
use loopcsv::io::{ConversionReport, ExportService, ImportService};
use loopcsv::{ElementKind, Error, ProjectStore, Result, SchemaRegistry, SqliteProjectStore};

/// Executes the from-csv command.
pub fn cmd_from_csv(
    config: &LoopCsvConfig,
    project: &Path,
    source_dir: &Path,
    overwrite: bool,
) -> Result<()> {
    let registry = SchemaRegistry::standard();
    let service = ImportService::new(SqliteProjectStore::new(), &registry, config.csv);

    let result = service.import_project(project, source_dir, overwrite)?;

    println!(
        "Imported {} into {}",
        result.source_dir.display(),
        result.container.display()
    );
    print_report(&result.report);
    check_failures("from_csv", &result.report)
}

/// Executes the to-csv command.
pub fn cmd_to_csv(config: &LoopCsvConfig, project: &Path, output_dir: &Path) -> Result<()> {
    let registry = SchemaRegistry::standard();
    let service = ExportService::new(SqliteProjectStore::new(), &registry, config.csv);

    let result = service.export_project(project, output_dir)?;

    println!(
        "Exported {} (format {}) to {}",
        project.display(),
        result.version,
        result.output_dir.display()
    );
    println!();
    println!("{}", result.extents_summary);
    println!();
    print_report(&result.report);
    check_failures("to_csv", &result.report)
}

/// Executes the element-from-csv command.
pub fn cmd_element_from_csv(
    config: &LoopCsvConfig,
    project: &Path,
    file: &Path,
    element: ElementKind,
    create: bool,
) -> Result<()> {
    let store = SqliteProjectStore::new();
    if create && !store.exists(project) {
        store.create_basic(project)?;
        println!("Created {}", project.display());
    }

    let registry = SchemaRegistry::standard();
    let service = ImportService::new(&store, &registry, config.csv);
    let rows = service.import_element(project, file, element)?;

    println!("Wrote {rows} rows of {} into {}", element.label(), project.display());
    Ok(())
}

/// Executes the element-to-csv command.
pub fn cmd_element_to_csv(
    config: &LoopCsvConfig,
    project: &Path,
    file: &Path,
    element: ElementKind,
) -> Result<()> {
    let registry = SchemaRegistry::standard();
    let service = ExportService::new(SqliteProjectStore::new(), &registry, config.csv);
    let rows = service.export_element(project, file, element)?;

    println!("Wrote {rows} rows of {} to {}", element.label(), file.display());
    Ok(())
}

fn print_report(report: &ConversionReport) {
    for entry in report.elements() {
        println!("  {:<28} {}", entry.element.as_str(), entry.outcome);
    }
    println!();
    println!(
        "{} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    );
}

fn check_failures(operation: &str, report: &ConversionReport) -> Result<()> {
    if report.has_failures() {
        return Err(Error::operation(
            operation,
            format!("{} element(s) failed", report.failed()),
        ));
    }
    Ok(())
}
