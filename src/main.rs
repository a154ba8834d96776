//! Binary entry point for loopcsv.
//!
//! This binary provides the CLI interface for converting project files.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use loopcsv::ElementKind;
use loopcsv::config::LoopCsvConfig;
use loopcsv::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// loopcsv - convert Loop project files to and from CSV directories.
#[derive(Parser)]
#[command(name = "loopcsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "LOOPCSV_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build a project file from a directory of CSV files.
    FromCsv {
        /// Project file to create.
        project: PathBuf,

        /// Directory holding the element CSV files.
        source_dir: PathBuf,

        /// Replace the project file if it exists.
        #[arg(long)]
        overwrite: bool,
    },

    /// Write every element of a project file into a directory.
    ToCsv {
        /// Project file to read.
        project: PathBuf,

        /// Output directory, created if absent.
        output_dir: PathBuf,
    },

    /// Import one CSV file into one element.
    ElementFromCsv {
        /// Project file to update.
        project: PathBuf,

        /// CSV file to read.
        file: PathBuf,

        /// Element name or file stem, e.g. `contacts` or `faultObs`.
        #[arg(short, long)]
        element: ElementKind,

        /// Create an empty project file first if it does not exist.
        #[arg(long)]
        create: bool,
    },

    /// Export one element into a CSV file.
    ElementToCsv {
        /// Project file to read.
        project: PathBuf,

        /// CSV file to write.
        file: PathBuf,

        /// Element name or file stem, e.g. `contacts` or `faultObs`.
        #[arg(short, long)]
        element: ElementKind,
    },

    /// List element schemas.
    Elements {
        /// Show only this element.
        #[arg(short, long)]
        element: Option<ElementKind>,
    },

    /// Show the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match LoopCsvConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &LoopCsvConfig) -> loopcsv::Result<()> {
    match command {
        Commands::FromCsv {
            project,
            source_dir,
            overwrite,
        } => commands::cmd_from_csv(config, &project, &source_dir, overwrite),

        Commands::ToCsv {
            project,
            output_dir,
        } => commands::cmd_to_csv(config, &project, &output_dir),

        Commands::ElementFromCsv {
            project,
            file,
            element,
            create,
        } => commands::cmd_element_from_csv(config, &project, &file, element, create),

        Commands::ElementToCsv {
            project,
            file,
            element,
        } => commands::cmd_element_to_csv(config, &project, &file, element),

        Commands::Elements { element } => {
            commands::cmd_elements(element);
            Ok(())
        },

        Commands::Config => commands::cmd_config(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_element_stem() {
        let cli = Cli::try_parse_from([
            "loopcsv",
            "element-to-csv",
            "p.loop3d",
            "out.csv",
            "--element",
            "faultObs",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::ElementToCsv {
                element: ElementKind::FaultObservations,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_element_rejected() {
        assert!(
            Cli::try_parse_from(["loopcsv", "elements", "--element", "gravity"]).is_err()
        );
    }
}
