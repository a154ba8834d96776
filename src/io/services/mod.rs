//! Import and export services.
//!
//! The services drive the store, the registry and the CSV format. Project
//! level runs never stop at the first bad element: each element's outcome is
//! collected into a [`ConversionReport`] and the caller decides how to present
//! it.

pub mod export;
pub mod import;

pub use export::{ExportReport, ExportService};
pub use import::{ImportReport, ImportService};

use crate::Error;
use crate::models::ElementKind;
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to one element during a project-level run.
#[derive(Debug)]
pub enum ElementOutcome {
    /// The element was converted.
    Written {
        /// Number of data rows converted.
        rows: usize,
    },
    /// The element was absent on the source side.
    Skipped {
        /// Why nothing was converted.
        reason: String,
    },
    /// Conversion failed; the batch continued.
    Failed {
        /// The failure.
        error: Error,
    },
}

impl ElementOutcome {
    /// Folds a single-element result into an outcome.
    ///
    /// Absent sources become skips; every other error is a failure.
    #[must_use]
    pub fn from_result(result: crate::Result<usize>) -> Self {
        match result {
            Ok(rows) => Self::Written { rows },
            Err(e) if e.is_skip() => Self::Skipped {
                reason: e.to_string(),
            },
            Err(error) => Self::Failed { error },
        }
    }

    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Written { .. } => "written",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for ElementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written { rows } => write!(f, "{rows} rows"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
            Self::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// Outcome of one element.
#[derive(Debug)]
pub struct ElementReport {
    /// The element.
    pub element: ElementKind,
    /// What happened to it.
    pub outcome: ElementOutcome,
}

/// Per-element outcomes of a project-level run, in processing order.
#[derive(Debug, Default)]
pub struct ConversionReport {
    elements: Vec<ElementReport>,
}

impl ConversionReport {
    /// Records an outcome and counts it.
    pub fn record(
        &mut self,
        direction: &'static str,
        element: ElementKind,
        outcome: ElementOutcome,
    ) {
        let label = outcome.label();
        match &outcome {
            ElementOutcome::Written { rows } => {
                tracing::info!(direction, element = %element, rows, "Element converted");
            },
            ElementOutcome::Skipped { reason } => {
                tracing::warn!(direction, element = %element, reason = %reason, "Element skipped");
            },
            ElementOutcome::Failed { error } => {
                tracing::error!(direction, element = %element, error = %error, "Element failed");
            },
        }
        metrics::counter!(
            "loopcsv_elements_total",
            "direction" => direction,
            "outcome" => label
        )
        .increment(1);
        self.elements.push(ElementReport { element, outcome });
    }

    /// Returns every element report in processing order.
    #[must_use]
    pub fn elements(&self) -> &[ElementReport] {
        &self.elements
    }

    /// Returns the outcome recorded for `element`, if any.
    #[must_use]
    pub fn outcome(&self, element: ElementKind) -> Option<&ElementOutcome> {
        self.elements
            .iter()
            .find(|r| r.element == element)
            .map(|r| &r.outcome)
    }

    /// Number of elements written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, ElementOutcome::Written { .. }))
    }

    /// Number of elements skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ElementOutcome::Skipped { .. }))
    }

    /// Number of elements that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ElementOutcome::Failed { .. }))
    }

    /// Returns true if any element failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&ElementOutcome) -> bool) -> usize {
        self.elements.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Normalizes a directory argument: backslashes become `/` and a trailing
/// separator is added.
///
/// Returns `None` for an empty or blank path, which would otherwise
/// normalize to the filesystem root.
#[must_use]
pub fn normalize_dir(dir: &Path) -> Option<PathBuf> {
    let mut s = dir.to_string_lossy().replace('\\', "/");
    if s.trim().is_empty() {
        return None;
    }
    if !s.ends_with('/') {
        s.push('/');
    }
    Some(PathBuf::from(s))
}
