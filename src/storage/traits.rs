//! Project store trait.

use crate::models::{ElementKind, Extents, RecordSet, Schema};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Version marker written into every project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormatVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Sub-minor version.
    pub patch: u32,
}

impl FormatVersion {
    /// Version written by [`ProjectStore::create_basic`].
    pub const CURRENT: Self = Self {
        major: 0,
        minor: 1,
        patch: 0,
    };
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Storage collaborator for project files.
///
/// A project file is addressed by its path; elements inside it by
/// [`ElementKind`]. Implementations own the container format. Each call is
/// self-contained: handles are opened and released within the call, on the
/// error path too.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Element absent | [`crate::Error::NotFound`] |
/// | No version marker | [`crate::Error::NotAProjectFile`] |
/// | Anything the backend rejects | [`crate::Error::Store`] with the backend's message |
pub trait ProjectStore {
    /// Returns true if a container exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Deletes the container at `path`.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Creates an empty project file with its group structure and version
    /// marker. Fails if something already exists at `path`.
    fn create_basic(&self, path: &Path) -> Result<()>;

    /// Reads the format version marker.
    fn version(&self, path: &Path) -> Result<FormatVersion>;

    /// Reads the records of a row-collection element, decoded with `schema`.
    fn get_records(&self, path: &Path, element: ElementKind, schema: &Schema)
    -> Result<RecordSet>;

    /// Writes the records of a row-collection element, replacing any
    /// previous contents.
    fn set_records(&self, path: &Path, element: ElementKind, records: &RecordSet) -> Result<()>;

    /// Reads the extents groups, coerced with the extents `schema`.
    fn get_extents(&self, path: &Path, schema: &Schema) -> Result<Extents>;

    /// Writes the extents groups.
    fn set_extents(&self, path: &Path, extents: &Extents) -> Result<()>;
}

/// Rejects record access to elements that are not row collections.
pub(crate) fn require_rows(element: ElementKind) -> Result<()> {
    if element.is_row_collection() {
        Ok(())
    } else {
        Err(crate::Error::InvalidInput(format!(
            "{element} is not a row collection; use the extents interface"
        )))
    }
}

impl<T: ProjectStore + ?Sized> ProjectStore for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        (**self).remove(path)
    }

    fn create_basic(&self, path: &Path) -> Result<()> {
        (**self).create_basic(path)
    }

    fn version(&self, path: &Path) -> Result<FormatVersion> {
        (**self).version(path)
    }

    fn get_records(
        &self,
        path: &Path,
        element: ElementKind,
        schema: &Schema,
    ) -> Result<RecordSet> {
        (**self).get_records(path, element, schema)
    }

    fn set_records(&self, path: &Path, element: ElementKind, records: &RecordSet) -> Result<()> {
        (**self).set_records(path, element, records)
    }

    fn get_extents(&self, path: &Path, schema: &Schema) -> Result<Extents> {
        (**self).get_extents(path, schema)
    }

    fn set_extents(&self, path: &Path, extents: &Extents) -> Result<()> {
        (**self).set_extents(path, extents)
    }
}
