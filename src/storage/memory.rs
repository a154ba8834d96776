//! In-memory project store.
//!
//! Keeps every container in a map keyed by path. Records go through the same
//! packed codec as the `SQLite` backend so layout checks behave identically.

use super::codec::{check_layout, decode_records, encode_records, extents_from_groups};
use super::traits::{FormatVersion, ProjectStore, require_rows};
use crate::models::{ElementKind, Extents, RecordSet, Schema};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct Container {
    version: Option<FormatVersion>,
    datasets: HashMap<ElementKind, Dataset>,
    extents: Option<Extents>,
}

#[derive(Debug, Clone)]
struct Dataset {
    layout: String,
    data: Vec<u8>,
}

/// Project store holding containers in memory.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    containers: Mutex<HashMap<PathBuf, Container>>,
}

impl MemoryProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container that carries no version marker.
    pub fn insert_foreign(&self, path: impl Into<PathBuf>) {
        self.lock().insert(path.into(), Container::default());
    }

    /// Returns the number of containers held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no containers are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Container>> {
        match self.containers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Memory store mutex was poisoned, recovering");
                poisoned.into_inner()
            },
        }
    }

    fn with_container<T>(
        &self,
        path: &Path,
        f: impl FnOnce(&mut Container) -> Result<T>,
    ) -> Result<T> {
        let mut containers = self.lock();
        let container = containers.get_mut(path).ok_or_else(|| {
            Error::Store(format!("cannot open {}: no such container", path.display()))
        })?;
        f(container)
    }
}

fn not_found(element: ElementKind, path: &Path) -> Error {
    Error::NotFound {
        element: element.to_string(),
        container: path.to_path_buf(),
    }
}

impl ProjectStore for MemoryProjectStore {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Error::operation("remove_project_file", "no such container"))
    }

    fn create_basic(&self, path: &Path) -> Result<()> {
        let mut containers = self.lock();
        if containers.contains_key(path) {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        containers.insert(
            path.to_path_buf(),
            Container {
                version: Some(FormatVersion::CURRENT),
                ..Container::default()
            },
        );
        Ok(())
    }

    fn version(&self, path: &Path) -> Result<FormatVersion> {
        self.with_container(path, |c| {
            c.version
                .ok_or_else(|| Error::NotAProjectFile(path.to_path_buf()))
        })
    }

    fn get_records(
        &self,
        path: &Path,
        element: ElementKind,
        schema: &Schema,
    ) -> Result<RecordSet> {
        require_rows(element)?;
        self.with_container(path, |c| {
            let dataset = c
                .datasets
                .get(&element)
                .ok_or_else(|| not_found(element, path))?;
            check_layout(element, &dataset.layout, schema)?;
            decode_records(&dataset.data, schema)
        })
    }

    fn set_records(&self, path: &Path, element: ElementKind, records: &RecordSet) -> Result<()> {
        require_rows(element)?;
        self.with_container(path, |c| {
            c.datasets.insert(
                element,
                Dataset {
                    layout: records.schema().descriptor(),
                    data: encode_records(records),
                },
            );
            Ok(())
        })
    }

    fn get_extents(&self, path: &Path, schema: &Schema) -> Result<Extents> {
        self.with_container(path, |c| {
            let extents = c
                .extents
                .as_ref()
                .ok_or_else(|| not_found(ElementKind::Extents, path))?;
            extents_from_groups(
                extents.geodesic().to_vec(),
                extents.utm().to_vec(),
                extents.depth().to_vec(),
                extents.spacing().to_vec(),
                schema,
            )
        })
    }

    fn set_extents(&self, path: &Path, extents: &Extents) -> Result<()> {
        self.with_container(path, |c| {
            c.extents = Some(extents.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, Value};
    use crate::registry::SchemaRegistry;

    #[test]
    fn test_create_and_version() {
        let store = MemoryProjectStore::new();
        let path = Path::new("a.loop3d");
        assert!(!store.exists(path));
        store.create_basic(path).unwrap();
        assert!(store.exists(path));
        assert_eq!(store.version(path).unwrap(), FormatVersion::CURRENT);
        assert!(matches!(
            store.create_basic(path),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_foreign_container() {
        let store = MemoryProjectStore::new();
        store.insert_foreign("b.h5");
        assert!(matches!(
            store.version(Path::new("b.h5")),
            Err(Error::NotAProjectFile(_))
        ));
    }

    #[test]
    fn test_records_and_missing() {
        let store = MemoryProjectStore::new();
        let path = Path::new("a.loop3d");
        store.create_basic(path).unwrap();
        let registry = SchemaRegistry::standard();
        let schema = registry.schema(ElementKind::EventRelationships);

        assert!(matches!(
            store.get_records(path, ElementKind::EventRelationships, schema),
            Err(Error::NotFound { .. })
        ));

        let set = RecordSet::new(
            schema.clone(),
            vec![vec![Field::UInt32(1), Field::UInt32(2), Field::UInt8(0)]],
        )
        .unwrap();
        store
            .set_records(path, ElementKind::EventRelationships, &set)
            .unwrap();
        assert_eq!(
            store
                .get_records(path, ElementKind::EventRelationships, schema)
                .unwrap(),
            set
        );
    }

    #[test]
    fn test_extents_recast_on_read() {
        let store = MemoryProjectStore::new();
        let path = Path::new("a.loop3d");
        store.create_basic(path).unwrap();
        let registry = SchemaRegistry::standard();
        let schema = registry.schema(ElementKind::Extents);

        let text_row = vec![Value::text("7"); 15];
        store
            .set_extents(path, &Extents::from_row(&text_row).unwrap())
            .unwrap();
        let extents = store.get_extents(path, schema).unwrap();
        assert!(extents.to_row().iter().all(|v| !matches!(v, Value::Text(_))));
        assert_eq!(extents.utm_zone(), Some(7));

        let mut bad_row = text_row;
        bad_row[0] = Value::text("east");
        store
            .set_extents(path, &Extents::from_row(&bad_row).unwrap())
            .unwrap();
        assert!(matches!(
            store.get_extents(path, schema),
            Err(Error::Store(_))
        ));
    }

    #[test]
    fn test_remove() {
        let store = MemoryProjectStore::new();
        store.create_basic(Path::new("a")).unwrap();
        assert_eq!(store.len(), 1);
        store.remove(Path::new("a")).unwrap();
        assert!(store.is_empty());
        assert!(store.remove(Path::new("a")).is_err());
    }
}
