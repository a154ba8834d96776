//! `SQLite`-backed project files.
//!
//! A project file is a single `SQLite` database holding a group hierarchy,
//! JSON attributes attached to group paths, and packed record datasets.
//! Every operation opens its own connection and drops it before returning.

use super::codec::{
    check_layout, decode_group, decode_records, encode_group, encode_records, extents_from_groups,
};
use super::traits::{FormatVersion, ProjectStore, require_rows};
use crate::models::{ElementKind, Extents, RecordSet, Schema};
use crate::{Error, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;

/// Attribute holding the format version on the root group.
pub const VERSION_ATTRIBUTE: &str = "loopProjectVersion";

/// `SQLite` application id stamped on project files ("LOOP").
const APPLICATION_ID: i32 = 0x4C4F_4F50;

/// Groups created in every new project file.
const BASIC_GROUPS: [&str; 6] = [
    "",
    "DataCollection",
    "DataCollection/Observations",
    "ExtractedInformation",
    "ExtractedInformation/EventLog",
    "ExtractedInformation/StratigraphicInformation",
];

/// Attribute names of the four extents groups, in storage order.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const EXTENTS_GROUPS: [&str; 4] = ["geodesic", "utm", "depth", "spacing"];

const CREATE_TABLES: &str = "
    CREATE TABLE groups (
        path TEXT PRIMARY KEY
    );
    CREATE TABLE attributes (
        path TEXT NOT NULL,
        name TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (path, name)
    );
    CREATE TABLE datasets (
        path TEXT PRIMARY KEY,
        element TEXT NOT NULL,
        layout TEXT NOT NULL,
        row_count INTEGER NOT NULL,
        data BLOB NOT NULL
    );
";

/// Project store writing `SQLite` database files.
///
/// Each call opens its own connection and waits up to five seconds on a
/// locked database.
#[derive(Debug, Clone)]
pub struct SqliteProjectStore;

impl SqliteProjectStore {
    /// Creates a store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn open(&self, path: &Path) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::Store(format!("cannot open {}: {e}", path.display())))?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(store_err)?;
        Ok(conn)
    }
}

impl Default for SqliteProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

fn store_err(e: rusqlite::Error) -> Error {
    Error::Store(e.to_string())
}

/// Inserts `path` and all of its ancestors into the group table.
fn ensure_groups(conn: &Connection, path: &str) -> Result<()> {
    let mut prefix = String::new();
    conn.execute("INSERT OR IGNORE INTO groups (path) VALUES ('')", [])
        .map_err(store_err)?;
    for part in path.split('/').filter(|p| !p.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(part);
        conn.execute(
            "INSERT OR IGNORE INTO groups (path) VALUES (?1)",
            params![prefix],
        )
        .map_err(store_err)?;
    }
    Ok(())
}

impl ProjectStore for SqliteProjectStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| Error::operation("remove_project_file", e))
    }

    fn create_basic(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        let mut conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::Store(format!("cannot create {}: {e}", path.display())))?;
        conn.pragma_update(None, "application_id", APPLICATION_ID)
            .map_err(store_err)?;

        let version = serde_json::to_string(&FormatVersion::CURRENT)
            .map_err(|e| Error::Store(e.to_string()))?;
        let tx = conn.transaction().map_err(store_err)?;
        tx.execute_batch(CREATE_TABLES).map_err(store_err)?;
        for group in BASIC_GROUPS {
            tx.execute("INSERT INTO groups (path) VALUES (?1)", params![group])
                .map_err(store_err)?;
        }
        tx.execute(
            "INSERT INTO attributes (path, name, value) VALUES ('', ?1, ?2)",
            params![VERSION_ATTRIBUTE, version],
        )
        .map_err(store_err)?;
        tx.commit().map_err(store_err)?;

        tracing::debug!(
            path = %path.display(),
            version = %FormatVersion::CURRENT,
            "Created project file"
        );
        Ok(())
    }

    fn version(&self, path: &Path) -> Result<FormatVersion> {
        let not_project = || Error::NotAProjectFile(path.to_path_buf());
        let conn = self.open(path)?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM attributes WHERE path = '' AND name = ?1",
                params![VERSION_ATTRIBUTE],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| {
                tracing::debug!(path = %path.display(), error = %e, "Version lookup failed");
                not_project()
            })?;
        let raw = raw.ok_or_else(not_project)?;
        serde_json::from_str(&raw).map_err(|_| not_project())
    }

    fn get_records(
        &self,
        path: &Path,
        element: ElementKind,
        schema: &Schema,
    ) -> Result<RecordSet> {
        require_rows(element)?;
        let conn = self.open(path)?;
        let row: Option<(String, Vec<u8>)> = conn
            .query_row(
                "SELECT layout, data FROM datasets WHERE path = ?1",
                params![element.store_path()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(store_err)?;
        let Some((layout, data)) = row else {
            return Err(Error::NotFound {
                element: element.to_string(),
                container: path.to_path_buf(),
            });
        };

        check_layout(element, &layout, schema)?;
        decode_records(&data, schema)
    }

    fn set_records(&self, path: &Path, element: ElementKind, records: &RecordSet) -> Result<()> {
        require_rows(element)?;
        let mut conn = self.open(path)?;
        let data = encode_records(records);
        let row_count = i64::try_from(records.len()).map_err(|e| Error::Store(e.to_string()))?;
        let store_path = element.store_path();
        let parent = store_path.rsplit_once('/').map_or("", |(parent, _)| parent);

        let tx = conn.transaction().map_err(store_err)?;
        ensure_groups(&tx, parent)?;
        tx.execute(
            "INSERT INTO datasets (path, element, layout, row_count, data)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(path) DO UPDATE SET
                element = excluded.element,
                layout = excluded.layout,
                row_count = excluded.row_count,
                data = excluded.data",
            params![
                store_path,
                element.as_str(),
                records.schema().descriptor(),
                row_count,
                data
            ],
        )
        .map_err(store_err)?;
        tx.commit().map_err(store_err)?;
        Ok(())
    }

    fn get_extents(&self, path: &Path, schema: &Schema) -> Result<Extents> {
        let conn = self.open(path)?;
        let mut stmt = conn
            .prepare("SELECT value FROM attributes WHERE path = ?1 AND name = ?2")
            .map_err(store_err)?;

        let mut groups = Vec::with_capacity(EXTENTS_GROUPS.len());
        for name in EXTENTS_GROUPS {
            let raw: Option<String> = stmt
                .query_row(params![ElementKind::Extents.store_path(), name], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(store_err)?;
            let raw = raw.ok_or_else(|| Error::NotFound {
                element: ElementKind::Extents.to_string(),
                container: path.to_path_buf(),
            })?;
            groups.push(decode_group(&raw)?);
        }

        let [geodesic, utm, depth, spacing]: [Vec<_>; 4] = groups
            .try_into()
            .map_err(|_| Error::Store("extents groups incomplete".to_string()))?;
        extents_from_groups(geodesic, utm, depth, spacing, schema)
    }

    fn set_extents(&self, path: &Path, extents: &Extents) -> Result<()> {
        let mut conn = self.open(path)?;
        let group_path = ElementKind::Extents.store_path();
        let values = [
            extents.geodesic(),
            extents.utm(),
            extents.depth(),
            extents.spacing(),
        ];

        let tx = conn.transaction().map_err(store_err)?;
        ensure_groups(&tx, group_path)?;
        for (name, group) in EXTENTS_GROUPS.iter().zip(values) {
            tx.execute(
                "INSERT INTO attributes (path, name, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(path, name) DO UPDATE SET value = excluded.value",
                params![group_path, name, encode_group(group)?],
            )
            .map_err(store_err)?;
        }
        tx.commit().map_err(store_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, Value};
    use crate::registry::SchemaRegistry;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("project.loop3d");
        SqliteProjectStore::new().create_basic(&path).unwrap();
        path
    }

    fn contacts(registry: &SchemaRegistry) -> RecordSet {
        RecordSet::new(
            registry.schema(ElementKind::Contacts).clone(),
            vec![vec![
                Field::UInt32(1),
                Field::Float64(10.0),
                Field::Float64(20.0),
                Field::Float64(30.0),
                Field::Float64(0.5),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn test_create_basic_writes_version() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        let store = SqliteProjectStore::new();
        assert!(store.exists(&path));
        assert_eq!(store.version(&path).unwrap(), FormatVersion::CURRENT);
    }

    #[test]
    fn test_create_basic_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        assert!(matches!(
            SqliteProjectStore::new().create_basic(&path),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_foreign_file_is_not_a_project() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE notes (body TEXT);").unwrap();
        drop(conn);

        assert!(matches!(
            SqliteProjectStore::new().version(&path),
            Err(Error::NotAProjectFile(_))
        ));
    }

    #[test]
    fn test_records_replace_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        let store = SqliteProjectStore::new();
        let registry = SchemaRegistry::standard();
        let schema = registry.schema(ElementKind::Contacts);

        store
            .set_records(&path, ElementKind::Contacts, &contacts(&registry))
            .unwrap();
        store
            .set_records(&path, ElementKind::Contacts, &contacts(&registry))
            .unwrap();
        let back = store
            .get_records(&path, ElementKind::Contacts, schema)
            .unwrap();
        assert_eq!(back, contacts(&registry));
    }

    #[test]
    fn test_missing_element_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        let registry = SchemaRegistry::standard();
        let result = SqliteProjectStore::new().get_records(
            &path,
            ElementKind::FaultLog,
            registry.schema(ElementKind::FaultLog),
        );
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert!(matches!(
            SqliteProjectStore::new()
                .get_extents(&path, registry.schema(ElementKind::Extents)),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_layout_mismatch_is_store_error() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        let store = SqliteProjectStore::new();
        let registry = SchemaRegistry::standard();
        store
            .set_records(&path, ElementKind::Contacts, &contacts(&registry))
            .unwrap();
        let result = store.get_records(
            &path,
            ElementKind::Contacts,
            registry.schema(ElementKind::FaultLog),
        );
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_extents_roundtrip_recasts_integers() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        let store = SqliteProjectStore::new();
        let schema = SchemaRegistry::standard()
            .schema(ElementKind::Extents)
            .clone();
        let row: Vec<Value> = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| match column.name.as_str() {
                "utmZone" => Value::Int(55),
                "isUtmZoneNorth" => Value::Int(0),
                _ => Value::Float(f64::from(u8::try_from(i).unwrap())),
            })
            .collect();
        let extents = Extents::from_row(&row).unwrap();

        store.set_extents(&path, &extents).unwrap();
        assert_eq!(store.get_extents(&path, &schema).unwrap(), extents);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir);
        let store = SqliteProjectStore::new();
        store.remove(&path).unwrap();
        assert!(!store.exists(&path));
    }
}
