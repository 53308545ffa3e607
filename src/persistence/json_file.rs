//! Flat-file JSON persistence
//!
//! One pretty-printed JSON array per collection under a data directory:
//! `suppliers.json`, `materials.json`, `warehouses.json`, `routes.json`.
//! Saves write to a temp file and rename it over the target so a crashed
//! write never leaves a truncated collection behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use crate::core::identity::EntityKind;
use crate::persistence::{Persistence, PersistenceError};

/// Subdirectory that holds timestamped backups
const BACKUP_DIR: &str = "backups";

/// JSON-file-per-collection store rooted at a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the file backing a collection
    pub fn collection_path(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.collection()))
    }

    /// Create the data directory and seed any missing collection with an
    /// empty array; existing files are left untouched
    pub fn init(&self) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| PersistenceError::Io {
            action: "create",
            path: self.data_dir.display().to_string(),
            source,
        })?;
        for kind in EntityKind::all() {
            let path = self.collection_path(kind);
            if !path.exists() {
                write_atomic(&path, b"[]\n")?;
            }
        }
        Ok(())
    }

    /// Copy every collection into `backups/<timestamp>/`; returns the
    /// backup directory
    pub fn backup(&self) -> Result<PathBuf, PersistenceError> {
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let dir = self.data_dir.join(BACKUP_DIR).join(stamp);
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
            action: "create",
            path: dir.display().to_string(),
            source,
        })?;
        for kind in EntityKind::all() {
            let records = self.load(kind)?;
            let target = JsonFileStore::new(&dir);
            target.save(kind, &records)?;
        }
        Ok(dir)
    }

    /// Load every collection from a backup directory over the live files
    pub fn restore(&self, backup_dir: &Path) -> Result<(), PersistenceError> {
        let source = JsonFileStore::new(backup_dir);
        for kind in EntityKind::all() {
            let records = source.load(kind)?;
            self.save(kind, &records)?;
        }
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn load(&self, kind: EntityKind) -> Result<Vec<Value>, PersistenceError> {
        let path = self.collection_path(kind);
        if !path.exists() {
            return Err(PersistenceError::Missing {
                collection: kind.collection().to_string(),
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|source| PersistenceError::Io {
            action: "read",
            path: path.display().to_string(),
            source,
        })?;
        let parsed: Value =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Malformed {
                path: path.display().to_string(),
                source,
            })?;
        match parsed {
            Value::Array(records) => Ok(records),
            _ => Err(PersistenceError::NotAnArray {
                collection: kind.collection().to_string(),
            }),
        }
    }

    fn save(&self, kind: EntityKind, records: &[Value]) -> Result<(), PersistenceError> {
        let path = self.collection_path(kind);
        let mut content =
            serde_json::to_string_pretty(records).map_err(|source| PersistenceError::Encode {
                collection: kind.collection().to_string(),
                source,
            })?;
        content.push('\n');
        write_atomic(&path, content.as_bytes())
    }
}

/// Write to `<path>.tmp` then rename over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|source| PersistenceError::Io {
        action: "write",
        path: tmp.display().to_string(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| PersistenceError::Io {
        action: "rename",
        path: path.display().to_string(),
        source,
    })
}
