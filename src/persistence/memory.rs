//! In-memory persistence for tests
//!
//! Collections start seeded and empty, mirroring a freshly initialized data
//! directory. Clones share the same underlying state so a test can keep a
//! handle while the engine owns another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::core::identity::EntityKind;
use crate::persistence::{Persistence, PersistenceError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<&'static str, Vec<Value>>>>,
}

impl MemoryStore {
    /// A store with all four collections present and empty
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut guard = store.collections.lock().unwrap();
            for kind in EntityKind::all() {
                guard.insert(kind.collection(), Vec::new());
            }
        }
        store
    }

    /// A store with no backing collections at all; loads fail with Missing
    pub fn unseeded() -> Self {
        Self::default()
    }

    /// Snapshot of a collection as currently persisted
    pub fn snapshot(&self, kind: EntityKind) -> Vec<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(kind.collection())
            .cloned()
            .unwrap_or_default()
    }
}

impl Persistence for MemoryStore {
    fn load(&self, kind: EntityKind) -> Result<Vec<Value>, PersistenceError> {
        self.collections
            .lock()
            .unwrap()
            .get(kind.collection())
            .cloned()
            .ok_or_else(|| PersistenceError::Missing {
                collection: kind.collection().to_string(),
                path: "<memory>".to_string(),
            })
    }

    fn save(&self, kind: EntityKind, records: &[Value]) -> Result<(), PersistenceError> {
        self.collections
            .lock()
            .unwrap()
            .insert(kind.collection(), records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unseeded_load_is_missing() {
        let store = MemoryStore::unseeded();
        assert!(matches!(
            store.load(EntityKind::Supplier).unwrap_err(),
            PersistenceError::Missing { .. }
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::seeded();
        let handle = store.clone();
        store
            .save(EntityKind::Material, &[json!({"id": "mat-1"})])
            .unwrap();
        assert_eq!(handle.snapshot(EntityKind::Material).len(), 1);
    }
}
