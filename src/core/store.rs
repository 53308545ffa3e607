//! EntityStore - generic keyed repository for one entity type
//!
//! Entities live in an ordered `Vec` (insertion order is the listing order
//! and the on-disk order) with a hash index for O(1) lookup by ID.
//! Referential guards across stores belong to the engine, not here.

use std::collections::HashMap;

use crate::core::entity::Entity;
use crate::core::error::{ConflictError, Error, Result};
use crate::core::identity::EntityId;

/// A partial update applied to an entity; the ID is never touched
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

/// Ordered, keyed collection of one entity type
#[derive(Debug)]
pub struct EntityStore<T: Entity> {
    items: Vec<T>,
    index: HashMap<EntityId, usize>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a fully-formed entity, validating first
    ///
    /// Used both by `create` paths (fresh ID already assigned) and by
    /// hydration (IDs from the data file). Duplicate IDs are a Conflict.
    pub fn insert(&mut self, entity: T) -> Result<&T> {
        entity.validate()?;
        if self.index.contains_key(entity.id()) {
            return Err(ConflictError::DuplicateId {
                kind: T::KIND,
                id: entity.id().clone(),
            }
            .into());
        }
        self.index.insert(entity.id().clone(), self.items.len());
        self.items.push(entity);
        Ok(self.items.last().unwrap())
    }

    pub fn get(&self, id: &EntityId) -> Result<&T> {
        self.index
            .get(id)
            .map(|&i| &self.items[i])
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    /// Full ordered sequence of entities (snapshot, not live)
    pub fn list(&self) -> Vec<T> {
        self.items.clone()
    }

    /// Ordered IDs of all entities
    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|e| e.id().clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// First entity in insertion order, if any
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Merge a partial update into the stored entity
    ///
    /// The patch is applied to a clone and validated before the store is
    /// touched, so a ValidationError leaves the entity unchanged.
    pub fn update<P: Patch<T>>(&mut self, id: &EntityId, patch: P) -> Result<T> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| Error::not_found(T::KIND, id))?;
        let mut updated = self.items[slot].clone();
        patch.apply(&mut updated);
        debug_assert_eq!(updated.id(), id);
        updated.validate()?;
        self.items[slot] = updated;
        Ok(self.items[slot].clone())
    }

    /// Remove and return an entity, preserving the order of the rest
    pub fn remove(&mut self, id: &EntityId) -> Result<T> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| Error::not_found(T::KIND, id))?;
        let removed = self.items.remove(slot);
        self.index.remove(id);
        for (i, item) in self.items.iter().enumerate().skip(slot) {
            self.index.insert(item.id().clone(), i);
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::check_id_and_name;
    use crate::core::identity::EntityKind;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Widget {
        id: EntityId,
        name: String,
        weight: f64,
    }

    impl Entity for Widget {
        const KIND: EntityKind = EntityKind::Material;

        fn id(&self) -> &EntityId {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn check(&self, issues: &mut Vec<String>) {
            check_id_and_name(&self.id, &self.name, issues);
            if self.weight <= 0.0 {
                issues.push("weight must be > 0".to_string());
            }
        }
    }

    struct WidgetPatch {
        name: Option<String>,
        weight: Option<f64>,
    }

    impl Patch<Widget> for WidgetPatch {
        fn apply(self, target: &mut Widget) {
            if let Some(name) = self.name {
                target.name = name;
            }
            if let Some(weight) = self.weight {
                target.weight = weight;
            }
        }
    }

    fn widget(id: &str, name: &str) -> Widget {
        Widget {
            id: EntityId::from_raw(id),
            name: name.to_string(),
            weight: 1.0,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        let got = store.get(&EntityId::from_raw("mat-1")).unwrap();
        assert_eq!(got.name, "Bolt");
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store: EntityStore<Widget> = EntityStore::new();
        let err = store.get(&EntityId::from_raw("mat-x")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_duplicate_insert_is_conflict() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        let err = store.insert(widget("mat-1", "Nut")).unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict(ConflictError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_invalid_insert_leaves_store_empty() {
        let mut store = EntityStore::new();
        let mut bad = widget("mat-1", "Bolt");
        bad.weight = -2.0;
        assert!(matches!(
            store.insert(bad).unwrap_err(),
            Error::Validation(_)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        store.insert(widget("mat-2", "Nut")).unwrap();
        store.insert(widget("mat-3", "Washer")).unwrap();
        let names: Vec<_> = store.list().into_iter().map(|w| w.name).collect();
        assert_eq!(names, vec!["Bolt", "Nut", "Washer"]);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        let snapshot = store.list();
        store.insert(widget("mat-2", "Nut")).unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        let updated = store
            .update(
                &EntityId::from_raw("mat-1"),
                WidgetPatch {
                    name: None,
                    weight: Some(2.5),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Bolt");
        assert_eq!(updated.weight, 2.5);
    }

    #[test]
    fn test_invalid_update_leaves_entity_unchanged() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        let err = store
            .update(
                &EntityId::from_raw("mat-1"),
                WidgetPatch {
                    name: None,
                    weight: Some(-1.0),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.get(&EntityId::from_raw("mat-1")).unwrap().weight, 1.0);
    }

    #[test]
    fn test_remove_reindexes_remaining() {
        let mut store = EntityStore::new();
        store.insert(widget("mat-1", "Bolt")).unwrap();
        store.insert(widget("mat-2", "Nut")).unwrap();
        store.insert(widget("mat-3", "Washer")).unwrap();
        store.remove(&EntityId::from_raw("mat-2")).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&EntityId::from_raw("mat-3")).unwrap().name, "Washer");
        let ids: Vec<_> = store.ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["mat-1", "mat-3"]);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut store: EntityStore<Widget> = EntityStore::new();
        assert!(matches!(
            store.remove(&EntityId::from_raw("mat-x")).unwrap_err(),
            Error::NotFound { .. }
        ));
    }
}
