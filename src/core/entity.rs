//! Entity trait - common interface for all entity types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityKind};

/// Common trait for the four stored entity types
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// The collection this entity belongs to
    const KIND: EntityKind;

    /// The entity's unique ID
    fn id(&self) -> &EntityId;

    /// Display name used in listings and conflict messages
    fn name(&self) -> &str;

    /// Check domain constraints; called before any mutation is applied
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        self.check(&mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Collect constraint violations into `issues`
    fn check(&self, issues: &mut Vec<String>);
}

/// Shared field checks used by entity implementations
pub(crate) fn check_id_and_name(id: &EntityId, name: &str, issues: &mut Vec<String>) {
    if id.is_empty() {
        issues.push("id must not be empty".to_string());
    }
    if name.trim().is_empty() {
        issues.push("name must not be empty".to_string());
    }
}
