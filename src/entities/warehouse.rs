//! Warehouse entity type - aggregation points for suppliers and materials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{check_id_and_name, Entity};
use crate::core::geo::Location;
use crate::core::identity::{EntityId, EntityKind};
use crate::core::store::Patch;

/// A Warehouse entity
///
/// `suppliers` and `materials` record known membership as ID lists. The
/// designated aggregation sink is kept a superset of all known IDs by the
/// reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    /// Unique identifier (`wh-<token>`)
    pub id: EntityId,

    pub name: String,

    pub location: Location,

    /// Known supplier IDs
    #[serde(default)]
    pub suppliers: Vec<EntityId>,

    /// Known material IDs
    #[serde(default)]
    pub materials: Vec<EntityId>,

    /// Storage capacity, when tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,

    /// Unit the capacity is measured in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_unit: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

/// Fields for creating a warehouse; the store assigns the ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseDraft {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub suppliers: Vec<EntityId>,
    #[serde(default)]
    pub materials: Vec<EntityId>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub capacity_unit: Option<String>,
}

/// Partial warehouse update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarehousePatch {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub suppliers: Option<Vec<EntityId>>,
    pub materials: Option<Vec<EntityId>>,
    pub capacity: Option<f64>,
    pub capacity_unit: Option<String>,
}

impl Warehouse {
    /// Build a warehouse from a draft, assigning a fresh ID
    pub fn from_draft(draft: WarehouseDraft) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Warehouse),
            name: draft.name,
            location: draft.location,
            suppliers: draft.suppliers,
            materials: draft.materials,
            capacity: draft.capacity,
            capacity_unit: draft.capacity_unit,
            created: Utc::now(),
        }
    }
}

impl Entity for Warehouse {
    const KIND: EntityKind = EntityKind::Warehouse;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, issues: &mut Vec<String>) {
        check_id_and_name(&self.id, &self.name, issues);
        self.location.coordinates.check("location", issues);
        if let Some(capacity) = self.capacity {
            if !capacity.is_finite() || capacity <= 0.0 {
                issues.push(format!("capacity must be > 0, got {capacity}"));
            }
        }
    }
}

impl Patch<Warehouse> for WarehousePatch {
    fn apply(self, target: &mut Warehouse) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(location) = self.location {
            target.location = location;
        }
        if let Some(suppliers) = self.suppliers {
            target.suppliers = suppliers;
        }
        if let Some(materials) = self.materials {
            target.materials = materials;
        }
        if let Some(capacity) = self.capacity {
            target.capacity = Some(capacity);
        }
        if let Some(capacity_unit) = self.capacity_unit {
            target.capacity_unit = Some(capacity_unit);
        }
    }
}
