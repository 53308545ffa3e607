//! RawMaterial entity type - tracked inventory of source materials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{check_id_and_name, Entity};
use crate::core::identity::{EntityId, EntityKind};
use crate::core::store::Patch;

/// Quality measurements for a raw material, all on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuality {
    pub score: f64,
    pub defect_rate: f64,
    pub consistency_score: f64,
}

impl Default for MaterialQuality {
    fn default() -> Self {
        Self {
            score: 100.0,
            defect_rate: 0.0,
            consistency_score: 100.0,
        }
    }
}

impl MaterialQuality {
    fn check(&self, issues: &mut Vec<String>) {
        for (field, value) in [
            ("quality.score", self.score),
            ("quality.defect_rate", self.defect_rate),
            ("quality.consistency_score", self.consistency_score),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                issues.push(format!("{field} must be within [0, 100], got {value}"));
            }
        }
    }
}

/// A RawMaterial entity
///
/// Referenced by `Supplier.materials`; the reverse mapping is derived by
/// the reference resolver, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterial {
    /// Unique identifier (`mat-<token>`)
    pub id: EntityId,

    pub name: String,

    /// Category label (e.g. "grain", "legume")
    pub material_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// On-hand quantity, strictly positive
    pub quantity: f64,

    /// Unit the quantity is measured in (e.g. "kg")
    pub unit: String,

    #[serde(default)]
    pub quality: MaterialQuality,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

/// Fields for creating a material; the store assigns the ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDraft {
    pub name: String,
    pub material_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub quality: MaterialQuality,
}

/// Partial material update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub material_type: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub quality: Option<MaterialQuality>,
}

impl RawMaterial {
    /// Build a material from a draft, assigning a fresh ID
    pub fn from_draft(draft: MaterialDraft) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Material),
            name: draft.name,
            material_type: draft.material_type,
            description: draft.description,
            quantity: draft.quantity,
            unit: draft.unit,
            quality: draft.quality,
            created: Utc::now(),
        }
    }
}

impl Entity for RawMaterial {
    const KIND: EntityKind = EntityKind::Material;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, issues: &mut Vec<String>) {
        check_id_and_name(&self.id, &self.name, issues);
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            issues.push(format!("quantity must be > 0, got {}", self.quantity));
        }
        if self.unit.trim().is_empty() {
            issues.push("unit must not be empty".to_string());
        }
        self.quality.check(issues);
    }
}

impl Patch<RawMaterial> for MaterialPatch {
    fn apply(self, target: &mut RawMaterial) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(material_type) = self.material_type {
            target.material_type = material_type;
        }
        if let Some(description) = self.description {
            target.description = Some(description);
        }
        if let Some(quantity) = self.quantity {
            target.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            target.unit = unit;
        }
        if let Some(quality) = self.quality {
            target.quality = quality;
        }
    }
}
