//! Supplier entity type - sources of raw materials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{check_id_and_name, Entity};
use crate::core::geo::Location;
use crate::core::identity::{EntityId, EntityKind};
use crate::core::store::Patch;

/// A Supplier entity
///
/// `materials` holds the IDs of the raw materials this supplier provides;
/// relationships are always ID lists, never embedded records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier (`sup-<token>`)
    pub id: EntityId,

    /// Company name
    pub name: String,

    /// Where the supplier operates from
    pub location: Location,

    /// Raw material IDs this supplier provides
    #[serde(default)]
    pub materials: Vec<EntityId>,

    /// Quality certifications held (e.g. "ISO 22000")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,

    /// Preferred transport mode label; routes fall back to "road" when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

/// Fields for creating a supplier; the store assigns the ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub materials: Vec<EntityId>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub transport_mode: Option<String>,
}

/// Partial supplier update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub materials: Option<Vec<EntityId>>,
    pub certifications: Option<Vec<String>>,
    pub transport_mode: Option<String>,
}

impl Supplier {
    /// Build a supplier from a draft, assigning a fresh ID
    pub fn from_draft(draft: SupplierDraft) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Supplier),
            name: draft.name,
            location: draft.location,
            materials: draft.materials,
            certifications: draft.certifications,
            transport_mode: draft.transport_mode,
            created: Utc::now(),
        }
    }
}

impl Entity for Supplier {
    const KIND: EntityKind = EntityKind::Supplier;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, issues: &mut Vec<String>) {
        check_id_and_name(&self.id, &self.name, issues);
        self.location.coordinates.check("location", issues);
        for material in &self.materials {
            if material.is_empty() {
                issues.push("materials must not contain empty IDs".to_string());
            }
        }
    }
}

impl Patch<Supplier> for SupplierPatch {
    fn apply(self, target: &mut Supplier) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(location) = self.location {
            target.location = location;
        }
        if let Some(materials) = self.materials {
            target.materials = materials;
        }
        if let Some(certifications) = self.certifications {
            target.certifications = certifications;
        }
        if let Some(mode) = self.transport_mode {
            target.transport_mode = Some(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> SupplierDraft {
        SupplierDraft {
            name: name.to_string(),
            location: Location::at(45.5, -73.6),
            materials: Vec::new(),
            certifications: Vec::new(),
            transport_mode: None,
        }
    }

    #[test]
    fn test_from_draft_assigns_namespaced_id() {
        let supplier = Supplier::from_draft(draft("Acme Farms"));
        assert!(supplier.id.as_str().starts_with("sup-"));
        assert_eq!(supplier.name, "Acme Farms");
    }

    #[test]
    fn test_out_of_range_coordinates_fail_validation() {
        let mut supplier = Supplier::from_draft(draft("Acme Farms"));
        supplier.location = Location::at(95.0, -73.6);
        assert!(supplier.validate().is_err());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let supplier = Supplier::from_draft(draft("  "));
        assert!(supplier.validate().is_err());
    }

    #[test]
    fn test_patch_keeps_id_and_unset_fields() {
        let mut supplier = Supplier::from_draft(draft("Acme Farms"));
        supplier.certifications = vec!["ISO 22000".to_string()];
        let id = supplier.id.clone();

        SupplierPatch {
            name: Some("Acme Organic Farms".to_string()),
            ..Default::default()
        }
        .apply(&mut supplier);

        assert_eq!(supplier.id, id);
        assert_eq!(supplier.name, "Acme Organic Farms");
        assert_eq!(supplier.certifications, vec!["ISO 22000".to_string()]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut supplier = Supplier::from_draft(draft("Acme Farms"));
        supplier.materials = vec![EntityId::from_raw("mat-1")];
        supplier.transport_mode = Some("rail".to_string());

        let json = serde_json::to_string(&supplier).unwrap();
        let parsed: Supplier = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, supplier.id);
        assert_eq!(parsed.materials, supplier.materials);
        assert_eq!(parsed.transport_mode.as_deref(), Some("rail"));
    }
}
