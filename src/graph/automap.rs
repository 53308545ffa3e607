//! AutoMapper - warehouse membership reconciliation
//!
//! One warehouse acts as the aggregation sink: its supplier and material
//! membership lists are kept a superset of every known ID. The sink is an
//! explicit configuration value; the default is the first warehouse in
//! insertion order, which matches the historical single-warehouse behavior
//! and is ambiguous once several warehouses exist (see DESIGN.md).
//!
//! The pass is idempotent: with no intervening change a second run computes
//! empty difference sets and performs no mutation.

use crate::core::error::{Error, Result};
use crate::core::identity::{EntityId, EntityKind};
use crate::core::store::EntityStore;
use crate::entities::Warehouse;

/// Which warehouse receives reconciled membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AggregationTarget {
    /// First warehouse in insertion order (historical default)
    #[default]
    First,
    /// An explicitly designated warehouse
    Warehouse(EntityId),
}

/// The membership additions one reconciliation pass wants to make
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    pub warehouse_id: EntityId,
    pub add_suppliers: Vec<EntityId>,
    pub add_materials: Vec<EntityId>,
}

/// What a reconciliation pass did
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ReconcileOutcome {
    /// The sink that was reconciled, when one exists
    pub warehouse_id: Option<EntityId>,
    pub added_suppliers: Vec<EntityId>,
    pub added_materials: Vec<EntityId>,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        !self.added_suppliers.is_empty() || !self.added_materials.is_empty()
    }
}

/// Reconciliation policy holder
#[derive(Debug, Clone, Default)]
pub struct AutoMapper {
    target: AggregationTarget,
}

impl AutoMapper {
    pub fn new(target: AggregationTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &AggregationTarget {
        &self.target
    }

    pub fn set_target(&mut self, target: AggregationTarget) {
        self.target = target;
    }

    /// Resolve the sink warehouse; `None` when no warehouse exists and the
    /// target is `First`, NotFound when a designated sink ID is absent
    pub fn resolve_sink<'a>(
        &self,
        warehouses: &'a EntityStore<Warehouse>,
    ) -> Result<Option<&'a Warehouse>> {
        match &self.target {
            AggregationTarget::First => Ok(warehouses.first()),
            AggregationTarget::Warehouse(id) => {
                if warehouses.contains(id) {
                    Ok(Some(warehouses.get(id)?))
                } else {
                    Err(Error::not_found(EntityKind::Warehouse, id))
                }
            }
        }
    }

    /// Compute the additions needed to make the sink a superset of all
    /// known IDs; `None` when nothing is missing or no sink exists
    pub fn plan(
        &self,
        warehouses: &EntityStore<Warehouse>,
        all_suppliers: &[EntityId],
        all_materials: &[EntityId],
    ) -> Result<Option<ReconcilePlan>> {
        let Some(sink) = self.resolve_sink(warehouses)? else {
            return Ok(None);
        };

        let add_suppliers = missing_ids(all_suppliers, &sink.suppliers);
        let add_materials = missing_ids(all_materials, &sink.materials);

        if add_suppliers.is_empty() && add_materials.is_empty() {
            return Ok(None);
        }

        Ok(Some(ReconcilePlan {
            warehouse_id: sink.id.clone(),
            add_suppliers,
            add_materials,
        }))
    }
}

/// IDs in `known` that are absent from `present`, in `known` order
fn missing_ids(known: &[EntityId], present: &[EntityId]) -> Vec<EntityId> {
    known
        .iter()
        .filter(|id| !present.contains(id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::core::geo::Location;
    use crate::entities::warehouse::WarehouseDraft;

    fn store_with(names: &[&str]) -> EntityStore<Warehouse> {
        let mut store = EntityStore::new();
        for name in names {
            store
                .insert(Warehouse::from_draft(WarehouseDraft {
                    name: name.to_string(),
                    location: Location::at(45.4, -73.5),
                    suppliers: Vec::new(),
                    materials: Vec::new(),
                    capacity: None,
                    capacity_unit: None,
                }))
                .unwrap();
        }
        store
    }

    fn ids(raw: &[&str]) -> Vec<EntityId> {
        raw.iter().map(|r| EntityId::from_raw(*r)).collect()
    }

    #[test]
    fn test_no_warehouse_means_no_plan() {
        let mapper = AutoMapper::default();
        let store = store_with(&[]);
        assert!(mapper
            .plan(&store, &ids(&["sup-1"]), &ids(&["mat-1"]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_first_warehouse_is_default_sink() {
        let mapper = AutoMapper::default();
        let store = store_with(&["Central", "East"]);
        let plan = mapper
            .plan(&store, &ids(&["sup-1"]), &ids(&[]))
            .unwrap()
            .unwrap();
        assert_eq!(&plan.warehouse_id, store.first().unwrap().id());
        assert_eq!(plan.add_suppliers, ids(&["sup-1"]));
    }

    #[test]
    fn test_designated_sink_must_exist() {
        let mapper = AutoMapper::new(AggregationTarget::Warehouse(EntityId::from_raw("wh-gone")));
        let store = store_with(&["Central"]);
        assert!(matches!(
            mapper.plan(&store, &ids(&["sup-1"]), &ids(&[])).unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn test_plan_preserves_known_order() {
        let mapper = AutoMapper::default();
        let store = store_with(&["Central"]);
        let plan = mapper
            .plan(&store, &ids(&["sup-2", "sup-1"]), &ids(&["mat-3", "mat-1"]))
            .unwrap()
            .unwrap();
        assert_eq!(plan.add_suppliers, ids(&["sup-2", "sup-1"]));
        assert_eq!(plan.add_materials, ids(&["mat-3", "mat-1"]));
    }

    #[test]
    fn test_plan_is_a_difference_set() {
        let mapper = AutoMapper::default();
        let mut store = store_with(&[]);
        let mut wh = Warehouse::from_draft(WarehouseDraft {
            name: "Central".to_string(),
            location: Location::at(45.4, -73.5),
            suppliers: ids(&["sup-1"]),
            materials: ids(&["mat-1"]),
            capacity: None,
            capacity_unit: None,
        });
        wh.suppliers = ids(&["sup-1"]);
        store.insert(wh).unwrap();

        let plan = mapper
            .plan(&store, &ids(&["sup-1", "sup-2"]), &ids(&["mat-1"]))
            .unwrap()
            .unwrap();
        assert_eq!(plan.add_suppliers, ids(&["sup-2"]));
        assert!(plan.add_materials.is_empty());
    }

    #[test]
    fn test_superset_sink_yields_no_plan() {
        // Idempotence at the planning level: nothing missing, no plan
        let mapper = AutoMapper::default();
        let mut store = store_with(&[]);
        store
            .insert(Warehouse::from_draft(WarehouseDraft {
                name: "Central".to_string(),
                location: Location::at(45.4, -73.5),
                suppliers: ids(&["sup-1"]),
                materials: ids(&["mat-1", "mat-2"]),
                capacity: None,
                capacity_unit: None,
            }))
            .unwrap();
        assert!(mapper
            .plan(&store, &ids(&["sup-1"]), &ids(&["mat-1", "mat-2"]))
            .unwrap()
            .is_none());
    }
}
