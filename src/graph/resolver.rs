//! ReferenceResolver - bidirectional indices over entity relationships
//!
//! Indices are hash maps from ID to an ordered list of related IDs,
//! maintained incrementally as entities are indexed and unindexed rather
//! than rebuilt from scratch. The raw foreign keys live on the entities;
//! this is purely derived state.

use std::collections::HashMap;

use crate::entities::{Route, Supplier, Warehouse};
use crate::core::identity::EntityId;

type IdIndex = HashMap<EntityId, Vec<EntityId>>;

/// Derived relationship indices for the four collections
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    supplier_materials: IdIndex,
    material_suppliers: IdIndex,
    supplier_warehouses: IdIndex,
    material_warehouses: IdIndex,
    supplier_routes: IdIndex,
    warehouse_routes: IdIndex,
    pair_routes: HashMap<(EntityId, EntityId), EntityId>,
}

/// Append `value` to the ordered set at `key` if not already present
fn link(index: &mut IdIndex, key: &EntityId, value: &EntityId) {
    let entry = index.entry(key.clone()).or_default();
    if !entry.contains(value) {
        entry.push(value.clone());
    }
}

/// Remove `value` from the set at `key`, dropping empty entries
fn unlink(index: &mut IdIndex, key: &EntityId, value: &EntityId) {
    if let Some(entry) = index.get_mut(key) {
        entry.retain(|v| v != value);
        if entry.is_empty() {
            index.remove(key);
        }
    }
}

fn lookup<'a>(index: &'a IdIndex, key: &EntityId) -> &'a [EntityId] {
    index.get(key).map(Vec::as_slice).unwrap_or_default()
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    // --- incremental maintenance ---

    pub fn index_supplier(&mut self, supplier: &Supplier) {
        for material in &supplier.materials {
            link(&mut self.supplier_materials, &supplier.id, material);
            link(&mut self.material_suppliers, material, &supplier.id);
        }
    }

    pub fn unindex_supplier(&mut self, supplier: &Supplier) {
        for material in &supplier.materials {
            unlink(&mut self.supplier_materials, &supplier.id, material);
            unlink(&mut self.material_suppliers, material, &supplier.id);
        }
    }

    pub fn reindex_supplier(&mut self, before: &Supplier, after: &Supplier) {
        self.unindex_supplier(before);
        self.index_supplier(after);
    }

    pub fn index_warehouse(&mut self, warehouse: &Warehouse) {
        for supplier in &warehouse.suppliers {
            link(&mut self.supplier_warehouses, supplier, &warehouse.id);
        }
        for material in &warehouse.materials {
            link(&mut self.material_warehouses, material, &warehouse.id);
        }
    }

    pub fn unindex_warehouse(&mut self, warehouse: &Warehouse) {
        for supplier in &warehouse.suppliers {
            unlink(&mut self.supplier_warehouses, supplier, &warehouse.id);
        }
        for material in &warehouse.materials {
            unlink(&mut self.material_warehouses, material, &warehouse.id);
        }
    }

    pub fn reindex_warehouse(&mut self, before: &Warehouse, after: &Warehouse) {
        self.unindex_warehouse(before);
        self.index_warehouse(after);
    }

    /// Index a route; rejects a second route for the same pair
    pub fn index_route(&mut self, route: &Route) -> Result<(), EntityId> {
        let pair = (route.supplier_id.clone(), route.warehouse_id.clone());
        if let Some(existing) = self.pair_routes.get(&pair) {
            if existing != &route.id {
                return Err(existing.clone());
            }
        }
        self.pair_routes.insert(pair, route.id.clone());
        link(&mut self.supplier_routes, &route.supplier_id, &route.id);
        link(&mut self.warehouse_routes, &route.warehouse_id, &route.id);
        Ok(())
    }

    pub fn unindex_route(&mut self, route: &Route) {
        self.pair_routes
            .remove(&(route.supplier_id.clone(), route.warehouse_id.clone()));
        unlink(&mut self.supplier_routes, &route.supplier_id, &route.id);
        unlink(&mut self.warehouse_routes, &route.warehouse_id, &route.id);
    }

    // --- lookups, O(1) amortized ---

    /// Materials listed by a supplier
    pub fn materials_of(&self, supplier: &EntityId) -> &[EntityId] {
        lookup(&self.supplier_materials, supplier)
    }

    /// Suppliers listing a material
    pub fn suppliers_of(&self, material: &EntityId) -> &[EntityId] {
        lookup(&self.material_suppliers, material)
    }

    /// Warehouses whose membership includes a supplier
    pub fn warehouses_of_supplier(&self, supplier: &EntityId) -> &[EntityId] {
        lookup(&self.supplier_warehouses, supplier)
    }

    /// Warehouses whose membership includes a material
    pub fn warehouses_of_material(&self, material: &EntityId) -> &[EntityId] {
        lookup(&self.material_warehouses, material)
    }

    /// The route for a (supplier, warehouse) pair, if one exists
    pub fn route_for(&self, supplier: &EntityId, warehouse: &EntityId) -> Option<&EntityId> {
        self.pair_routes
            .get(&(supplier.clone(), warehouse.clone()))
    }

    pub fn routes_of_supplier(&self, supplier: &EntityId) -> &[EntityId] {
        lookup(&self.supplier_routes, supplier)
    }

    pub fn routes_of_warehouse(&self, warehouse: &EntityId) -> &[EntityId] {
        lookup(&self.warehouse_routes, warehouse)
    }

    // --- delete guards ---

    /// Everything still referencing a supplier (warehouse lists and routes)
    pub fn supplier_referents(&self, supplier: &EntityId) -> Vec<String> {
        self.warehouses_of_supplier(supplier)
            .iter()
            .chain(self.routes_of_supplier(supplier))
            .map(|id| id.to_string())
            .collect()
    }

    /// Everything still referencing a material (supplier and warehouse lists)
    pub fn material_referents(&self, material: &EntityId) -> Vec<String> {
        self.suppliers_of(material)
            .iter()
            .chain(self.warehouses_of_material(material))
            .map(|id| id.to_string())
            .collect()
    }

    /// Everything still referencing a warehouse (routes)
    pub fn warehouse_referents(&self, warehouse: &EntityId) -> Vec<String> {
        self.routes_of_warehouse(warehouse)
            .iter()
            .map(|id| id.to_string())
            .collect()
    }
}
