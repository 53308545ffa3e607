//! SupplyGraph - the engine facade
//!
//! Owns the four entity stores, the derived indices, the notifier, and the
//! persistence handle. Every boundary mutation follows the same sequence:
//! validate, mutate the store, update the indices, save the collection,
//! broadcast, then dispatch reactions (reconciliation, route refresh) on
//! the committed event. Reaction-originated mutations are committed the
//! same way, so subscribers observe every write in commit order.
//!
//! The engine is single-threaded cooperative: mutations take `&mut self`
//! and run to completion; the only I/O happens at the persistence boundary.

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{
    ConflictError, Error, Result, SubscriberFailure, ValidationError,
};
use crate::core::identity::{EntityId, EntityKind};
use crate::core::store::{EntityStore, Patch};
use crate::core::Entity;
use crate::entities::material::{MaterialDraft, MaterialPatch};
use crate::entities::route::RoutePatch;
use crate::entities::supplier::{SupplierDraft, SupplierPatch};
use crate::entities::warehouse::{WarehouseDraft, WarehousePatch};
use crate::entities::{RawMaterial, Route, Supplier, Warehouse};
use crate::graph::automap::{AggregationTarget, AutoMapper, ReconcileOutcome};
use crate::graph::classify::{classify, refresh};
use crate::graph::notify::{
    failures_into_result, ChangeEvent, ChangeNotifier, Interest, Operation, Subscriber,
};
use crate::graph::resolver::ReferenceResolver;
use crate::persistence::{Persistence, PersistenceError};

/// A dangling reference found by an integrity sweep
#[derive(Debug, Clone, Serialize)]
pub struct DanglingReference {
    pub source: EntityId,
    pub field: String,
    pub missing: EntityId,
}

/// Read-only referential integrity report
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub dangling: Vec<DanglingReference>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
    }
}

/// The supply-chain entity graph engine
#[derive(Debug)]
pub struct SupplyGraph<P: Persistence> {
    persistence: P,
    suppliers: EntityStore<Supplier>,
    materials: EntityStore<RawMaterial>,
    warehouses: EntityStore<Warehouse>,
    routes: EntityStore<Route>,
    resolver: ReferenceResolver,
    notifier: ChangeNotifier,
    mapper: AutoMapper,
}

impl<P: Persistence> SupplyGraph<P> {
    /// Hydrate the graph from the persistence collaborator
    ///
    /// Every record is deserialized against its schema and validated;
    /// malformed records reject the load rather than drifting silently.
    /// Dangling references are tolerated and reported.
    pub fn open(persistence: P) -> Result<Self> {
        let mut graph = Self {
            persistence,
            suppliers: EntityStore::new(),
            materials: EntityStore::new(),
            warehouses: EntityStore::new(),
            routes: EntityStore::new(),
            resolver: ReferenceResolver::new(),
            notifier: ChangeNotifier::new(),
            mapper: AutoMapper::default(),
        };

        for material in hydrate::<RawMaterial>(&graph.persistence)? {
            graph.materials.insert(material)?;
        }
        for supplier in hydrate::<Supplier>(&graph.persistence)? {
            let supplier = graph.suppliers.insert(supplier)?.clone();
            graph.resolver.index_supplier(&supplier);
        }
        for warehouse in hydrate::<Warehouse>(&graph.persistence)? {
            let warehouse = graph.warehouses.insert(warehouse)?.clone();
            graph.resolver.index_warehouse(&warehouse);
        }
        for route in hydrate::<Route>(&graph.persistence)? {
            let route = graph.routes.insert(route)?.clone();
            graph.resolver.index_route(&route).map_err(|existing| {
                ConflictError::DuplicateRoute {
                    supplier_id: route.supplier_id.clone(),
                    warehouse_id: route.warehouse_id.clone(),
                    route_id: existing,
                }
            })?;
        }

        // Dangling references do not block the load; `integrity_report`
        // surfaces them and repair happens through normal mutations
        for dangling in &graph.integrity_report().dangling {
            tracing::warn!(
                source = %dangling.source,
                field = %dangling.field,
                missing = %dangling.missing,
                "dangling reference"
            );
        }

        tracing::debug!(
            suppliers = graph.suppliers.len(),
            materials = graph.materials.len(),
            warehouses = graph.warehouses.len(),
            routes = graph.routes.len(),
            "graph hydrated"
        );
        Ok(graph)
    }

    // --- configuration and observation ---

    pub fn subscribe(&mut self, interest: Interest, subscriber: Box<dyn Subscriber>) {
        self.notifier.subscribe(interest, subscriber);
    }

    pub fn aggregation_target(&self) -> &AggregationTarget {
        self.mapper.target()
    }

    pub fn set_aggregation_target(&mut self, target: AggregationTarget) {
        self.mapper.set_target(target);
    }

    // --- read access ---

    pub fn suppliers(&self) -> &EntityStore<Supplier> {
        &self.suppliers
    }

    pub fn materials(&self) -> &EntityStore<RawMaterial> {
        &self.materials
    }

    pub fn warehouses(&self) -> &EntityStore<Warehouse> {
        &self.warehouses
    }

    pub fn routes(&self) -> &EntityStore<Route> {
        &self.routes
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    // --- supplier operations ---

    pub fn add_supplier(&mut self, draft: SupplierDraft) -> Result<Supplier> {
        let supplier = Supplier::from_draft(draft);
        self.check_materials_exist(&supplier.materials)?;
        self.suppliers.insert(supplier.clone())?;
        self.resolver.index_supplier(&supplier);
        self.save_collection(EntityKind::Supplier)?;

        let mut failures = Vec::new();
        self.commit(
            ChangeEvent::new(EntityKind::Supplier, Operation::Create, &supplier.id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        finish(supplier, failures)
    }

    pub fn update_supplier(&mut self, id: &EntityId, patch: SupplierPatch) -> Result<Supplier> {
        let before = self.suppliers.get(id)?.clone();
        let mut preview = before.clone();
        patch.clone().apply(&mut preview);
        self.check_materials_exist(&preview.materials)?;

        let after = self.suppliers.update(id, patch)?;
        self.resolver.reindex_supplier(&before, &after);
        self.save_collection(EntityKind::Supplier)?;

        let mut failures = Vec::new();
        self.commit(
            ChangeEvent::new(EntityKind::Supplier, Operation::Update, id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        if before.location.coordinates != after.location.coordinates
            || before.transport_mode != after.transport_mode
        {
            self.refresh_routes_of_supplier(id, &mut failures)?;
        }
        finish(after, failures)
    }

    /// Delete a supplier; without `cascade` any remaining reference is a
    /// Conflict, with it the dependent routes are removed and the ID is
    /// pruned from every warehouse membership list first
    pub fn delete_supplier(&mut self, id: &EntityId, cascade: bool) -> Result<()> {
        let before = self.suppliers.get(id)?.clone();
        let referents = self.resolver.supplier_referents(id);
        if !referents.is_empty() && !cascade {
            return Err(ConflictError::StillReferenced {
                kind: EntityKind::Supplier,
                id: id.clone(),
                referents,
            }
            .into());
        }

        let mut failures = Vec::new();
        if cascade {
            for route_id in self.resolver.routes_of_supplier(id).to_vec() {
                self.remove_route(&route_id, &mut failures)?;
            }
            for warehouse_id in self.resolver.warehouses_of_supplier(id).to_vec() {
                let kept: Vec<EntityId> = self
                    .warehouses
                    .get(&warehouse_id)?
                    .suppliers
                    .iter()
                    .filter(|s| *s != id)
                    .cloned()
                    .collect();
                self.apply_warehouse_update(
                    &warehouse_id,
                    WarehousePatch {
                        suppliers: Some(kept),
                        ..Default::default()
                    },
                    &mut failures,
                )?;
            }
        }

        self.suppliers.remove(id)?;
        self.resolver.unindex_supplier(&before);
        self.save_collection(EntityKind::Supplier)?;
        self.commit(
            ChangeEvent::new(EntityKind::Supplier, Operation::Delete, id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        finish((), failures)
    }

    // --- material operations ---

    pub fn add_material(&mut self, draft: MaterialDraft) -> Result<RawMaterial> {
        let material = RawMaterial::from_draft(draft);
        self.materials.insert(material.clone())?;
        self.save_collection(EntityKind::Material)?;

        let mut failures = Vec::new();
        self.commit(
            ChangeEvent::new(EntityKind::Material, Operation::Create, &material.id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        finish(material, failures)
    }

    pub fn update_material(&mut self, id: &EntityId, patch: MaterialPatch) -> Result<RawMaterial> {
        let after = self.materials.update(id, patch)?;
        self.save_collection(EntityKind::Material)?;

        let mut failures = Vec::new();
        self.commit(
            ChangeEvent::new(EntityKind::Material, Operation::Update, id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        finish(after, failures)
    }

    /// Delete a material; a cascade prunes it from every supplier and
    /// warehouse list that still carries it
    pub fn delete_material(&mut self, id: &EntityId, cascade: bool) -> Result<()> {
        self.materials.get(id)?;
        let referents = self.resolver.material_referents(id);
        if !referents.is_empty() && !cascade {
            return Err(ConflictError::StillReferenced {
                kind: EntityKind::Material,
                id: id.clone(),
                referents,
            }
            .into());
        }

        let mut failures = Vec::new();
        if cascade {
            for supplier_id in self.resolver.suppliers_of(id).to_vec() {
                let before = self.suppliers.get(&supplier_id)?.clone();
                let kept: Vec<EntityId> = before
                    .materials
                    .iter()
                    .filter(|m| *m != id)
                    .cloned()
                    .collect();
                let after = self.suppliers.update(
                    &supplier_id,
                    SupplierPatch {
                        materials: Some(kept),
                        ..Default::default()
                    },
                )?;
                self.resolver.reindex_supplier(&before, &after);
                self.save_collection(EntityKind::Supplier)?;
                self.commit(
                    ChangeEvent::new(EntityKind::Supplier, Operation::Update, &supplier_id),
                    &mut failures,
                );
            }
            for warehouse_id in self.resolver.warehouses_of_material(id).to_vec() {
                let kept: Vec<EntityId> = self
                    .warehouses
                    .get(&warehouse_id)?
                    .materials
                    .iter()
                    .filter(|m| *m != id)
                    .cloned()
                    .collect();
                self.apply_warehouse_update(
                    &warehouse_id,
                    WarehousePatch {
                        materials: Some(kept),
                        ..Default::default()
                    },
                    &mut failures,
                )?;
            }
        }

        self.materials.remove(id)?;
        self.save_collection(EntityKind::Material)?;
        self.commit(
            ChangeEvent::new(EntityKind::Material, Operation::Delete, id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        finish((), failures)
    }

    // --- warehouse operations ---

    pub fn add_warehouse(&mut self, draft: WarehouseDraft) -> Result<Warehouse> {
        let warehouse = Warehouse::from_draft(draft);
        self.check_suppliers_exist(&warehouse.suppliers)?;
        self.check_materials_exist(&warehouse.materials)?;
        self.warehouses.insert(warehouse.clone())?;
        self.resolver.index_warehouse(&warehouse);
        self.save_collection(EntityKind::Warehouse)?;

        let mut failures = Vec::new();
        self.commit(
            ChangeEvent::new(EntityKind::Warehouse, Operation::Create, &warehouse.id),
            &mut failures,
        );
        self.react_reconcile(&mut failures)?;
        finish(warehouse, failures)
    }

    pub fn update_warehouse(&mut self, id: &EntityId, patch: WarehousePatch) -> Result<Warehouse> {
        let before = self.warehouses.get(id)?.clone();
        let mut preview = before.clone();
        patch.clone().apply(&mut preview);
        self.check_suppliers_exist(&preview.suppliers)?;
        self.check_materials_exist(&preview.materials)?;

        let mut failures = Vec::new();
        let after = self.apply_warehouse_update(id, patch, &mut failures)?;
        if before.location.coordinates != after.location.coordinates {
            self.refresh_routes_of_warehouse(id, &mut failures)?;
        }
        finish(after, failures)
    }

    /// Delete a warehouse; a cascade removes its routes first
    pub fn delete_warehouse(&mut self, id: &EntityId, cascade: bool) -> Result<()> {
        let before = self.warehouses.get(id)?.clone();
        let referents = self.resolver.warehouse_referents(id);
        if !referents.is_empty() && !cascade {
            return Err(ConflictError::StillReferenced {
                kind: EntityKind::Warehouse,
                id: id.clone(),
                referents,
            }
            .into());
        }

        let mut failures = Vec::new();
        if cascade {
            for route_id in self.resolver.routes_of_warehouse(id).to_vec() {
                self.remove_route(&route_id, &mut failures)?;
            }
        }

        self.warehouses.remove(id)?;
        self.resolver.unindex_warehouse(&before);
        self.save_collection(EntityKind::Warehouse)?;
        self.commit(
            ChangeEvent::new(EntityKind::Warehouse, Operation::Delete, id),
            &mut failures,
        );
        finish((), failures)
    }

    // --- route operations ---

    /// Create the route for a pair, or refresh it if it already exists
    pub fn classify_route(
        &mut self,
        supplier_id: &EntityId,
        warehouse_id: &EntityId,
    ) -> Result<Route> {
        let supplier = self.suppliers.get(supplier_id)?.clone();
        let warehouse = self.warehouses.get(warehouse_id)?.clone();
        let mut failures = Vec::new();

        if let Some(route_id) = self.resolver.route_for(supplier_id, warehouse_id).cloned() {
            let mut route = self.routes.get(&route_id)?.clone();
            if refresh(&mut route, &supplier, &warehouse) {
                let updated = self.routes.update(
                    &route_id,
                    RoutePatch {
                        transport_mode: Some(route.transport_mode),
                        distance_km: Some(route.distance_km),
                        color_hex: Some(route.color_hex),
                    },
                )?;
                self.save_collection(EntityKind::Route)?;
                self.commit(
                    ChangeEvent::new(EntityKind::Route, Operation::Update, &route_id),
                    &mut failures,
                );
                return finish(updated, failures);
            }
            return Ok(route);
        }

        let spec = classify(&supplier, &warehouse);
        let route = Route {
            id: EntityId::generate(EntityKind::Route),
            supplier_id: supplier_id.clone(),
            warehouse_id: warehouse_id.clone(),
            transport_mode: spec.transport_mode,
            distance_km: spec.distance_km,
            color_hex: spec.color_hex,
            created: chrono::Utc::now(),
        };
        self.routes.insert(route.clone())?;
        self.resolver
            .index_route(&route)
            .map_err(|existing| ConflictError::DuplicateRoute {
                supplier_id: supplier_id.clone(),
                warehouse_id: warehouse_id.clone(),
                route_id: existing,
            })?;
        self.save_collection(EntityKind::Route)?;
        self.commit(
            ChangeEvent::new(EntityKind::Route, Operation::Create, &route.id),
            &mut failures,
        );
        finish(route, failures)
    }

    pub fn delete_route(&mut self, id: &EntityId) -> Result<()> {
        self.routes.get(id)?;
        let mut failures = Vec::new();
        self.remove_route(id, &mut failures)?;
        finish((), failures)
    }

    // --- reconciliation ---

    /// Explicit AutoMapper trigger; also dispatched after every
    /// supplier/material mutation and warehouse creation
    pub fn reconcile_warehouses(&mut self) -> Result<ReconcileOutcome> {
        let mut failures = Vec::new();
        let outcome = self.reconcile(&mut failures)?;
        finish(outcome, failures)
    }

    // --- integrity ---

    /// Sweep every stored foreign key and report dangling references
    pub fn integrity_report(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();
        for supplier in self.suppliers.iter() {
            for material in &supplier.materials {
                if !self.materials.contains(material) {
                    report.dangling.push(DanglingReference {
                        source: supplier.id.clone(),
                        field: "materials".to_string(),
                        missing: material.clone(),
                    });
                }
            }
        }
        for warehouse in self.warehouses.iter() {
            for supplier in &warehouse.suppliers {
                if !self.suppliers.contains(supplier) {
                    report.dangling.push(DanglingReference {
                        source: warehouse.id.clone(),
                        field: "suppliers".to_string(),
                        missing: supplier.clone(),
                    });
                }
            }
            for material in &warehouse.materials {
                if !self.materials.contains(material) {
                    report.dangling.push(DanglingReference {
                        source: warehouse.id.clone(),
                        field: "materials".to_string(),
                        missing: material.clone(),
                    });
                }
            }
        }
        for route in self.routes.iter() {
            if !self.suppliers.contains(&route.supplier_id) {
                report.dangling.push(DanglingReference {
                    source: route.id.clone(),
                    field: "supplier_id".to_string(),
                    missing: route.supplier_id.clone(),
                });
            }
            if !self.warehouses.contains(&route.warehouse_id) {
                report.dangling.push(DanglingReference {
                    source: route.id.clone(),
                    field: "warehouse_id".to_string(),
                    missing: route.warehouse_id.clone(),
                });
            }
        }
        report
    }

    // --- internals ---

    fn reconcile(&mut self, failures: &mut Vec<SubscriberFailure>) -> Result<ReconcileOutcome> {
        let plan = self.mapper.plan(
            &self.warehouses,
            &self.suppliers.ids(),
            &self.materials.ids(),
        )?;
        let Some(plan) = plan else {
            return Ok(ReconcileOutcome {
                warehouse_id: self
                    .mapper
                    .resolve_sink(&self.warehouses)?
                    .map(|w| w.id.clone()),
                ..Default::default()
            });
        };

        let sink = self.warehouses.get(&plan.warehouse_id)?;
        let mut suppliers = sink.suppliers.clone();
        suppliers.extend(plan.add_suppliers.iter().cloned());
        let mut materials = sink.materials.clone();
        materials.extend(plan.add_materials.iter().cloned());

        self.apply_warehouse_update(
            &plan.warehouse_id,
            WarehousePatch {
                suppliers: Some(suppliers),
                materials: Some(materials),
                ..Default::default()
            },
            failures,
        )?;
        tracing::debug!(
            warehouse = %plan.warehouse_id,
            suppliers = plan.add_suppliers.len(),
            materials = plan.add_materials.len(),
            "warehouse reconciled"
        );
        Ok(ReconcileOutcome {
            warehouse_id: Some(plan.warehouse_id),
            added_suppliers: plan.add_suppliers,
            added_materials: plan.add_materials,
        })
    }

    /// Reconcile as a reaction; the outcome is dropped, errors propagate
    fn react_reconcile(&mut self, failures: &mut Vec<SubscriberFailure>) -> Result<()> {
        self.reconcile(failures).map(|_| ())
    }

    /// Commit a warehouse mutation: store, indices, file, broadcast
    fn apply_warehouse_update(
        &mut self,
        id: &EntityId,
        patch: WarehousePatch,
        failures: &mut Vec<SubscriberFailure>,
    ) -> Result<Warehouse> {
        let before = self.warehouses.get(id)?.clone();
        let after = self.warehouses.update(id, patch)?;
        self.resolver.reindex_warehouse(&before, &after);
        self.save_collection(EntityKind::Warehouse)?;
        self.commit(
            ChangeEvent::new(EntityKind::Warehouse, Operation::Update, id),
            failures,
        );
        Ok(after)
    }

    /// Commit a route removal
    fn remove_route(
        &mut self,
        id: &EntityId,
        failures: &mut Vec<SubscriberFailure>,
    ) -> Result<()> {
        let removed = self.routes.remove(id)?;
        self.resolver.unindex_route(&removed);
        self.save_collection(EntityKind::Route)?;
        self.commit(
            ChangeEvent::new(EntityKind::Route, Operation::Delete, id),
            failures,
        );
        Ok(())
    }

    fn refresh_routes_of_supplier(
        &mut self,
        supplier_id: &EntityId,
        failures: &mut Vec<SubscriberFailure>,
    ) -> Result<()> {
        for route_id in self.resolver.routes_of_supplier(supplier_id).to_vec() {
            self.refresh_route(&route_id, failures)?;
        }
        Ok(())
    }

    fn refresh_routes_of_warehouse(
        &mut self,
        warehouse_id: &EntityId,
        failures: &mut Vec<SubscriberFailure>,
    ) -> Result<()> {
        for route_id in self.resolver.routes_of_warehouse(warehouse_id).to_vec() {
            self.refresh_route(&route_id, failures)?;
        }
        Ok(())
    }

    fn refresh_route(
        &mut self,
        route_id: &EntityId,
        failures: &mut Vec<SubscriberFailure>,
    ) -> Result<()> {
        let mut route = self.routes.get(route_id)?.clone();
        let supplier = self.suppliers.get(&route.supplier_id)?.clone();
        let warehouse = self.warehouses.get(&route.warehouse_id)?.clone();
        if refresh(&mut route, &supplier, &warehouse) {
            self.routes.update(
                route_id,
                RoutePatch {
                    transport_mode: Some(route.transport_mode),
                    distance_km: Some(route.distance_km),
                    color_hex: Some(route.color_hex),
                },
            )?;
            self.save_collection(EntityKind::Route)?;
            self.commit(
                ChangeEvent::new(EntityKind::Route, Operation::Update, route_id),
                failures,
            );
        }
        Ok(())
    }

    fn check_materials_exist(&self, materials: &[EntityId]) -> Result<()> {
        let missing: Vec<String> = materials
            .iter()
            .filter(|m| !self.materials.contains(m))
            .map(|m| format!("unknown material {m}"))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(missing).into())
        }
    }

    fn check_suppliers_exist(&self, suppliers: &[EntityId]) -> Result<()> {
        let missing: Vec<String> = suppliers
            .iter()
            .filter(|s| !self.suppliers.contains(s))
            .map(|s| format!("unknown supplier {s}"))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(missing).into())
        }
    }

    fn save_collection(&self, kind: EntityKind) -> Result<()> {
        let values = match kind {
            EntityKind::Supplier => collection_values(&self.suppliers, kind),
            EntityKind::Material => collection_values(&self.materials, kind),
            EntityKind::Warehouse => collection_values(&self.warehouses, kind),
            EntityKind::Route => collection_values(&self.routes, kind),
        }?;
        if let Err(err) = self.persistence.save(kind, &values) {
            tracing::error!(collection = kind.collection(), "save failed: {err}");
            return Err(err.into());
        }
        Ok(())
    }

    fn commit(&mut self, event: ChangeEvent, failures: &mut Vec<SubscriberFailure>) {
        tracing::debug!(kind = %event.kind, op = %event.op, id = %event.id, "committed");
        failures.extend(self.notifier.broadcast(&event));
    }
}

/// Surface collected subscriber failures once, after the mutation committed
fn finish<T>(value: T, failures: Vec<SubscriberFailure>) -> Result<T> {
    failures_into_result(failures)?;
    Ok(value)
}

fn hydrate<T: Entity>(persistence: &impl Persistence) -> Result<Vec<T>> {
    let records = persistence.load(T::KIND)?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record).map_err(|err| {
                ValidationError::single(format!(
                    "{} record {i}: {err}",
                    T::KIND.collection()
                ))
                .into()
            })
        })
        .collect()
}

fn collection_values<T: Entity>(
    store: &EntityStore<T>,
    kind: EntityKind,
) -> std::result::Result<Vec<Value>, PersistenceError> {
    store
        .iter()
        .map(|entity| {
            serde_json::to_value(entity).map_err(|source| PersistenceError::Encode {
                collection: kind.collection().to_string(),
                source,
            })
        })
        .collect()
}
