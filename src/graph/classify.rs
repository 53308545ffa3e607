//! RouteClassifier - derives transport metadata for supplier/warehouse pairs

use crate::core::geo::haversine_km;
use crate::entities::route::color_for_label;
use crate::entities::{Route, Supplier, Warehouse};

/// Derived route attributes for one (supplier, warehouse) pair
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSpec {
    pub transport_mode: String,
    pub color_hex: String,
    pub distance_km: f64,
}

/// Compute mode, color, and distance for a pair
///
/// The mode comes from the supplier's metadata when present, defaulting to
/// "road"; the color follows the fixed mode table with the road color as
/// the fallback for unknown labels.
pub fn classify(supplier: &Supplier, warehouse: &Warehouse) -> RouteSpec {
    let transport_mode = supplier
        .transport_mode
        .clone()
        .unwrap_or_else(|| "road".to_string());
    let color_hex = color_for_label(&transport_mode).to_string();
    let distance_km = haversine_km(
        supplier.location.coordinates,
        warehouse.location.coordinates,
    );
    RouteSpec {
        transport_mode,
        color_hex,
        distance_km,
    }
}

/// Re-derive a route's attributes; true when anything changed
pub fn refresh(route: &mut Route, supplier: &Supplier, warehouse: &Warehouse) -> bool {
    let spec = classify(supplier, warehouse);
    let changed = route.transport_mode != spec.transport_mode
        || route.color_hex != spec.color_hex
        || route.distance_km != spec.distance_km;
    if changed {
        route.transport_mode = spec.transport_mode;
        route.color_hex = spec.color_hex;
        route.distance_km = spec.distance_km;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Location;
    use crate::core::identity::EntityId;
    use crate::entities::supplier::{Supplier, SupplierDraft};
    use crate::entities::warehouse::{Warehouse, WarehouseDraft};
    use chrono::Utc;

    fn supplier(mode: Option<&str>) -> Supplier {
        Supplier::from_draft(SupplierDraft {
            name: "Acme Farms".to_string(),
            location: Location::at(45.5, -73.6),
            materials: Vec::new(),
            certifications: Vec::new(),
            transport_mode: mode.map(str::to_string),
        })
    }

    fn warehouse() -> Warehouse {
        Warehouse::from_draft(WarehouseDraft {
            name: "Central".to_string(),
            location: Location::at(45.4, -73.5),
            suppliers: Vec::new(),
            materials: Vec::new(),
            capacity: None,
            capacity_unit: None,
        })
    }

    #[test]
    fn test_mode_defaults_to_road() {
        let spec = classify(&supplier(None), &warehouse());
        assert_eq!(spec.transport_mode, "road");
        assert_eq!(spec.color_hex, "#3b82f6");
        assert!(spec.distance_km > 0.0);
    }

    #[test]
    fn test_supplier_mode_is_carried() {
        let spec = classify(&supplier(Some("rail")), &warehouse());
        assert_eq!(spec.transport_mode, "rail");
        assert_eq!(spec.color_hex, "#10b981");
    }

    #[test]
    fn test_unknown_mode_keeps_label_but_road_color() {
        let spec = classify(&supplier(Some("hyperloop")), &warehouse());
        assert_eq!(spec.transport_mode, "hyperloop");
        assert_eq!(spec.color_hex, "#3b82f6");
    }

    #[test]
    fn test_distance_zero_for_colocated_endpoints() {
        let mut s = supplier(None);
        s.location = Location::at(45.4, -73.5);
        let spec = classify(&s, &warehouse());
        assert_eq!(spec.distance_km, 0.0);
    }

    #[test]
    fn test_refresh_detects_coordinate_change() {
        let mut s = supplier(None);
        let w = warehouse();
        let spec = classify(&s, &w);
        let mut route = Route {
            id: EntityId::from_raw("rt-1"),
            supplier_id: s.id.clone(),
            warehouse_id: w.id.clone(),
            transport_mode: spec.transport_mode,
            distance_km: spec.distance_km,
            color_hex: spec.color_hex,
            created: Utc::now(),
        };

        assert!(!refresh(&mut route, &s, &w));

        s.location = Location::at(46.0, -74.0);
        assert!(refresh(&mut route, &s, &w));
        assert_eq!(route.distance_km, classify(&s, &w).distance_km);
    }

    #[test]
    fn test_refresh_detects_mode_change() {
        let mut s = supplier(None);
        let w = warehouse();
        let spec = classify(&s, &w);
        let mut route = Route {
            id: EntityId::from_raw("rt-1"),
            supplier_id: s.id.clone(),
            warehouse_id: w.id.clone(),
            transport_mode: spec.transport_mode,
            distance_km: spec.distance_km,
            color_hex: spec.color_hex,
            created: Utc::now(),
        };

        s.transport_mode = Some("air".to_string());
        assert!(refresh(&mut route, &s, &w));
        assert_eq!(route.transport_mode, "air");
        assert_eq!(route.color_hex, "#f59e0b");
    }
}
