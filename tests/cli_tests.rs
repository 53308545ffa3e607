//! CLI and basic command tests

mod common;

use common::{
    create_test_material, create_test_supplier, create_test_warehouse, filiere, list_json,
    setup_data_dir, show_json,
};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    filiere()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Supply-chain entity graph"));
}

#[test]
fn test_init_creates_collections() {
    let tmp = TempDir::new().unwrap();

    filiere()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    for name in ["suppliers", "materials", "warehouses", "routes"] {
        let path = tmp.path().join("data").join(format!("{name}.json"));
        assert!(path.exists(), "missing {name}.json");
        assert_eq!(fs::read_to_string(path).unwrap(), "[]\n");
    }
}

#[test]
fn test_init_is_idempotent() {
    let tmp = setup_data_dir();
    let supplier = create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();

    // Existing data is left untouched
    assert_eq!(list_json(&tmp, "sup").len(), 1);
    let shown = show_json(&tmp, "sup", &supplier);
    assert_eq!(shown["name"], "Acme Farms");
}

#[test]
fn test_missing_data_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("materials"));
}

// ============================================================================
// Supplier Command Tests
// ============================================================================

#[test]
fn test_sup_new_assigns_prefixed_id() {
    let tmp = setup_data_dir();
    let id = create_test_supplier(&tmp, "Acme Farms");
    assert!(id.starts_with("sup-"), "unexpected id {id}");
}

#[test]
fn test_sup_new_rejects_bad_coordinates() {
    let tmp = setup_data_dir();

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "new", "--name", "Bad", "--lat", "99.0", "--lng", "0.0"])
        .assert()
        .failure();

    assert!(list_json(&tmp, "sup").is_empty());
}

#[test]
fn test_sup_list_table_output() {
    let tmp = setup_data_dir();
    create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Farms"));
}

#[test]
fn test_sup_set_updates_name() {
    let tmp = setup_data_dir();
    let id = create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "set", &id, "--name", "Acme Organic Farms"])
        .assert()
        .success();

    let shown = show_json(&tmp, "sup", &id);
    assert_eq!(shown["name"], "Acme Organic Farms");
    assert_eq!(shown["id"], id.as_str());
}

#[test]
fn test_sup_new_with_unknown_material_fails() {
    let tmp = setup_data_dir();

    filiere()
        .current_dir(tmp.path())
        .args([
            "sup",
            "new",
            "--name",
            "Acme",
            "--lat",
            "45.5",
            "--lng",
            "-73.6",
            "--material",
            "mat-nope",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mat-nope"));
}

#[test]
fn test_sup_delete_requires_yes_or_cascade_flow() {
    let tmp = setup_data_dir();
    let id = create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "delete", &id, "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted supplier"));

    assert!(list_json(&tmp, "sup").is_empty());
}

// ============================================================================
// Material Command Tests
// ============================================================================

#[test]
fn test_mat_new_and_show() {
    let tmp = setup_data_dir();
    let id = create_test_material(&tmp, "Wheat");
    assert!(id.starts_with("mat-"));

    let shown = show_json(&tmp, "mat", &id);
    assert_eq!(shown["name"], "Wheat");
    assert_eq!(shown["quantity"], 100.0);
    assert_eq!(shown["unit"], "kg");
}

#[test]
fn test_mat_new_rejects_zero_quantity() {
    let tmp = setup_data_dir();

    filiere()
        .current_dir(tmp.path())
        .args([
            "mat",
            "new",
            "--name",
            "Void",
            "--material-type",
            "grain",
            "--quantity",
            "0",
            "--unit",
            "kg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantity"));
}

#[test]
fn test_mat_delete_referenced_without_cascade_fails() {
    let tmp = setup_data_dir();
    let wheat = create_test_material(&tmp, "Wheat");

    filiere()
        .current_dir(tmp.path())
        .args([
            "sup",
            "new",
            "--name",
            "Acme",
            "--lat",
            "45.5",
            "--lng",
            "-73.6",
            "--material",
            &wheat,
        ])
        .assert()
        .success();

    filiere()
        .current_dir(tmp.path())
        .args(["mat", "delete", &wheat, "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still referenced"));

    // Cascade prunes the supplier's list instead
    filiere()
        .current_dir(tmp.path())
        .args(["mat", "delete", &wheat, "-y", "--cascade"])
        .assert()
        .success();

    let suppliers = list_json(&tmp, "sup");
    assert!(suppliers[0]["materials"].as_array().unwrap().is_empty());
}

// ============================================================================
// Warehouse and Reconcile Tests
// ============================================================================

#[test]
fn test_wh_new_reconciles_existing_entities() {
    let tmp = setup_data_dir();
    let wheat = create_test_material(&tmp, "Wheat");
    let acme = create_test_supplier(&tmp, "Acme Farms");
    let central = create_test_warehouse(&tmp, "Central");

    // Creation already pulled the known IDs into the sink
    let shown = show_json(&tmp, "wh", &central);
    let suppliers = shown["suppliers"].as_array().unwrap();
    let materials = shown["materials"].as_array().unwrap();
    assert!(suppliers.iter().any(|s| s == acme.as_str()));
    assert!(materials.iter().any(|m| m == wheat.as_str()));
}

#[test]
fn test_reconcile_reports_up_to_date() {
    let tmp = setup_data_dir();
    create_test_supplier(&tmp, "Acme Farms");
    create_test_warehouse(&tmp, "Central");

    filiere()
        .current_dir(tmp.path())
        .arg("reconcile")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_reconcile_without_warehouses_is_a_noop() {
    let tmp = setup_data_dir();
    create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .arg("reconcile")
        .assert()
        .success()
        .stdout(predicate::str::contains("No warehouse"));
}

#[test]
fn test_reconcile_into_designated_warehouse() {
    let tmp = setup_data_dir();
    let first = create_test_warehouse(&tmp, "First");
    let east = create_test_warehouse(&tmp, "East");
    let acme = create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .args(["reconcile", "--into", &east])
        .assert()
        .success();

    let east_shown = show_json(&tmp, "wh", &east);
    assert!(east_shown["suppliers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s == acme.as_str()));
    // The first warehouse got the supplier too, from creation-time
    // reconciliation with the default sink
    let first_shown = show_json(&tmp, "wh", &first);
    assert!(first_shown["suppliers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s == acme.as_str()));
}

// ============================================================================
// Route Tests
// ============================================================================

#[test]
fn test_classify_creates_road_route() {
    let tmp = setup_data_dir();
    let acme = create_test_supplier(&tmp, "Acme Farms");
    let central = create_test_warehouse(&tmp, "Central");

    filiere()
        .current_dir(tmp.path())
        .args(["classify", &acme, &central])
        .assert()
        .success()
        .stdout(predicate::str::contains("road"));

    let routes = list_json(&tmp, "route");
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["transport_mode"], "road");
    assert_eq!(routes[0]["color_hex"], "#3b82f6");
    assert!(routes[0]["distance_km"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_classify_same_pair_twice_keeps_one_route() {
    let tmp = setup_data_dir();
    let acme = create_test_supplier(&tmp, "Acme Farms");
    let central = create_test_warehouse(&tmp, "Central");

    for _ in 0..2 {
        filiere()
            .current_dir(tmp.path())
            .args(["classify", &acme, &central])
            .assert()
            .success();
    }
    assert_eq!(list_json(&tmp, "route").len(), 1);
}

#[test]
fn test_classify_unknown_supplier_fails() {
    let tmp = setup_data_dir();
    let central = create_test_warehouse(&tmp, "Central");

    filiere()
        .current_dir(tmp.path())
        .args(["classify", "sup-nope", &central])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sup-nope"));
}

#[test]
fn test_supplier_move_refreshes_route_distance() {
    let tmp = setup_data_dir();
    let acme = create_test_supplier(&tmp, "Acme Farms");
    let central = create_test_warehouse(&tmp, "Central");

    filiere()
        .current_dir(tmp.path())
        .args(["classify", &acme, &central])
        .assert()
        .success();
    let before = list_json(&tmp, "route")[0]["distance_km"].as_f64().unwrap();

    // Move the supplier to Quebec City
    filiere()
        .current_dir(tmp.path())
        .args(["sup", "set", &acme, "--lat", "46.8", "--lng", "-71.2"])
        .assert()
        .success();

    let after = list_json(&tmp, "route")[0]["distance_km"].as_f64().unwrap();
    assert!(after > before, "expected {after} > {before}");
}

#[test]
fn test_sup_delete_with_route_requires_cascade() {
    let tmp = setup_data_dir();
    let acme = create_test_supplier(&tmp, "Acme Farms");
    let central = create_test_warehouse(&tmp, "Central");

    filiere()
        .current_dir(tmp.path())
        .args(["classify", &acme, &central])
        .assert()
        .success();

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "delete", &acme, "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still referenced"));

    filiere()
        .current_dir(tmp.path())
        .args(["sup", "delete", &acme, "-y", "--cascade"])
        .assert()
        .success();

    assert!(list_json(&tmp, "route").is_empty());
    let central_shown = show_json(&tmp, "wh", &central);
    assert!(!central_shown["suppliers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s == acme.as_str()));
}

// ============================================================================
// Validate, Backup, Restore
// ============================================================================

#[test]
fn test_validate_clean_graph() {
    let tmp = setup_data_dir();
    create_test_supplier(&tmp, "Acme Farms");

    filiere()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No dangling references"));
}

#[test]
fn test_validate_reports_dangling_reference() {
    let tmp = setup_data_dir();
    fs::write(
        tmp.path().join("data/suppliers.json"),
        r#"[
  {
    "id": "sup-legacy",
    "name": "Legacy",
    "location": { "coordinates": { "lat": 45.5, "lng": -73.6 } },
    "materials": ["mat-gone"]
  }
]
"#,
    )
    .unwrap();

    filiere()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("mat-gone"));
}

#[test]
fn test_backup_and_restore_round_trip() {
    let tmp = setup_data_dir();
    let acme = create_test_supplier(&tmp, "Acme Farms");

    let output = filiere()
        .current_dir(tmp.path())
        .arg("backup")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let backup_dir = stdout
        .split_whitespace()
        .find(|w| w.contains("backups"))
        .unwrap()
        .to_string();

    // Wipe the live collection, then restore
    filiere()
        .current_dir(tmp.path())
        .args(["sup", "delete", &acme, "-y"])
        .assert()
        .success();
    assert!(list_json(&tmp, "sup").is_empty());

    filiere()
        .current_dir(tmp.path())
        .args(["restore", &backup_dir, "-y"])
        .assert()
        .success();

    let suppliers = list_json(&tmp, "sup");
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0]["id"], acme.as_str());
}
