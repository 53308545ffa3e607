//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Helper to get a filiere command
pub fn filiere() -> Command {
    Command::new(cargo::cargo_bin!("filiere"))
}

/// Helper to create an initialized data directory in a temp directory
pub fn setup_data_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    filiere()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Run a `new` subcommand with JSON output and return the assigned ID
fn create_entity(tmp: &TempDir, args: &[&str]) -> String {
    let output = filiere()
        .current_dir(tmp.path())
        .args(args)
        .args(["-f", "json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let entity: Value = serde_json::from_slice(&output.stdout).unwrap();
    entity["id"].as_str().unwrap().to_string()
}

/// Helper to create a test supplier at fixed Montreal-ish coordinates
pub fn create_test_supplier(tmp: &TempDir, name: &str) -> String {
    create_entity(
        tmp,
        &["sup", "new", "--name", name, "--lat", "45.5", "--lng", "-73.6"],
    )
}

/// Helper to create a test material
pub fn create_test_material(tmp: &TempDir, name: &str) -> String {
    create_entity(
        tmp,
        &[
            "mat",
            "new",
            "--name",
            name,
            "--material-type",
            "grain",
            "--quantity",
            "100",
            "--unit",
            "kg",
        ],
    )
}

/// Helper to create a test warehouse
pub fn create_test_warehouse(tmp: &TempDir, name: &str) -> String {
    create_entity(
        tmp,
        &["wh", "new", "--name", name, "--lat", "45.4", "--lng", "-73.5"],
    )
}

/// Run `show` with JSON output and parse the entity
pub fn show_json(tmp: &TempDir, kind: &str, id: &str) -> Value {
    let output = filiere()
        .current_dir(tmp.path())
        .args([kind, "show", id, "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Run `list` with JSON output and parse the collection
pub fn list_json(tmp: &TempDir, kind: &str) -> Vec<Value> {
    let output = filiere()
        .current_dir(tmp.path())
        .args([kind, "list", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}
