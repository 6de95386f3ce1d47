//! End-to-end tests for the spotfeed-map binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MARKERS: &str = r#"[
    {"id": "A", "latitude": 0.001, "longitude": 0.001},
    {"id": "B", "latitude": 0.001, "longitude": 0.002, "kind": "check_in"},
    {"id": "C", "latitude": 5.0, "longitude": 5.0}
]"#;

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("markers.json");
    fs::write(&path, MARKERS).unwrap();
    (dir, path)
}

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spotfeed-map").unwrap();
    // Keep config discovery away from the developer's working tree
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cluster_json_output() {
    let (dir, markers) = setup();

    let output = cmd(&dir)
        .args(["cluster", "--json", "--viewport", "0.001,0.0015,0.02,0.02"])
        .arg(&markers)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["clustered"].as_array().unwrap().len(), 1);
    assert_eq!(json["clustered"][0]["count"], 2);
    assert_eq!(json["clustered"][0]["content"][1]["kind"], "check_in");
    assert_eq!(json["solo"][0]["id"], "C");
}

#[test]
fn cluster_text_output() {
    let (dir, markers) = setup();

    cmd(&dir)
        .args(["cluster", "--viewport", "0.001,0.0015,0.02,0.02"])
        .arg(&markers)
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster:0:0"))
        .stdout(predicate::str::contains("1 clusters, 1 solo"));
}

#[test]
fn degenerate_viewport_is_all_solo() {
    let (dir, markers) = setup();

    let output = cmd(&dir)
        .args(["cluster", "--json", "--viewport", "0,0,0,0"])
        .arg(&markers)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["clustered"].as_array().unwrap().is_empty());
    assert_eq!(json["solo"].as_array().unwrap().len(), 3);
}

#[test]
fn levels_json_output() {
    let (dir, markers) = setup();

    let output = cmd(&dir)
        .args(["levels", "--json", "--center", "0,0", "--span", "50", "--span", "0.001"])
        .arg(&markers)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["span"], 50.0);
    assert_eq!(json[0]["clustered"][0]["count"], 3);
    assert_eq!(json[1]["solo"].as_array().unwrap().len(), 3);
}

#[test]
fn divisor_from_config_file() {
    let (dir, markers) = setup();
    fs::write(dir.path().join(".spotfeed.toml"), "[clustering]\ngrid_divisor = 20.0\n").unwrap();

    // Cell size 0.001: A and B land in different longitude buckets
    let output = cmd(&dir)
        .args(["cluster", "--json", "--viewport", "0,0,0.02,0.02"])
        .arg(&markers)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["clustered"].as_array().unwrap().is_empty());
}

#[test]
fn invalid_divisor_fails() {
    let (dir, markers) = setup();

    cmd(&dir)
        .args(["cluster", "--divisor", "0", "--viewport", "0,0,1,1"])
        .arg(&markers)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid grid divisor"));
}

#[test]
fn invalid_divisor_json_report() {
    let (dir, markers) = setup();

    let output = cmd(&dir)
        .args(["cluster", "--json", "--divisor", "0", "--viewport", "0,0,1,1"])
        .arg(&markers)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["code"], "GEO_ERROR");
    assert_eq!(report["category"], "Geo");
    assert_eq!(report["context"], "While reading --divisor");
}

#[test]
fn missing_config_file_exits_with_config_code() {
    let (dir, markers) = setup();

    cmd(&dir)
        .args(["cluster", "--config", "nope.toml", "--viewport", "0,0,1,1"])
        .arg(&markers)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("E3001"));
}

#[test]
fn missing_markers_file_fails() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .args(["cluster", "--viewport", "0,0,1,1", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"))
        .stderr(predicate::str::contains("E2001"));
}
