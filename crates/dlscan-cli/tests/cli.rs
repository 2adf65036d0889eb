use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn dlscan() -> Command {
    Command::cargo_bin("dlscan").unwrap()
}

#[test]
fn test_help() {
    dlscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("states"));
}

#[test]
fn test_extract_from_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ocr.txt");
    fs::write(
        &input,
        "CA\nDL A7654321\n1 SAMPLE\n2 ALEX\n7: 08/31/1977\n",
    )
    .unwrap();

    let output = dlscan().arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["state"], "CA");
    assert_eq!(json["license_number"], "A7654321");
    assert_eq!(json["first_name"], "ALEX");
    assert_eq!(json["last_name"], "SAMPLE");
    assert_eq!(json["date_of_birth"], "08/31/1977");
    assert_eq!(json["success"], true);
    assert_eq!(json["confidence_score"], 1.0);
}

#[test]
fn test_extract_from_stdin_as_csv() {
    dlscan()
        .args(["extract", "-", "--format", "csv"])
        .write_stdin("Lic# A1234567 CLASS C\nCA\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("state,license_number"))
        .stdout(predicate::str::contains("CA,A1234567"));
}

#[test]
fn test_extract_missing_file() {
    dlscan()
        .args(["extract", "/nonexistent/ocr.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_scan_missing_file() {
    dlscan()
        .args(["scan", "/nonexistent/license.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_scan_without_models_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("license.png");
    fs::write(&input, b"not really a png").unwrap();

    dlscan()
        .arg("scan")
        .arg(&input)
        .arg("--model-dir")
        .arg(dir.path().join("models"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stderr(predicate::str::contains("OCR client not initialized"));
}

#[test]
fn test_batch_summary_with_failures() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.png"), b"a").unwrap();
    fs::write(dir.path().join("b.png"), b"b").unwrap();
    let out = dir.path().join("out");

    dlscan()
        .arg("batch")
        .arg(dir.path().join("*.png").to_str().unwrap())
        .arg("--output-dir")
        .arg(&out)
        .arg("--model-dir")
        .arg(dir.path().join("models"))
        .args(["--summary", "--continue-on-error"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Found 2 files"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,state,license_number"));
    assert_eq!(summary.lines().count(), 3);
    assert!(out.join("a.json").exists());
}

#[test]
fn test_states_list() {
    dlscan()
        .arg("states")
        .assert()
        .success()
        .stdout(predicate::str::contains("CONNECTICUT"))
        .stdout(predicate::str::contains("51 jurisdictions"));
}

#[test]
fn test_states_single_json() {
    let output = dlscan().args(["states", "ct", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["code"], "CT");
    assert_eq!(json[0]["pattern"], r"\d{9}");
    assert_eq!(json[0]["specific"], true);
}

#[test]
fn test_states_unknown_code() {
    dlscan()
        .args(["states", "XX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown jurisdiction code"));
}

#[test]
fn test_config_init_get_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path = path.to_str().unwrap();

    dlscan()
        .args(["--config", path, "config", "init"])
        .assert()
        .success();

    dlscan()
        .args(["--config", path, "config", "set", "extraction.min_age", "18"])
        .assert()
        .success();

    dlscan()
        .args(["--config", path, "config", "get", "extraction.min_age"])
        .assert()
        .success()
        .stdout(predicate::str::contains("18"));

    dlscan()
        .args(["--config", path, "config", "set", "extraction.min_age", "old"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    dlscan()
        .args(["--config", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
