//! Smoke tests for the shopcheck CLI
//!
//! Runs use the in-memory storefront so no browser is needed.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the shopcheck binary
fn shopcheck() -> Command {
    let mut cmd = Command::cargo_bin("shopcheck").expect("shopcheck binary should exist");
    cmd.env_remove("SHOPCHECK_BASE_URL")
        .env_remove("SHOPCHECK_HEADLESS")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    shopcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    shopcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_fails() {
    shopcheck().assert().failure();
}

#[test]
fn test_invalid_subcommand() {
    shopcheck().arg("purchase").assert().failure();
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_all() {
    shopcheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("login::successful_login"))
        .stdout(predicate::str::contains("checkout::price_calculation_accuracy"));
}

#[test]
fn test_list_filtered() {
    shopcheck()
        .args(["list", "--filter", "cart::"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cart::remove_product_from_cart"))
        .stdout(predicate::str::contains("login::").not());
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_single_scenario_on_mock() {
    let tmp = TempDir::new().unwrap();
    shopcheck()
        .current_dir(tmp.path())
        .args(["-q", "run", "--driver", "mock", "--filter", "successful_login"])
        .arg("--output")
        .arg(tmp.path())
        .assert()
        .success();

    let reports: Vec<_> = fs::read_dir(tmp.path().join("reports"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(reports.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(reports[0].path()).unwrap()).unwrap();
    assert_eq!(json["driver"], "mock");
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert!(tmp.path().join("logs").is_dir());
}

#[test]
fn test_run_unmatched_filter_fails() {
    let tmp = TempDir::new().unwrap();
    shopcheck()
        .current_dir(tmp.path())
        .args(["run", "--driver", "mock", "--filter", "no_such_scenario"])
        .arg("--output")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches"));
}

#[test]
fn test_run_rejects_non_http_base_url() {
    let tmp = TempDir::new().unwrap();
    shopcheck()
        .current_dir(tmp.path())
        .args(["run", "--driver", "mock", "--base-url", "ftp://example.com/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn test_run_missing_config_file_fails() {
    let tmp = TempDir::new().unwrap();
    shopcheck()
        .current_dir(tmp.path())
        .args(["run", "--driver", "mock", "--config", "absent.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.yaml"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    shopcheck()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("saucedemo.com"));
}

#[test]
fn test_config_reads_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("suite.yaml");
    fs::write(&path, "base_url: http://localhost:3000/\nheadless: false\n").unwrap();
    shopcheck()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3000/"))
        .stdout(predicate::str::contains("headless: false"));
}

#[test]
fn test_config_env_override() {
    shopcheck()
        .env("SHOPCHECK_BASE_URL", "http://127.0.0.1:9000/")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:9000/"));
}
