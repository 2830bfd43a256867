//! Smoke tests for the sep-e2e binary

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sep_e2e() -> Command {
    let mut cmd = Command::cargo_bin("sep-e2e").expect("sep-e2e binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("SEP_E2E_BASE_URL")
        .env_remove("SEP_E2E_TIMEOUT_MS")
        .env_remove("SEP_E2E_POLL_MS")
        .env_remove("SEP_E2E_HEADLESS")
        .env_remove("SEP_E2E_CONFIG")
        .env_remove("CHROMIUM_PATH");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    sep_e2e()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_lists_subcommands() {
    sep_e2e()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    sep_e2e().assert().failure();
}

// ============================================================================
// list / config
// ============================================================================

#[test]
fn test_list_prints_scenarios() {
    sep_e2e()
        .args(["list", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collapsible-toggle"))
        .stdout(predicate::str::contains("object-type-select"));
}

#[test]
fn test_config_reads_file_and_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sep-e2e.yaml");
    fs::write(&path, "base_url: http://sandbox.test:8080\ntimeout_ms: 3000\n").unwrap();

    sep_e2e()
        .args(["config", "--format", "json", "--config"])
        .arg(&path)
        .env("SEP_E2E_POLL_MS", "20")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://sandbox.test:8080"))
        .stdout(predicate::str::contains("\"timeout_ms\": 3000"))
        .stdout(predicate::str::contains("\"poll_ms\": 20"));
}

#[test]
fn test_config_rejects_bad_env() {
    sep_e2e()
        .arg("config")
        .env("SEP_E2E_HEADLESS", "sometimes")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SEP_E2E_HEADLESS"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_mock_suite_passes() {
    sep_e2e()
        .args(["run", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS collapsible-toggle"))
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_run_json_report() {
    let output = sep_e2e()
        .args(["run", "--filter", "model-import", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["suite"], "sandbox");
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 2);
    assert!(report["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .all(|o| o["status"] == "passed"));
}

#[test]
fn test_run_unknown_filter() {
    sep_e2e()
        .args(["run", "--filter", "does-not-exist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scenario matches"));
}

#[cfg(not(feature = "browser"))]
#[test]
fn test_live_requires_browser_feature() {
    sep_e2e()
        .args(["run", "--live"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("browser"));
}
