//! Smoke tests for the folio CLI.
//!
//! These tests verify basic CLI functionality:
//! - `folio --version` outputs version info
//! - `folio --help` outputs help text
//! - `folio` (no args) outputs a JSON overview of the bundled dataset

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    let env = TestEnv::new();
    env.folio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    let env = TestEnv::new();
    env.folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn test_no_args_outputs_json() {
    let env = TestEnv::new();
    env.folio()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":10"))
        .stdout(predicate::str::contains("\"data_file\":null"));
}

#[test]
fn test_human_readable_flag() {
    let env = TestEnv::new();
    env.folio()
        .arg("-H")
        .assert()
        .success()
        .stdout(predicate::str::contains("10 projects"))
        .stdout(predicate::str::contains("data: bundled"));
}

#[test]
fn test_invalid_command() {
    let env = TestEnv::new();
    env.folio()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_dataset_is_json_error() {
    let env = TestEnv::new();
    env.folio()
        .args(["--data", "does-not-exist.json", "stats"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("{\"error\""));
}

#[test]
fn test_logs_stay_off_stdout() {
    let env = TestEnv::new();
    let output = env
        .folio()
        .env("FOLIO_LOG", "debug")
        .arg("stats")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    serde_json::from_str::<serde_json::Value>(&stdout).unwrap();
    assert!(String::from_utf8_lossy(&output.stderr).contains("project store loaded"));
}
