//! Smoke tests of the CLI surface: help, usage errors, bad inputs.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sulfolib() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("sulfolib")
}

#[test]
fn test_help_lists_the_subcommands() {
    sulfolib()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("enumerate"))
        .stdout(predicate::str::contains("reconcile"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_version_reports_the_binary_name() {
    sulfolib()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sulfolib"));
}

#[test]
fn test_missing_required_flag_is_a_usage_error() {
    sulfolib()
        .arg("enumerate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--sulfonyl-chlorides"));
}

#[test]
fn test_unknown_subcommand_is_a_usage_error() {
    sulfolib().arg("frobnicate").assert().code(2);
}

#[test]
fn test_unreadable_input_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    sulfolib()
        .current_dir(dir.path())
        .args([
            "enumerate",
            "--sulfonyl-chlorides",
            "no_such_file.csv",
            "--amines",
            "also_missing.csv",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: csv:"));
}
