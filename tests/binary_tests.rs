//! Integration tests for the bq-bench binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir, tempdir};

/// Command isolated from user configuration.
fn cmd(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("bq-bench");
    cmd.env("HOME", home.path())
        .current_dir(home.path())
        .env_remove("RUST_LOG")
        .env_remove("GOOGLE_CLOUD_PROJECT");
    cmd
}

#[test]
fn test_help() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("dryrun"));
}

#[test]
fn test_lint_clean_stdin() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["lint", "--no-color"])
        .write_stdin("SELECT col1 FROM web_orders AS w\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_lint_issues_exit_one() {
    let home = tempdir().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "SELECT * FROM web_orders AS w;").unwrap();
    writeln!(file, "DELETE FROM sessions AS s").unwrap();

    cmd(&home)
        .args(["lint", file.path().to_str().unwrap(), "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Line 2: DELETE statement without WHERE clause"
        ))
        .stdout(predicate::str::contains("Line 1: Use of SELECT *"));
}

#[test]
fn test_lint_fix_in_place() {
    let home = tempdir().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "select col1 from web_orders").unwrap();

    cmd(&home)
        .args(["lint", file.path().to_str().unwrap(), "--fix", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Fixed SQL written to:"))
        .stdout(predicate::str::contains("has no alias"));

    let fixed = std::fs::read_to_string(file.path()).unwrap();
    assert!(fixed.starts_with("SELECT col1\nFROM web_orders AS w"));
}

#[test]
fn test_lint_fix_to_output() {
    let home = tempdir().unwrap();
    let output = home.path().join("fixed.sql");

    cmd(&home)
        .args(["lint", "--fix", "-o", output.to_str().unwrap(), "--no-color"])
        .write_stdin("select col1 from web_orders as w")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed SQL written to:"));

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "SELECT col1\nFROM web_orders AS w"
    );
}

#[test]
fn test_lint_fix_stdin_prints_sql() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["lint", "--fix", "--no-color"])
        .write_stdin("select col1 from web_orders as w")
        .assert()
        .success()
        .stdout(predicate::str::contains("SELECT col1\nFROM web_orders AS w"));
}

#[test]
fn test_lint_json_format() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["lint", "--format", "json"])
        .write_stdin("UPDATE web_orders SET col1 = 1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"rule_id\": \"LINT001\""));
}

#[test]
fn test_lint_disabled_by_local_config() {
    let home = tempdir().unwrap();
    std::fs::write(
        home.path().join(".bq-bench.toml"),
        "[lint]\ndisabled = [\"LINT002\"]\n"
    )
    .unwrap();

    cmd(&home)
        .args(["lint"])
        .write_stdin("SELECT * FROM web_orders AS w")
        .assert()
        .success();
}

#[test]
fn test_lint_file_not_found() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["lint", "/nonexistent/query.sql"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_lint_no_input() {
    let home = tempdir().unwrap();
    cmd(&home)
        .arg("lint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_query_no_sql() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["query", "-p", "proj"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_dryrun_file_not_found() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["dryrun", "-f", "/nonexistent/query.sql", "-p", "proj"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_schema_invalid_reference() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["schema", "users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_invalid_format_rejected() {
    let home = tempdir().unwrap();
    cmd(&home)
        .args(["query", "SELECT 1", "--format", "yaml"])
        .assert()
        .failure();
}
