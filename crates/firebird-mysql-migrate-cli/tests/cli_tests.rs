//! CLI integration tests for firebird-mysql-migrate.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the firebird-mysql-migrate binary.
fn cmd() -> Command {
    Command::cargo_bin("firebird-mysql-migrate").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--tables"))
        .stdout(predicate::str::contains("--structure-only"))
        .stdout(predicate::str::contains("--data-only"))
        .stdout(predicate::str::contains("--lowercase"))
        .stdout(predicate::str::contains("--drop-tables"))
        .stdout(predicate::str::contains("--output-json"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("firebird-mysql-migrate"));
}

// =============================================================================
// Flag Default Tests
// =============================================================================

#[test]
fn test_config_default_path() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

#[test]
fn test_log_format_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"));
}

#[test]
fn test_verbosity_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

// =============================================================================
// Exit Code Tests (Exit Code 1)
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_1() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // Empty file is not a valid YAML config

    cmd()
        .args(["--config", file.path().to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    // Valid YAML but no database names; fails validation before connecting
    writeln!(file, "firebird:").unwrap();
    writeln!(file, "  host: localhost").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn test_default_config_path_resolved_in_cwd() {
    let dir = tempfile::tempdir().unwrap();
    // No config.yaml in the working directory
    cmd().current_dir(dir.path()).assert().code(1);
}

// =============================================================================
// Flag Conflict Tests
// =============================================================================

#[test]
fn test_structure_only_conflicts_with_data_only() {
    cmd()
        .args(["--structure-only", "--data-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_flag_rejected() {
    cmd()
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

// =============================================================================
// Short Flag Tests
// =============================================================================

#[test]
fn test_short_config_flag() {
    // -c should work as short for --config
    cmd().args(["-c", "some_config.yaml", "--help"]).assert().success();
}

#[test]
fn test_short_tables_flag() {
    // -t should work as short for --tables
    cmd().args(["-t", "CUSTOMERS,ORDERS", "--help"]).assert().success();
}
