//! End-to-end tests for the CLI binary surface.
//!
//! These exercise argument validation only; network-facing behavior is
//! covered by the harvest integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn harvester_command() -> Command {
    Command::cargo_bin("dossier-harvester").expect("binary builds")
}

#[test]
fn test_cli_requires_set_and_directory() {
    harvester_command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--set"));
}

#[test]
fn test_cli_rejects_dossier_combined_with_limit() {
    harvester_command()
        .args(["-s", "2.19.185", "-d", "out", "--dossier", "101", "-l", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_cli_rejects_zero_limit() {
    harvester_command()
        .args(["-s", "2.19.185", "-d", "out", "-l", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_help_describes_the_tool() {
    harvester_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Harvest archival dossiers"))
        .stdout(predicate::str::contains("--set"))
        .stdout(predicate::str::contains("--directory"));
}

#[test]
fn test_cli_version_flag() {
    harvester_command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
