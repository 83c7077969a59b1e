//! CLI integration tests for Capstan.
//!
//! These tests stay off the network: they exercise project resolution
//! with local manifests only.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the capstan binary command with an isolated home directory.
fn capstan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("capstan").unwrap();
    cmd.env("CAPSTAN_HOME", home.path());
    cmd
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

#[test]
fn test_install_without_manifest_fails() {
    let home = temp_dir();
    let project = temp_dir();

    capstan(&home)
        .arg("install")
        .current_dir(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest not found"));
}

#[test]
fn test_install_project_without_requirements() {
    let home = temp_dir();
    let project = temp_dir();
    fs::write(
        project.path().join("cli.json"),
        r#"{"name": "empty", "version": "1.0.0"}"#,
    )
    .unwrap();

    capstan(&home)
        .arg("install")
        .current_dir(project.path())
        .assert()
        .success();

    // The install directory is created even when nothing resolves.
    assert!(project.path().join(".capstan").exists());
}

#[test]
fn test_install_skips_runtime_requirements() {
    let home = temp_dir();
    let project = temp_dir();
    fs::write(
        project.path().join("cli.json"),
        r#"{
            "name": "runtime-only",
            "version": "1.0.0",
            "requirements": {"node": "7.0.0", "python": ">=3.6"}
        }"#,
    )
    .unwrap();

    capstan(&home)
        .arg("install")
        .current_dir(project.path())
        .assert()
        .success();
}

#[test]
fn test_install_finds_manifest_in_parent() {
    let home = temp_dir();
    let project = temp_dir();
    fs::write(
        project.path().join("cli.json"),
        r#"{"name": "nested", "version": "1.0.0"}"#,
    )
    .unwrap();
    let nested = project.path().join("sub").join("dir");
    fs::create_dir_all(&nested).unwrap();

    capstan(&home)
        .arg("install")
        .current_dir(&nested)
        .assert()
        .success();

    // Materialization happens at the project root, not the cwd.
    assert!(project.path().join(".capstan").exists());
    assert!(!nested.join(".capstan").exists());
}

#[test]
fn test_list_empty() {
    let home = temp_dir();

    capstan(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_list_installed_packages() {
    let home = temp_dir();
    let pkg = home.path().join("src").join("cli-widgets");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(
        pkg.join("cli.json"),
        r#"{
            "name": "cli-widgets",
            "version": "1.2.0",
            "commands": [{"name": "widgets"}]
        }"#,
    )
    .unwrap();

    capstan(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cli-widgets 1.2.0"))
        .stdout(predicate::str::contains("widgets"));
}
