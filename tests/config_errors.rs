//! Behavioural tests covering configuration error reporting.
//!
//! These tests run the `scenmerge` binary with intentionally broken
//! configuration so we assert that config-loading failures are reported
//! consistently.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn invalid_config_file_reports_configuration_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(".scenmerge.toml");
    std::fs::write(&path, "not = [valid").expect("write broken config");

    let mut cmd = Command::cargo_bin("scenmerge").expect("binary");
    cmd.current_dir(dir.path())
        .env("SCENMERGE_CONFIG_PATH", &path)
        .args(["merge", "old.json", "new.json"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn unknown_mode_in_config_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(".scenmerge.toml");
    std::fs::write(&path, "[cmds.merge]\nmode = \"sideways\"\n").expect("write config");

    let mut cmd = Command::cargo_bin("scenmerge").expect("binary");
    cmd.current_dir(dir.path())
        .env("SCENMERGE_CONFIG_PATH", &path)
        .args(["merge", "old.json", "new.json"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
