//! Smoke tests for the todoctl binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("todoctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("--endpoint"));
}

#[test]
fn test_edit_help() {
    let mut cmd = Command::cargo_bin("todoctl").unwrap();
    cmd.arg("edit").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("New text"));
}

#[test]
fn test_done_requires_integer_id() {
    let mut cmd = Command::cargo_bin("todoctl").unwrap();
    cmd.arg("done").arg("abc");

    cmd.assert().failure();
}

#[test]
fn test_unreachable_endpoint_fails() {
    let mut cmd = Command::cargo_bin("todoctl").unwrap();
    cmd.env_remove("TODOAPP_ENDPOINT")
        .arg("--endpoint")
        .arg("http://127.0.0.1:9")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect"));
}
