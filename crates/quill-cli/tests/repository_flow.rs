//! Integration tests for the repository workflow commands.
//!
//! These drive the `quill` binary against a fake engine script:
//! - open/create, add, commit, revert, checkout
//! - listings and history (human and JSON)
//! - diff output and the "no snapshot" case
//! - failure reporting and exit codes

#![cfg(unix)]

mod common;

use predicates::prelude::*;
use std::fs;

use common::Sandbox;

fn open(sandbox: &Sandbox, repo: &str) {
    sandbox.cmd().args(["open", repo]).assert().success();
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_open_creates_then_reopens() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["open", "Notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Created repository Notes"))
        .stdout(predicate::str::contains("Initialized empty VCS repository"));

    sandbox
        .cmd()
        .args(["open", "Notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Opened repository Notes"));
}

#[test]
fn test_open_rejects_invalid_name() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["open", "bad/name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[err] Repository name contains invalid characters"));
}

#[test]
fn test_add_commit_history() {
    let sandbox = Sandbox::new();
    open(&sandbox, "Notes");

    sandbox
        .cmd()
        .args(["-r", "Notes", "add", "todo.txt", "--content", "milk\neggs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added to repository"));

    sandbox
        .cmd()
        .args(["-r", "Notes", "commit", "todo.txt", "-m", "first list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("committed"))
        .stdout(predicate::str::contains("Latest: 20240101000001"));

    sandbox
        .cmd()
        .args(["-r", "Notes", "history", "todo.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20240101000001"))
        .stdout(predicate::str::contains("first list"));

    let output = sandbox
        .cmd()
        .args(["-r", "Notes", "history", "todo.txt", "--json"])
        .output()
        .unwrap();
    let history: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(history[0]["tag"], "20240101000001");
    assert_eq!(history[0]["message"], "first list");
}

#[test]
fn test_listings() {
    let sandbox = Sandbox::new();
    open(&sandbox, "Notes");
    fs::create_dir(sandbox.root().join("node_modules")).unwrap();

    sandbox
        .cmd()
        .args(["-r", "Notes", "add", "a.txt", "--content", "x"])
        .assert()
        .success();
    sandbox.cmd().args(["-r", "Notes", "commit", "a.txt", "-m", "m"]).assert().success();

    sandbox
        .cmd()
        .arg("repos")
        .assert()
        .success()
        .stdout(predicate::str::contains("Notes"))
        .stdout(predicate::str::contains("ready"))
        .stdout(predicate::str::contains("node_modules").not());

    sandbox
        .cmd()
        .args(["-r", "Notes", "files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("config.txt").not());

    sandbox
        .cmd()
        .args(["-r", "Notes", "snapshots", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt.20240101000001"))
        .stdout(predicate::str::contains(".msg").not());
}

#[test]
fn test_files_on_missing_repository_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["-r", "Ghost", "files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Repository `Ghost` not found"));
}

#[test]
fn test_history_on_missing_repository_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["-r", "Ghost", "history", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[err] Repository `Ghost` not found"));

    sandbox
        .cmd()
        .args(["-r", "bad|name", "history", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[err] Repository name contains invalid characters"));
}

#[test]
fn test_diff_and_revert() {
    let sandbox = Sandbox::new();
    open(&sandbox, "Notes");

    sandbox
        .cmd()
        .args(["-r", "Notes", "diff", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No committed version"));

    sandbox
        .cmd()
        .args(["-r", "Notes", "add", "a.txt", "--content", "one\ntwo"])
        .assert()
        .success();
    sandbox.cmd().args(["-r", "Notes", "commit", "a.txt"]).assert().success();

    sandbox
        .cmd()
        .args(["-r", "Notes", "diff", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences found."));

    fs::write(sandbox.root().join("Notes/a.txt"), "one\nthree\n").unwrap();
    sandbox
        .cmd()
        .args(["-r", "Notes", "diff", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- two"))
        .stdout(predicate::str::contains("+ three"))
        .stdout(predicate::str::contains("1 added, 1 removed"));

    sandbox
        .cmd()
        .args(["-r", "Notes", "revert", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reverted"));
    assert_eq!(fs::read_to_string(sandbox.root().join("Notes/a.txt")).unwrap(), "one\ntwo");
}

#[test]
fn test_revert_without_snapshots_fails() {
    let sandbox = Sandbox::new();
    open(&sandbox, "Notes");
    sandbox.cmd().args(["-r", "Notes", "add", "a.txt"]).assert().success();

    sandbox
        .cmd()
        .args(["-r", "Notes", "revert", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No committed version found"));
}

#[test]
fn test_update_requires_tracked_file() {
    let sandbox = Sandbox::new();
    open(&sandbox, "Notes");

    sandbox
        .cmd()
        .args(["-r", "Notes", "update", "ghost.txt", "--content", "boo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in repository"));
}

#[test]
fn test_checkout_and_status() {
    let sandbox = Sandbox::new();
    open(&sandbox, "Notes");
    sandbox
        .cmd()
        .args(["-r", "Notes", "add", "a.txt", "--content", "secret"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["-r", "Notes", "checkout", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checked out"));
    assert!(sandbox.root().join("a.txt.decrypted").is_file());

    sandbox
        .cmd()
        .args(["-r", "Notes", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Repository: Notes"));
}

#[test]
fn test_missing_engine_reports_failure() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env("QUILL_ENGINE", sandbox.root().join("nope"))
        .args(["open", "Notes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`init` failed"));
}
