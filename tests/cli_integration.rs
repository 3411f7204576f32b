//! Black-box tests for the `st` binary.
//!
//! These drive the compiled CLI against temp worktrees and assert on
//! stdout, stderr, and exit codes.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run `st` with the given args inside `dir`.
fn st(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("st").expect("binary builds");
    cmd.current_dir(dir).args(args);
    cmd
}

/// Initialize a repository and return its worktree.
fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    st(dir.path(), &["init"]).assert().success();
    dir
}

/// Write, stage, and commit one file.
fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    fs::write(dir.join(name), content).unwrap();
    st(dir, &["add", name]).assert().success();
    st(dir, &["commit", "-m", message]).assert().success();
}

#[test]
fn init_reports_repository_and_branch() {
    let dir = TempDir::new().unwrap();
    st(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty repository"))
        .stdout(predicate::str::contains("master"));

    assert!(dir.path().join(".stratum/HEAD").is_file());
    assert!(dir.path().join(".stratum/refs/heads/master").is_file());
}

#[test]
fn reinit_is_benign_and_succeeds() {
    let dir = init_repo();
    st(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn init_honors_branch_flag() {
    let dir = TempDir::new().unwrap();
    st(dir.path(), &["init", "--branch", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main"));
    assert!(dir.path().join(".stratum/refs/heads/main").is_file());
}

#[test]
fn add_missing_file_exits_nonzero() {
    let dir = init_repo();
    st(dir.path(), &["add", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn commit_without_staged_entries_exits_nonzero() {
    let dir = init_repo();
    st(dir.path(), &["commit", "-m", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[test]
fn log_walks_commits_newest_first() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "one", "first commit");
    commit_file(dir.path(), "a.txt", "two", "second commit");

    let output = st(dir.path(), &["log"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let first_pos = stdout.find("first commit").unwrap();
    let second_pos = stdout.find("second commit").unwrap();
    assert!(second_pos < first_pos, "newest commit should print first");
}

#[test]
fn log_json_emits_parseable_records() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "one", "first commit");
    commit_file(dir.path(), "b.txt", "two", "second commit");

    let output = st(dir.path(), &["log", "--json"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let records: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["message"], "second commit");
    assert_eq!(records[1]["message"], "first commit");
    assert!(records[1]["parent"].is_null());
}

#[test]
fn log_on_unborn_branch_reports_no_commits() {
    let dir = init_repo();
    st(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No commits yet"));
}

#[test]
fn branch_listing_marks_active_branch() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "a", "base");
    st(dir.path(), &["branch", "feature"]).assert().success();

    st(dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* master"))
        .stdout(predicate::str::contains("  feature"));
}

#[test]
fn switch_and_switch_back() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "a", "base");
    st(dir.path(), &["branch", "feature"]).assert().success();

    st(dir.path(), &["switch", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to branch 'feature'"));

    st(dir.path(), &["switch", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already on branch 'feature'"));

    st(dir.path(), &["switch", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn fast_forward_merge_via_cli() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "a", "base");
    st(dir.path(), &["branch", "feature"]).assert().success();
    st(dir.path(), &["switch", "feature"]).assert().success();
    commit_file(dir.path(), "b.txt", "b", "feature work");
    st(dir.path(), &["switch", "master"]).assert().success();

    st(dir.path(), &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forwarded 'master'"));
}

#[test]
fn conflicting_merge_exits_nonzero_and_names_paths() {
    let dir = init_repo();
    commit_file(dir.path(), "f.txt", "A", "ancestor");
    st(dir.path(), &["branch", "x"]).assert().success();
    st(dir.path(), &["branch", "y"]).assert().success();

    st(dir.path(), &["switch", "x"]).assert().success();
    commit_file(dir.path(), "f.txt", "B", "to B");

    st(dir.path(), &["switch", "y"]).assert().success();
    commit_file(dir.path(), "f.txt", "C", "to C");

    st(dir.path(), &["merge", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("both modified: f.txt"))
        .stderr(predicate::str::contains("resolve the conflicting paths"));
}

#[test]
fn clean_merge_reports_new_commit() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "A", "ancestor");
    st(dir.path(), &["branch", "x"]).assert().success();
    st(dir.path(), &["branch", "y"]).assert().success();

    st(dir.path(), &["switch", "x"]).assert().success();
    commit_file(dir.path(), "b.txt", "B", "add b");

    st(dir.path(), &["switch", "y"]).assert().success();
    commit_file(dir.path(), "c.txt", "C", "add c");

    st(dir.path(), &["merge", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 'x' into 'y'"));

    // The merge commit is at the top of the log.
    st(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge x into y"));
}

#[test]
fn clone_refuses_existing_target() {
    let dir = init_repo();
    commit_file(dir.path(), "a.txt", "a", "base");

    st(dir.path(), &["clone", "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloned repository"));
    assert!(dir.path().join("copy/.stratum/HEAD").is_file());

    st(dir.path(), &["clone", "copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn commands_outside_a_repository_fail() {
    let dir = TempDir::new().unwrap();
    st(dir.path(), &["log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a stratum repository"));
}

#[test]
fn quiet_flag_suppresses_output() {
    let dir = TempDir::new().unwrap();
    st(dir.path(), &["--quiet", "init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn completion_generates_a_script() {
    let dir = TempDir::new().unwrap();
    st(dir.path(), &["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("st"));
}
