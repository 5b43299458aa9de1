//! End-to-end tests for the fmeta binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn fmeta(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fmeta").unwrap();
    cmd.arg("--root").arg(root);
    cmd
}

fn init_repo(root: &Path) {
    fmeta(root).arg("init").assert().success();
}

#[test]
fn init_creates_repository_layout() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");

    fmeta(&root)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized fmeta repository"));

    assert!(root.join("staging").is_dir());
    assert!(root.join("objects").is_dir());
    assert!(root.join("config").is_file());
}

#[test]
fn status_untracked_file_prints_question_mark() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();

    fmeta(&root)
        .arg("status")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("? "));
}

#[test]
fn add_then_status_is_same() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();

    fmeta(&root)
        .arg("add")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("registered"));

    fmeta(&root)
        .arg("status")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("S "));
}

#[test]
fn modified_file_is_dirty_then_updated() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();
    fmeta(&root).arg("add").arg(&file).assert().success();

    fs::write(&file, b"hello2").unwrap();

    fmeta(&root)
        .arg("status")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("M "));

    fmeta(&root)
        .arg("add")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    fmeta(&root)
        .arg("status")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("S "));
}

#[test]
fn renamed_file_is_new_name_then_linked() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();
    fmeta(&root).arg("add").arg(&file).assert().success();

    let moved = temp.path().join("b.txt");
    fs::rename(&file, &moved).unwrap();

    fmeta(&root)
        .arg("status")
        .arg(&moved)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("+ "));

    fmeta(&root)
        .arg("add")
        .arg(&moved)
        .assert()
        .success()
        .stdout(predicate::str::contains("linked"));

    fmeta(&root)
        .arg("status")
        .arg(&moved)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("S "));
}

#[test]
fn metadata_survives_a_rename() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();
    fmeta(&root).arg("add").arg(&file).assert().success();
    fmeta(&root)
        .args(["comment"])
        .arg(&file)
        .arg("important notes")
        .assert()
        .success();
    fmeta(&root)
        .args(["meta"])
        .arg(&file)
        .args(["project", "q3"])
        .assert()
        .success();
    fmeta(&root)
        .args(["tag"])
        .arg(&file)
        .arg("docs")
        .assert()
        .success();

    let moved = temp.path().join("renamed.txt");
    fs::rename(&file, &moved).unwrap();
    fmeta(&root).arg("add").arg(&moved).assert().success();

    fmeta(&root)
        .arg("show")
        .arg(&moved)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("important notes")
                .and(predicate::str::contains("project = q3"))
                .and(predicate::str::contains("docs"))
                .and(predicate::str::contains("renamed.txt")),
        );
}

#[test]
fn show_lists_comment_ids_reported_by_comment() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();
    fmeta(&root).arg("add").arg(&file).assert().success();

    let output = fmeta(&root)
        .args(["--json", "comment"])
        .arg(&file)
        .arg("correlate me")
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = parsed["id"].as_str().unwrap().to_string();

    fmeta(&root)
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(&id).and(predicate::str::contains("correlate me")));
}

#[test]
fn show_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();
    fmeta(&root).arg("add").arg(&file).assert().success();
    fmeta(&root)
        .arg("meta")
        .arg(&file)
        .args(["k", "v"])
        .assert()
        .success();

    let output = fmeta(&root)
        .args(["--json", "show"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["record"]["metas"]["k"], "v");
    assert_eq!(parsed["record"]["size"], 6);
}

#[test]
fn comment_on_untracked_file_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    init_repo(&root);

    let file = temp.path().join("a.txt");
    fs::write(&file, b"hello1").unwrap();

    fmeta(&root)
        .arg("comment")
        .arg(&file)
        .arg("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is it tracked?"));
}

#[test]
fn status_against_missing_repo_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("never-initialized");

    let file = temp.path().join("a.txt");
    fs::write(&file, b"x").unwrap();

    fmeta(&root)
        .arg("status")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open repository"));
}
