use predicates::prelude::*;

use crate::common::TestEnvironment;

#[test]
fn happy_path_commit_records_single_add_change_and_advances_local_head() {
    let env = TestEnvironment::new();
    env.cellar_cmd()
        .args(["init", "--name", "TestProject", "--description", "desc", "--environment", "dev"])
        .assert()
        .success();
    env.cellar_cmd().args(["add", "API_KEY", "super-secret"]).assert().success();
    env.cellar_cmd()
        .args(["commit", "-m", "Add API key"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Committed"));

    env.cellar_cmd()
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending changes"));

    let commits_file = env.root().join(".cellar").join("envs").join("dev").join("commits");
    let commits: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&commits_file).unwrap()).unwrap();
    assert_eq!(commits.len(), 1);
    let changes = commits[0]["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["type"], "add");
    assert_eq!(changes[0]["key"], "API_KEY");

    let head_file = env.root().join(".cellar").join("envs").join("dev").join("HEAD");
    let head: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&head_file).unwrap()).unwrap();
    assert_eq!(head["localHead"], commits[0]["id"]);
}

#[test]
fn log_lists_newest_first_and_marks_head() {
    let env = TestEnvironment::new();
    env.cellar_cmd().args(["init", "--name", "proj", "--environment", "dev"]).assert().success();
    env.cellar_cmd().args(["add", "A", "1"]).assert().success();
    env.cellar_cmd().args(["commit", "-m", "first"]).assert().success();
    env.cellar_cmd().args(["add", "B", "2"]).assert().success();
    env.cellar_cmd().args(["commit", "-m", "second"]).assert().success();

    let output = env.cellar_cmd().args(["log"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("second"));
    assert!(lines[0].contains("HEAD"));
    assert!(lines[1].contains("first"));
}
