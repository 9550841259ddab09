use predicates::prelude::*;

use crate::common::TestEnvironment;

#[test]
fn init_creates_repo_layout_and_selects_default_environment() {
    let env = TestEnvironment::new();
    env.cellar_cmd()
        .args(["init", "--name", "TestProject", "--description", "desc", "--environment", "dev"])
        .assert()
        .success();

    let cellar_dir = env.root().join(".cellar");
    assert!(cellar_dir.is_dir());
    assert!(cellar_dir.join("pro").is_file());
    assert!(cellar_dir.join("current").is_file());
    assert!(cellar_dir.join("envs").join("dev").is_dir());
}

#[test]
fn init_twice_fails() {
    let env = TestEnvironment::new();
    env.cellar_cmd().args(["init", "--name", "TestProject"]).assert().success();
    env.cellar_cmd()
        .args(["init", "--name", "TestProject"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already"));
}

#[test]
fn commands_without_a_repo_fail() {
    let env = TestEnvironment::new();
    env.cellar_cmd().args(["status"]).assert().failure();
}
