use predicates::prelude::*;

use crate::common::TestEnvironment;

fn init(env: &TestEnvironment) {
    env.cellar_cmd().args(["init", "--name", "proj", "--environment", "dev"]).assert().success();
}

#[test]
fn add_rejects_duplicate_key() {
    let env = TestEnvironment::new();
    init(&env);
    env.cellar_cmd().args(["add", "API_KEY", "super-secret"]).assert().success();
    env.cellar_cmd()
        .args(["add", "API_KEY", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn set_upserts_without_failing() {
    let env = TestEnvironment::new();
    init(&env);
    env.cellar_cmd().args(["set", "API_KEY", "v1"]).assert().success();
    env.cellar_cmd().args(["set", "API_KEY", "v2"]).assert().success();
}

#[test]
fn remove_missing_key_fails() {
    let env = TestEnvironment::new();
    init(&env);
    env.cellar_cmd()
        .args(["remove", "MISSING"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn add_then_remove_collapses_pending_journal_to_nothing() {
    let env = TestEnvironment::new();
    init(&env);
    env.cellar_cmd().args(["add", "FOO", "bar"]).assert().success();
    env.cellar_cmd().args(["remove", "FOO"]).assert().success();

    env.cellar_cmd()
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending changes"));

    env.cellar_cmd()
        .args(["commit", "-m", "x"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No pending changes to commit"));
}

#[test]
fn no_secret_value_is_exported_in_plaintext() {
    let env = TestEnvironment::new();
    init(&env);
    env.cellar_cmd().args(["add", "--no-secret", "PLAIN", "visible"]).assert().success();
    env.cellar_cmd()
        .args(["export", "--format", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PLAIN=visible"));
}
