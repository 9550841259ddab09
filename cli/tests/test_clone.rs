use predicates::prelude::*;

use crate::common::StubServer;
use crate::common::TestEnvironment;

const ZERO_KEY_B64: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

fn clone_response_body() -> String {
    format!(
        r#"{{
            "project": {{
                "id": "11111111-1111-1111-1111-111111111111",
                "name": "RemoteProject",
                "description": "",
                "defaultEnvironment": "dev",
                "slug": "remote-project",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z",
                "key": "{ZERO_KEY_B64}"
            }},
            "defaultEnvironment": "dev",
            "commits": [
                {{
                    "id": "abcdef123456",
                    "message": "first",
                    "author": "someone",
                    "timestamp": "2024-01-01T00:00:00Z",
                    "parentId": "",
                    "changes": [
                        {{"type": "add", "key": "A", "value": "ciphertext", "nonce": "nonce", "noSecret": false}}
                    ]
                }}
            ],
            "secrets": [
                {{
                    "key": "A",
                    "value": "ciphertext",
                    "nonce": "nonce",
                    "noSecret": false,
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": "2024-01-01T00:00:00Z"
                }}
            ]
        }}"#
    )
}

#[test]
fn clone_materializes_project_commits_and_secrets() {
    let env = TestEnvironment::new();
    let server = StubServer::start("200 OK", clone_response_body());

    env.cellar_cmd()
        .env("CELLAR_REMOTE_URL", server.url())
        .args(["clone", "remote-project"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cloned project"));

    let cellar_dir = env.root().join(".cellar");
    assert!(cellar_dir.join("envs").join("dev").is_dir());

    let commits_file = cellar_dir.join("envs").join("dev").join("commits");
    let commits: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&commits_file).unwrap()).unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["id"], "abcdef123456");

    let head_file = cellar_dir.join("envs").join("dev").join("HEAD");
    let head: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&head_file).unwrap()).unwrap();
    assert_eq!(head["localHead"], "abcdef123456");
    assert_eq!(head["remoteHead"], "abcdef123456");

    env.cellar_cmd()
        .args(["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcdef123456"));
}

#[test]
fn clone_into_nonempty_directory_fails() {
    let env = TestEnvironment::new();
    env.cellar_cmd().args(["init", "--name", "existing"]).assert().success();

    let server = StubServer::start("200 OK", clone_response_body());
    env.cellar_cmd()
        .env("CELLAR_REMOTE_URL", server.url())
        .args(["clone", "remote-project"])
        .assert()
        .failure();
}
