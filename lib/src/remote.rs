//! Push (commits since remote head + final state) and clone (materialize a
//! remote project locally) against the remote API.

use serde::Deserialize;
use serde::Serialize;

use crate::commit;
use crate::error::Error;
use crate::error::RemoteError;
use crate::error::Result;
use crate::keystore::ACCESS_TOKEN_KEY;
use crate::keystore::Keystore;
use crate::model::Commit;
use crate::model::Project;
use crate::model::Secret;
use crate::repo::Repo;
use crate::secrets;
use crate::state::compute_state;

pub const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:54321";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest {
    project: Project,
    environment: String,
    commits: Vec<Commit>,
    final_state: Vec<Secret>,
    remote_head_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PushResponseBody {
    #[serde(default)]
    is_first_push: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloneRequest {
    project_slug: String,
}

/// The project record as the remote sends it on clone: the persisted
/// project fields plus the embedded base64 encryption key, which never
/// itself gets persisted in the project file — it goes to the key store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClonedProject {
    #[serde(flatten)]
    project: Project,
    key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloneResponseBody {
    project: ClonedProject,
    default_environment: String,
    commits: Vec<Commit>,
    secrets: Vec<Secret>,
}

/// Thin blocking HTTP client for the two remote endpoints this engine uses.
pub struct RemoteClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Default for RemoteClient {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_URL.to_string())
    }
}

impl RemoteClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn authed(&self, builder: reqwest::blocking::RequestBuilder, access_token: Option<&str>) -> reqwest::blocking::RequestBuilder {
        match access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn push(&self, access_token: Option<&str>, req: &PushRequest) -> Result<PushResponseBody> {
        let url = format!("{}/functions/v1/push", self.base_url);
        let builder = self.authed(self.client.post(&url).json(req), access_token);
        let response = builder.send().map_err(RemoteError::from)?;
        handle_response(response)
    }

    fn clone_project(&self, access_token: Option<&str>, slug: &str) -> Result<CloneResponseBody> {
        let url = format!("{}/functions/v1/clone", self.base_url);
        let req = CloneRequest { project_slug: slug.to_string() };
        let builder = self.authed(self.client.post(&url).json(&req), access_token);
        let response = builder.send().map_err(RemoteError::from)?;
        handle_response(response)
    }
}

fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::blocking::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().map_err(|e| RemoteError::from(e).into());
    }
    let body: ErrorBody = response.json().unwrap_or(ErrorBody { code: String::new(), message: String::new() });
    match status.as_u16() {
        401 => Err(RemoteError::Unauthorized.into()),
        409 if body.code == "PROJECT_NAME_ALREADY_EXISTS" => Err(RemoteError::ProjectNameAlreadyExists.into()),
        _ => Err(RemoteError::Remote(if body.message.is_empty() {
            status.to_string()
        } else {
            body.message
        })
        .into()),
    }
}

/// Outcome of a successful push, surfaced to the CLI for user-facing
/// messaging only; the engine effect (advancing `remoteHead`) is identical
/// regardless of `is_first_push`.
pub struct PushOutcome {
    pub is_first_push: bool,
    pub commits_pushed: usize,
    pub message: String,
}

/// Pushes commits-since-remote-head plus the computed final state, then
/// advances `remoteHead` locally to the last pushed commit's id.
pub fn push(
    repo: &Repo,
    keystore: &impl Keystore,
    client: &RemoteClient,
    project: &Project,
    env: &str,
) -> Result<Option<PushOutcome>> {
    let mut commits_to_push = commit::commits_since_remote_head(repo, env)?;
    if commits_to_push.is_empty() {
        return Ok(None);
    }
    commits_to_push.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    let head = commit::load_head(repo, env)?;
    let computed = compute_state(repo, env, &head.local_head)?;
    let on_disk = secrets::list_secrets(repo, &project.id, env)?
        .into_iter()
        .map(|s| (s.key.clone(), s))
        .collect::<std::collections::BTreeMap<_, _>>();

    let final_state: Vec<Secret> = computed
        .into_iter()
        .map(|(key, computed_secret)| match on_disk.get(&key) {
            Some(disk_secret) => disk_secret.clone(),
            None => Secret {
                project_id: Some(project.id),
                environment_name: Some(env.to_string()),
                ..computed_secret
            },
        })
        .collect();

    let access_token = keystore.get_raw(ACCESS_TOKEN_KEY).ok();
    let request = PushRequest {
        project: project.clone(),
        environment: env.to_string(),
        commits: commits_to_push.clone(),
        final_state,
        remote_head_hash: head.remote_head,
    };
    let response = client.push(access_token.as_deref(), &request)?;

    let last = commits_to_push.last().expect("checked non-empty above");
    commit::update_remote_head(repo, env, &last.id)?;

    Ok(Some(PushOutcome {
        is_first_push: response.is_first_push,
        commits_pushed: commits_to_push.len(),
        message: response.message,
    }))
}

/// Materializes a remote project into the current working directory.
pub fn clone_project(
    repo: &Repo,
    keystore: &impl Keystore,
    client: &RemoteClient,
    slug: &str,
) -> Result<Project> {
    let access_token = keystore.get_raw(ACCESS_TOKEN_KEY).ok();
    let response = client.clone_project(access_token.as_deref(), slug)?;

    repo.init().map_err(Error::from)?;
    repo.ensure_env_dir(&response.default_environment)?;
    crate::journal::set_current_environment(repo, &response.default_environment)?;

    let project = response.project.project;
    crate::project::save(repo, &project)?;
    crate::crypt::save_key(keystore, &project.id, &response.project.key)?;

    let mut last_commit_id = String::new();
    for imported in response.commits {
        let committed = commit::add_commit(
            repo,
            &response.default_environment,
            Some(imported.id.clone()),
            imported.message,
            imported.author,
            imported.changes,
            imported.timestamp,
        )?;
        last_commit_id = committed.id;
    }
    if !last_commit_id.is_empty() {
        commit::update_remote_head(repo, &response.default_environment, &last_commit_id)?;
    }

    for secret in response.secrets {
        secrets::import_secret(repo, &response.default_environment, secret)?;
    }

    Ok(project)
}
