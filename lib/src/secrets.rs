//! Per-environment mapping from secret key to [`Secret`] record.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::crypt;
use crate::error::Error;
use crate::error::Result;
use crate::error::SecretsError;
use crate::keystore::Keystore;
use crate::model::Secret;
use crate::repo::Repo;
use crate::repo::read_json;
use crate::repo::write_json;

/// The on-disk secret map for one environment: `key -> Secret`, persisted as
/// a single JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretMap(pub BTreeMap<String, Secret>);

/// What kind of journal entry a store mutation implies, per §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEffect {
    Add,
    Modify,
}

fn load(repo: &Repo, env: &str) -> Result<SecretMap> {
    read_json(&repo.secrets_file(env)).map_err(Error::from)
}

fn save(repo: &Repo, env: &str, map: &SecretMap) -> Result<()> {
    write_json(&repo.secrets_file(env), map).map_err(Error::from)
}

/// Inserts a new secret. Fails with [`SecretsError::AlreadyExists`] if `key`
/// is already present.
pub fn add_secret(
    repo: &Repo,
    keystore: &impl Keystore,
    project_id: &uuid::Uuid,
    env: &str,
    key: &str,
    plaintext: &str,
    no_secret: bool,
) -> Result<Secret> {
    let mut map = load(repo, env)?;
    if map.0.contains_key(key) {
        return Err(SecretsError::AlreadyExists(key.to_string()).into());
    }
    let secret = build_secret(keystore, project_id, key, plaintext, no_secret)?;
    map.0.insert(key.to_string(), secret.clone());
    save(repo, env, &map)?;
    Ok(secret)
}

/// Upserts a secret, returning whether it was an insert or an overwrite.
pub fn set_secret(
    repo: &Repo,
    keystore: &impl Keystore,
    project_id: &uuid::Uuid,
    env: &str,
    key: &str,
    plaintext: &str,
    no_secret: bool,
) -> Result<(Secret, StoreEffect)> {
    let mut map = load(repo, env)?;
    let effect = if map.0.contains_key(key) {
        StoreEffect::Modify
    } else {
        StoreEffect::Add
    };
    let secret = build_secret(keystore, project_id, key, plaintext, no_secret)?;
    map.0.insert(key.to_string(), secret.clone());
    save(repo, env, &map)?;
    Ok((secret, effect))
}

/// Deletes a secret. Fails with [`SecretsError::NotFound`] if absent.
pub fn remove_secret(repo: &Repo, env: &str, key: &str) -> Result<()> {
    let mut map = load(repo, env)?;
    if map.0.remove(key).is_none() {
        return Err(SecretsError::NotFound(key.to_string()).into());
    }
    save(repo, env, &map)
}

/// Lists every secret in the environment, with `projectId`/`environmentName`
/// injected into each record.
pub fn list_secrets(repo: &Repo, project_id: &uuid::Uuid, env: &str) -> Result<Vec<Secret>> {
    let map = load(repo, env)?;
    Ok(map
        .0
        .into_values()
        .map(|mut s| {
            s.project_id = Some(*project_id);
            s.environment_name = Some(env.to_string());
            s
        })
        .collect())
}

fn build_secret(
    keystore: &impl Keystore,
    project_id: &uuid::Uuid,
    key: &str,
    plaintext: &str,
    no_secret: bool,
) -> Result<Secret> {
    let now = Utc::now();
    let (value, nonce) = if no_secret {
        (plaintext.to_string(), String::new())
    } else {
        let encryption_key = crypt::load_key(keystore, project_id)?;
        crypt::encrypt_for_storage(&encryption_key, plaintext, false)?
    };
    Ok(Secret {
        key: key.to_string(),
        value,
        nonce,
        no_secret,
        created_at: now,
        updated_at: now,
        project_id: None,
        environment_name: None,
    })
}

/// Inserts an already-encrypted secret verbatim, following the `addSecret`
/// precondition (used by clone import, where the remote has already
/// encrypted the value and re-encrypting would be both wrong and impossible
/// without the plaintext). Fails with [`SecretsError::AlreadyExists`] if
/// `key` is already present.
pub fn import_secret(repo: &Repo, env: &str, secret: Secret) -> Result<()> {
    let mut map = load(repo, env)?;
    if map.0.contains_key(&secret.key) {
        return Err(SecretsError::AlreadyExists(secret.key).into());
    }
    map.0.insert(secret.key.clone(), secret);
    save(repo, env, &map)
}
