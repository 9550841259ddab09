//! Error kinds, grouped by origin, matching the component that raises them.

use std::path::PathBuf;

use thiserror::Error;

use crate::file_util::PathError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),
    #[error("No repository found (looked in {0} and its ancestors)")]
    NotFound(PathBuf),
    #[error("No current environment is set; run `env use <name>` first")]
    CurrentEnvNotSet,
    #[error("Environment {0:?} not found")]
    EnvNotFound(String),
    #[error(transparent)]
    Io(#[from] PathError),
}

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Secret {0:?} already exists")]
    AlreadyExists(String),
    #[error("Secret {0:?} not found")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("Commit {0:?} not found")]
    NotFound(String),
    #[error("Commit id {0:?} collides with an existing commit with different content")]
    IdCollision(String),
}

#[derive(Debug, Error)]
pub enum CryptError {
    #[error("Encryption key must be 32 bytes, got {0}")]
    KeyWrongLength(usize),
    #[error("Ciphertext is not valid base64")]
    MalformedCiphertext,
    #[error("Failed to decrypt secret (wrong key or corrupted data)")]
    DecryptionFailed,
}

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("Neither the platform keyring nor disk storage is available")]
    Unavailable,
    #[error("Key {0:?} not found in the key store")]
    KeyNotFound(String),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Not authenticated; run `login` first")]
    Unauthorized,
    #[error("A project with this name already exists on the remote")]
    ProjectNameAlreadyExists,
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("Timed out waiting for browser authentication")]
    AuthenticationTimeout,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{0}")]
    Usage(String),
    #[error("Unknown export format {0:?}")]
    UnknownExportFormat(String),
}

/// Top-level union of every subsystem error, aggregated via `#[from]` so call
/// sites can use `?` regardless of which component failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Secrets(#[from] SecretsError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error(transparent)]
    Crypt(#[from] CryptError),
    #[error(transparent)]
    Keystore(#[from] KeystoreError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Io(#[from] PathError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
