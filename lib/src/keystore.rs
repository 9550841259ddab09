//! Platform-keyring-or-disk secure storage for the project encryption key
//! and auth tokens.
//!
//! The two-backend policy (try keyring, fall back to disk) is centralized
//! here behind a single trait; no other module is allowed to scatter its own
//! "try keyring then disk" logic.

use std::fs;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::KeystoreError;
use crate::file_util::IoResultExt as _;
use crate::file_util::write_file_atomic;
use crate::repo::Repo;

const SERVICE_NAME: &str = "cellar";

/// A JSON-serializable key/value secure store, backed by the platform
/// keyring when available and disk otherwise.
pub trait Keystore {
    fn set_raw(&self, key: &str, value: &str) -> Result<(), KeystoreError>;
    fn get_raw(&self, key: &str) -> Result<String, KeystoreError>;
    fn delete(&self, key: &str) -> Result<(), KeystoreError>;
    fn exists(&self, key: &str) -> bool;

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KeystoreError> {
        let encoded = serde_json::to_string(value).map_err(|_| KeystoreError::Unavailable)?;
        self.set_raw(key, &encoded)
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, KeystoreError> {
        let raw = self.get_raw(key)?;
        serde_json::from_str(&raw).map_err(|_| KeystoreError::KeyNotFound(key.to_string()))
    }
}

/// Default keystore: platform keyring first, JSON-on-disk fallback under
/// `.cellar/keystore/<key>.json`.
pub struct RepoKeystore {
    repo: Repo,
}

impl RepoKeystore {
    pub fn new(repo: Repo) -> Self {
        Self { repo }
    }

    fn keyring_entry(&self, key: &str) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(SERVICE_NAME, key)
    }

    fn set_disk(&self, key: &str, value: &str) -> Result<(), KeystoreError> {
        let path = self.repo.keystore_entry_file(key);
        let doc = serde_json::json!({ "value": value });
        let bytes = serde_json::to_vec_pretty(&doc).map_err(|_| KeystoreError::Unavailable)?;
        write_file_atomic(&path, &bytes).map_err(|_| KeystoreError::Unavailable)
    }

    fn get_disk(&self, key: &str) -> Result<String, KeystoreError> {
        let path = self.repo.keystore_entry_file(key);
        let bytes = fs::read(&path).map_err(|_| KeystoreError::KeyNotFound(key.to_string()))?;
        let doc: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|_| KeystoreError::KeyNotFound(key.to_string()))?;
        doc.get("value")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| KeystoreError::KeyNotFound(key.to_string()))
    }

    fn delete_disk(&self, key: &str) -> Result<(), KeystoreError> {
        let path = self.repo.keystore_entry_file(key);
        fs::remove_file(&path).context(&path).map_err(|_| KeystoreError::KeyNotFound(key.to_string()))
    }

    fn exists_disk(&self, key: &str) -> bool {
        self.repo.keystore_entry_file(key).is_file()
    }
}

impl Keystore for RepoKeystore {
    fn set_raw(&self, key: &str, value: &str) -> Result<(), KeystoreError> {
        match self.keyring_entry(key).and_then(|e| e.set_password(value)) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, key, "keyring set failed, falling back to disk");
                self.set_disk(key, value)
            }
        }
    }

    fn get_raw(&self, key: &str) -> Result<String, KeystoreError> {
        match self.keyring_entry(key).and_then(|e| e.get_password()) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(error = %e, key, "keyring get failed, falling back to disk");
                self.get_disk(key)
            }
        }
    }

    fn delete(&self, key: &str) -> Result<(), KeystoreError> {
        let keyring_ok = self
            .keyring_entry(key)
            .and_then(|e| e.delete_credential())
            .is_ok();
        let disk_ok = self.delete_disk(key).is_ok();
        if keyring_ok || disk_ok {
            Ok(())
        } else {
            Err(KeystoreError::KeyNotFound(key.to_string()))
        }
    }

    fn exists(&self, key: &str) -> bool {
        let in_keyring = self
            .keyring_entry(key)
            .and_then(|e| e.get_password())
            .is_ok();
        in_keyring || self.exists_disk(key)
    }
}

/// Keystore key under which the project encryption key is stored.
pub fn project_key_entry(project_id: &uuid::Uuid) -> String {
    format!("{project_id}:enc")
}

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const AUTH_RESPONSE_KEY: &str = "auth_response";
pub const CURRENT_USER_KEY: &str = "current_user";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_fallback_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repo::at(dir.path());
        repo.init().unwrap();
        let store = RepoKeystore::new(repo);
        store.set_disk("k", "v").unwrap();
        assert_eq!(store.get_disk("k").unwrap(), "v");
        assert!(store.exists_disk("k"));
        store.delete_disk("k").unwrap();
        assert!(!store.exists_disk("k"));
    }
}
