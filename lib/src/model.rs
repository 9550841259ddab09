//! On-disk data types shared by every component.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A repository's identity, persisted once at the root of `.<app>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub default_environment: String,
    /// Lowercase, hyphenated identifier used by `clone SLUG`. Derived from
    /// `name` at `init` time, or mirrored verbatim from a remote at clone
    /// time; never separately user-settable.
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, description: String, default_environment: String) -> Self {
        let now = Utc::now();
        let slug = sanitize_name(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            default_environment,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lowercase, replace `_`/space with `-`, strip anything outside
/// `[a-z0-9-]`, trim leading/trailing `-`, default to `default` if empty.
/// Shared by project slugging (§3) and k8s export naming (§4.9).
pub fn sanitize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let trimmed = replaced.trim_matches('-');
    if trimmed.is_empty() {
        "default".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A persisted secret record. `no_secret` secrets carry `value` in plaintext
/// and an empty `nonce`; otherwise `value`/`nonce` are base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub key: String,
    pub value: String,
    pub nonce: String,
    pub no_secret: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Injected by `listSecrets`, not persisted in the per-environment map
    /// itself (which is keyed by `key` already).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub environment_name: Option<String>,
}

/// The kind of mutation a [`Change`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Modify,
    Remove,
}

/// A forward-looking delta against a secret map. For `Remove`, `value` and
/// `nonce` are unused but kept present (empty) to simplify serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeType,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub no_secret: bool,
}

impl Change {
    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            kind: ChangeType::Remove,
            key: key.into(),
            value: String::new(),
            nonce: String::new(),
            no_secret: false,
        }
    }
}

/// The active environment and its uncommitted journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentEnv {
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub pending: Vec<Change>,
}

/// An immutable, parent-linked entry in an environment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Empty for the root commit. Older on-disk formats omit this field
    /// entirely; it is read back as empty (root) in that case.
    #[serde(default)]
    pub parent_id: String,
    pub changes: Vec<Change>,
}

/// Per-environment HEAD pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Head {
    #[serde(default)]
    pub local_head: String,
    #[serde(default)]
    pub remote_head: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_name_replaces_and_trims() {
        assert_eq!(sanitize_name("My Cool_Project!"), "my-cool-project");
        assert_eq!(sanitize_name("___"), "default");
        assert_eq!(sanitize_name(""), "default");
        assert_eq!(sanitize_name("already-ok"), "already-ok");
    }

    #[test]
    fn commit_without_parent_id_field_reads_as_root() {
        let legacy = r#"{"id":"abc","message":"m","author":"a","timestamp":"2024-01-01T00:00:00Z","changes":[]}"#;
        let commit: Commit = serde_json::from_str(legacy).unwrap();
        assert_eq!(commit.parent_id, "");
    }
}
