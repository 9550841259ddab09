//! The pending, uncommitted change list for the current environment.

use crate::error::Error;
use crate::error::RepoError;
use crate::error::Result;
use crate::model::Change;
use crate::model::ChangeType;
use crate::model::CurrentEnv;
use crate::repo::Repo;
use crate::repo::read_json;
use crate::repo::write_json;

fn load(repo: &Repo) -> Result<CurrentEnv> {
    read_json(&repo.current_env_file()).map_err(Error::from)
}

fn save(repo: &Repo, current: &CurrentEnv) -> Result<()> {
    write_json(&repo.current_env_file(), current).map_err(Error::from)
}

pub fn current(repo: &Repo) -> Result<CurrentEnv> {
    load(repo)
}

/// Sets the active environment, leaving the pending journal untouched.
pub fn set_current_environment(repo: &Repo, env: &str) -> Result<()> {
    let mut current = load(repo)?;
    current.environment = env.to_string();
    save(repo, &current)
}

/// Returns the active environment name, failing with
/// [`RepoError::CurrentEnvNotSet`] if none has been selected.
pub fn require_current_environment(repo: &Repo) -> Result<String> {
    let current = load(repo)?;
    if current.environment.is_empty() {
        Err(RepoError::CurrentEnvNotSet.into())
    } else {
        Ok(current.environment)
    }
}

/// Appends `next` to the journal, applying the normalization rule over the
/// existing pending change (if any) for `next.key`. See the table in §4.5.
pub fn append_change(repo: &Repo, next: Change) -> Result<()> {
    let mut current = load(repo)?;
    if current.environment.is_empty() {
        return Err(RepoError::CurrentEnvNotSet.into());
    }
    let pending = &mut current.pending;
    match pending.iter().position(|c| c.key == next.key) {
        None => pending.push(next),
        Some(idx) => match normalize(&pending[idx], &next) {
            Some(merged) => pending[idx] = merged,
            None => {
                pending.remove(idx);
            }
        },
    }
    save(repo, &current)
}

/// Combines a pending change with an incoming one for the same key, per the
/// normalization table. `None` means the pending entry should be dropped
/// entirely (add then remove collapses to a no-op).
fn normalize(prev: &Change, next: &Change) -> Option<Change> {
    use ChangeType::*;
    match (prev.kind, next.kind) {
        (Add, Remove) => None,
        (Add, Add) | (Add, Modify) => Some(Change { kind: Add, ..next.clone() }),
        (Remove, Add) => Some(Change { kind: Modify, ..next.clone() }),
        (Modify, Add) => Some(Change { kind: Modify, ..next.clone() }),
        (Modify, _) => Some(next.clone()),
        (Remove, Modify) | (Remove, Remove) => Some(next.clone()),
    }
}

/// Clears the pending journal. Invoked after a successful commit.
pub fn clear(repo: &Repo) -> Result<()> {
    let mut current = load(repo)?;
    current.pending.clear();
    save(repo, &current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(key: &str, value: &str) -> Change {
        Change {
            kind: ChangeType::Add,
            key: key.to_string(),
            value: value.to_string(),
            nonce: String::new(),
            no_secret: false,
        }
    }

    fn modify(key: &str, value: &str) -> Change {
        Change { kind: ChangeType::Modify, ..add(key, value) }
    }

    fn setup() -> (tempfile::TempDir, Repo) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repo::at(dir.path());
        repo.init().unwrap();
        set_current_environment(&repo, "dev").unwrap();
        (dir, repo)
    }

    #[test]
    fn add_then_remove_collapses_to_nothing() {
        let (_dir, repo) = setup();
        append_change(&repo, add("FOO", "bar")).unwrap();
        append_change(&repo, Change::remove("FOO")).unwrap();
        assert!(current(&repo).unwrap().pending.is_empty());
    }

    #[test]
    fn remove_then_add_becomes_modify() {
        let (_dir, repo) = setup();
        append_change(&repo, Change::remove("FOO")).unwrap();
        append_change(&repo, add("FOO", "v2")).unwrap();
        let pending = current(&repo).unwrap().pending;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, ChangeType::Modify);
        assert_eq!(pending[0].value, "v2");
    }

    #[test]
    fn add_then_modify_stays_add_with_latest_value() {
        let (_dir, repo) = setup();
        append_change(&repo, add("FOO", "v1")).unwrap();
        append_change(&repo, modify("FOO", "v2")).unwrap();
        let pending = current(&repo).unwrap().pending;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, ChangeType::Add);
        assert_eq!(pending[0].value, "v2");
    }

    #[test]
    fn modify_then_modify_keeps_latest() {
        let (_dir, repo) = setup();
        append_change(&repo, modify("FOO", "v1")).unwrap();
        append_change(&repo, modify("FOO", "v2")).unwrap();
        let pending = current(&repo).unwrap().pending;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].value, "v2");
    }

    #[test]
    fn modify_then_add_stays_modify_with_latest_value() {
        let (_dir, repo) = setup();
        append_change(&repo, modify("FOO", "v1")).unwrap();
        append_change(&repo, add("FOO", "v2")).unwrap();
        let pending = current(&repo).unwrap().pending;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, ChangeType::Modify);
        assert_eq!(pending[0].value, "v2");
    }

    #[test]
    fn at_most_one_entry_per_key_after_any_sequence() {
        let (_dir, repo) = setup();
        append_change(&repo, add("FOO", "v1")).unwrap();
        append_change(&repo, modify("FOO", "v2")).unwrap();
        append_change(&repo, Change::remove("FOO")).unwrap();
        append_change(&repo, add("FOO", "v3")).unwrap();
        let pending = current(&repo).unwrap().pending;
        assert_eq!(pending.iter().filter(|c| c.key == "FOO").count(), 1);
    }

    #[test]
    fn clear_empties_pending() {
        let (_dir, repo) = setup();
        append_change(&repo, add("FOO", "bar")).unwrap();
        clear(&repo).unwrap();
        assert!(current(&repo).unwrap().pending.is_empty());
    }

    #[test]
    fn append_without_current_env_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repo::at(dir.path());
        repo.init().unwrap();
        let err = append_change(&repo, add("FOO", "bar")).unwrap_err();
        assert!(matches!(err, Error::Repo(RepoError::CurrentEnvNotSet)));
    }
}
