//! Append-only per-environment commit log, parent chaining, and HEAD.

use chrono::DateTime;
use chrono::Utc;
use sha1::Digest as _;
use sha1::Sha1;

use crate::error::CommitError;
use crate::error::Error;
use crate::error::Result;
use crate::model::Change;
use crate::model::Commit;
use crate::model::Head;
use crate::repo::Repo;
use crate::repo::read_json;
use crate::repo::write_json;

/// First 12 hex digits of `SHA-1(message + "-" + author + "-" +
/// unix_seconds(timestamp))`. Not collision-resistant and does not bind the
/// change set; kept for wire compatibility with remotes that compute ids the
/// same way. Collisions are detected at append time instead.
pub fn compute_id(message: &str, author: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{message}-{author}-{}", timestamp.timestamp());
    let digest = Sha1::digest(input.as_bytes());
    let hex = hex_encode(&digest);
    hex[..12].to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(s, "{b:02x}").unwrap();
    }
    s
}

fn load_commits(repo: &Repo, env: &str) -> Result<Vec<Commit>> {
    read_json(&repo.commits_file(env)).map_err(Error::from)
}

fn save_commits(repo: &Repo, env: &str, commits: &[Commit]) -> Result<()> {
    write_json(&repo.commits_file(env), &commits.to_vec()).map_err(Error::from)
}

pub fn load_head(repo: &Repo, env: &str) -> Result<Head> {
    read_json(&repo.head_file(env)).map_err(Error::from)
}

fn save_head(repo: &Repo, env: &str, head: &Head) -> Result<()> {
    write_json(&repo.head_file(env), head).map_err(Error::from)
}

/// Appends a new commit to `env`'s log and advances `localHead`.
///
/// When `id` is supplied (clone import), it is used verbatim instead of
/// being recomputed, so that imported history keeps the remote's ids.
#[expect(clippy::too_many_arguments)]
pub fn add_commit(
    repo: &Repo,
    env: &str,
    id: Option<String>,
    message: String,
    author: String,
    changes: Vec<Change>,
    timestamp: DateTime<Utc>,
) -> Result<Commit> {
    let mut commits = load_commits(repo, env)?;
    let mut head = load_head(repo, env)?;
    recover_stale_head(&commits, &mut head);

    let id = id.unwrap_or_else(|| compute_id(&message, &author, timestamp));
    if let Some(existing) = commits.iter().find(|c| c.id == id)
        && (existing.message != message || existing.author != author || existing.changes != changes)
    {
        return Err(CommitError::IdCollision(id).into());
    }

    let commit = Commit {
        id: id.clone(),
        message,
        author,
        timestamp,
        parent_id: head.local_head.clone(),
        changes,
    };
    commits.push(commit.clone());
    save_commits(repo, env, &commits)?;
    head.local_head = commit.id.clone();
    save_head(repo, env, &head)?;
    Ok(commit)
}

/// If a crash previously left `localHead` stale after the commit file was
/// already appended, advance it to the last commit on disk (§4.6 recovery).
fn recover_stale_head(commits: &[Commit], head: &mut Head) {
    if let Some(last) = commits.last()
        && last.id != head.local_head
    {
        head.local_head = last.id.clone();
    }
}

/// All commits for `env`, sorted newest-first by timestamp.
pub fn list_commits(repo: &Repo, env: &str) -> Result<Vec<Commit>> {
    let mut commits = load_commits(repo, env)?;
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(commits)
}

/// Reconstructs the chain ending at `up_to`, oldest-first, by following
/// `parentId` backward from `up_to` and prepending each commit found.
pub fn build_chain(repo: &Repo, env: &str, up_to: &str) -> Result<Vec<Commit>> {
    let commits = load_commits(repo, env)?;
    let by_id: std::collections::HashMap<&str, &Commit> =
        commits.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut chain = Vec::new();
    let mut cursor = up_to.to_string();
    while !cursor.is_empty() {
        let commit = by_id
            .get(cursor.as_str())
            .ok_or_else(|| CommitError::NotFound(cursor.clone()))?;
        chain.push((*commit).clone());
        cursor = commit.parent_id.clone();
    }
    chain.reverse();
    Ok(chain)
}

/// Commits made locally since `remoteHead`, in chronological order.
///
/// If `remoteHead` is empty, returns every commit newest-first, per
/// `listCommits` semantics. If `remoteHead` does not resolve to a local
/// commit, returns every commit in chronological order (the caller treats
/// this as "remote unknown to us").
pub fn commits_since_remote_head(repo: &Repo, env: &str) -> Result<Vec<Commit>> {
    let head = load_head(repo, env)?;
    let mut commits = load_commits(repo, env)?;
    commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    if head.remote_head.is_empty() {
        commits.reverse();
        return Ok(commits);
    }
    match commits.iter().position(|c| c.id == head.remote_head) {
        Some(idx) => Ok(commits[idx + 1..].to_vec()),
        None => Ok(commits),
    }
}

/// Advances `remoteHead` to `commit_id` after a successful push.
pub fn update_remote_head(repo: &Repo, env: &str, commit_id: &str) -> Result<()> {
    let mut head = load_head(repo, env)?;
    head.remote_head = commit_id.to_string();
    save_head(repo, env, &head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeType;

    fn setup() -> (tempfile::TempDir, Repo) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repo::at(dir.path());
        repo.init().unwrap();
        repo.ensure_env_dir("dev").unwrap();
        (dir, repo)
    }

    fn change(key: &str) -> Change {
        Change {
            kind: ChangeType::Add,
            key: key.to_string(),
            value: "v".to_string(),
            nonce: String::new(),
            no_secret: false,
        }
    }

    fn at(offset_secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap()
    }

    #[test]
    fn add_commit_chains_parent_and_advances_head() {
        let (_dir, repo) = setup();
        let c1 = add_commit(&repo, "dev", None, "first".into(), "a".into(), vec![change("A")], at(0)).unwrap();
        assert_eq!(c1.parent_id, "");
        let c2 = add_commit(&repo, "dev", None, "second".into(), "a".into(), vec![change("B")], at(1)).unwrap();
        assert_eq!(c2.parent_id, c1.id);
        assert_eq!(load_head(&repo, "dev").unwrap().local_head, c2.id);
    }

    #[test]
    fn list_commits_is_newest_first() {
        let (_dir, repo) = setup();
        let c1 = add_commit(&repo, "dev", None, "first".into(), "a".into(), vec![change("A")], at(0)).unwrap();
        let c2 = add_commit(&repo, "dev", None, "second".into(), "a".into(), vec![change("B")], at(1)).unwrap();
        let listed = list_commits(&repo, "dev").unwrap();
        assert_eq!(listed[0].id, c2.id);
        assert_eq!(listed[1].id, c1.id);
    }

    #[test]
    fn build_chain_is_oldest_first() {
        let (_dir, repo) = setup();
        let c1 = add_commit(&repo, "dev", None, "first".into(), "a".into(), vec![change("A")], at(0)).unwrap();
        let c2 = add_commit(&repo, "dev", None, "second".into(), "a".into(), vec![change("B")], at(1)).unwrap();
        let chain = build_chain(&repo, "dev", &c2.id).unwrap();
        assert_eq!(chain.iter().map(|c| c.id.clone()).collect::<Vec<_>>(), vec![c1.id, c2.id]);
    }

    #[test]
    fn build_chain_dangling_parent_fails() {
        let (_dir, repo) = setup();
        let err = build_chain(&repo, "dev", "deadbeefcafe").unwrap_err();
        assert!(matches!(err, Error::Commit(CommitError::NotFound(_))));
    }

    #[test]
    fn commits_since_remote_head_is_chronological_and_exclusive() {
        let (_dir, repo) = setup();
        let c1 = add_commit(&repo, "dev", None, "c1".into(), "a".into(), vec![change("A")], at(0)).unwrap();
        let c2 = add_commit(&repo, "dev", None, "c2".into(), "a".into(), vec![change("B")], at(1)).unwrap();
        let c3 = add_commit(&repo, "dev", None, "c3".into(), "a".into(), vec![change("C")], at(2)).unwrap();
        let c4 = add_commit(&repo, "dev", None, "c4".into(), "a".into(), vec![change("D")], at(3)).unwrap();
        update_remote_head(&repo, "dev", &c2.id).unwrap();
        let since = commits_since_remote_head(&repo, "dev").unwrap();
        assert_eq!(since.iter().map(|c| c.id.clone()).collect::<Vec<_>>(), vec![c3.id, c4.id]);
        let _ = c1;
    }

    #[test]
    fn commits_since_remote_head_empty_returns_all() {
        let (_dir, repo) = setup();
        add_commit(&repo, "dev", None, "c1".into(), "a".into(), vec![change("A")], at(0)).unwrap();
        add_commit(&repo, "dev", None, "c2".into(), "a".into(), vec![change("B")], at(1)).unwrap();
        let since = commits_since_remote_head(&repo, "dev").unwrap();
        assert_eq!(since.len(), 2);
        assert_eq!(since[0].message, "c2");
        assert_eq!(since[1].message, "c1");
    }

    #[test]
    fn unresolvable_remote_head_returns_all() {
        let (_dir, repo) = setup();
        add_commit(&repo, "dev", None, "c1".into(), "a".into(), vec![change("A")], at(0)).unwrap();
        update_remote_head(&repo, "dev", "unknown000000").unwrap();
        let since = commits_since_remote_head(&repo, "dev").unwrap();
        assert_eq!(since.len(), 1);
    }
}
