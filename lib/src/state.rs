//! Deterministic replay of a commit chain into the secret map it implies.

use std::collections::BTreeMap;

use crate::commit::build_chain;
use crate::error::Result;
use crate::model::Change;
use crate::model::ChangeType;
use crate::model::Secret;
use crate::repo::Repo;

/// Replays the chain ending at `up_to_commit_id` and returns the resulting
/// `key -> Secret` map. Pure over the commit log: used both for local reads
/// and to produce the "final state" pushed to a remote, so the remote sees
/// exactly what a fresh local replay would produce.
pub fn compute_state(repo: &Repo, env: &str, up_to_commit_id: &str) -> Result<BTreeMap<String, Secret>> {
    if up_to_commit_id.is_empty() {
        return Ok(BTreeMap::new());
    }
    let chain = build_chain(repo, env, up_to_commit_id)?;
    let mut state = BTreeMap::new();
    for commit in &chain {
        for change in &commit.changes {
            apply_change(&mut state, change);
        }
    }
    Ok(state)
}

fn apply_change(state: &mut BTreeMap<String, Secret>, change: &Change) {
    match change.kind {
        ChangeType::Add | ChangeType::Modify => {
            let now = chrono::Utc::now();
            state.insert(
                change.key.clone(),
                Secret {
                    key: change.key.clone(),
                    value: change.value.clone(),
                    nonce: change.nonce.clone(),
                    no_secret: change.no_secret,
                    created_at: now,
                    updated_at: now,
                    project_id: None,
                    environment_name: None,
                },
            );
        }
        ChangeType::Remove => {
            state.remove(&change.key);
        }
    }
}
