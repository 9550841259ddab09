//! Persistence for the single [`Project`] record owned by a repository.

use crate::error::Error;
use crate::error::Result;
use crate::model::Project;
use crate::repo::Repo;
use crate::repo::read_json;
use crate::repo::write_json;

pub fn load(repo: &Repo) -> Result<Option<Project>> {
    let value: Option<Project> = read_json(&repo.project_file()).map_err(Error::from)?;
    Ok(value)
}

pub fn save(repo: &Repo, project: &Project) -> Result<()> {
    write_json(&repo.project_file(), project).map_err(Error::from)
}
