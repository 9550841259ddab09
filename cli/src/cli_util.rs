//! Command dispatch plumbing: error presentation, exit codes, and the
//! per-invocation context (repository handle, keystore, remote client) that
//! every command closure is handed instead of re-deriving it from `cwd`.

use std::path::PathBuf;

use cellar_lib::config;
use cellar_lib::error::Error as LibError;
use cellar_lib::keystore::RepoKeystore;
use cellar_lib::model::Project;
use cellar_lib::remote::RemoteClient;
use cellar_lib::repo::Repo;
use thiserror::Error;

use crate::ui::Ui;

/// A user-facing wrapper over every error a command can produce, carrying
/// the exit code the process should terminate with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Lib(#[from] LibError),
    #[error("{0}")]
    Cli(String),
    #[error(transparent)]
    Clap(#[from] clap::Error),
}

impl CommandError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Clap(e) if e.exit_code() == 0 => 0,
            _ => 1,
        }
    }
}

pub type CommandResult = Result<(), CommandError>;

/// Presents a `CommandError` to the user and returns the process exit code.
pub fn handle_command_result(ui: &Ui, result: CommandResult) -> u8 {
    match result {
        Ok(()) => 0,
        Err(CommandError::Clap(e)) => {
            let _ = e.print();
            e.exit_code().clamp(0, 255) as u8
        }
        Err(e) => {
            ui.error(&e.to_string());
            1
        }
    }
}

/// Bundles the repository handle and its ancillary services so commands
/// don't each re-derive them from an ambient working directory.
pub struct CommandHelper {
    pub repo: Repo,
    pub keystore: RepoKeystore,
    pub remote: RemoteClient,
}

impl CommandHelper {
    /// Binds to the repository discovered from `cwd` (or an ancestor).
    /// Commands that don't yet have a repository (`init`, `clone`) bind
    /// directly via `Repo::at` instead.
    pub fn discover(cwd: &PathBuf) -> Result<Self, CommandError> {
        let repo = Repo::discover(cwd).map_err(LibError::from)?;
        Ok(Self::for_repo(repo))
    }

    pub fn for_repo(repo: Repo) -> Self {
        let keystore = RepoKeystore::new(repo.clone());
        let remote_url = config::remote_url(&repo).unwrap_or_else(|_| cellar_lib::remote::DEFAULT_REMOTE_URL.to_string());
        let remote = RemoteClient::new(remote_url);
        Self { repo, keystore, remote }
    }

    pub fn require_project(&self) -> Result<Project, CommandError> {
        cellar_lib::project::load(&self.repo)?
            .ok_or_else(|| CommandError::Cli("repository has no project configuration".to_string()))
    }

    pub fn current_environment(&self) -> Result<String, CommandError> {
        Ok(cellar_lib::journal::require_current_environment(&self.repo)?)
    }
}
