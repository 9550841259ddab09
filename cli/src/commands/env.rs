use std::io::Write as _;

use cellar_lib::journal;
use clap::Args;
use clap::Subcommand;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    command: EnvCommand,
}

#[derive(Debug, Subcommand)]
enum EnvCommand {
    /// List all environments in this project.
    List,
    /// Create a new environment.
    New { name: String },
    /// Switch the active environment.
    Use { name: String },
    /// Delete an environment and its history.
    Remove { name: String },
}

pub fn run(ui: &Ui, helper: &CommandHelper, args: EnvArgs) -> CommandResult {
    match args.command {
        EnvCommand::List => {
            let names = helper.repo.list_env_names().map_err(cellar_lib::Error::from)?;
            let current = journal::current(&helper.repo).map_err(cellar_lib::Error::from)?.environment;
            for name in names {
                let marker = if name == current { "* " } else { "  " };
                writeln!(ui.stdout(), "{marker}{name}").ok();
            }
        }
        EnvCommand::New { name } => {
            helper.repo.ensure_env_dir(&name).map_err(cellar_lib::Error::from)?;
            ui.status(&format!("Created environment {name:?}"));
        }
        EnvCommand::Use { name } => {
            if !helper.repo.env_dir(&name).is_dir() {
                return Err(cellar_lib::Error::from(cellar_lib::error::RepoError::EnvNotFound(name)).into());
            }
            journal::set_current_environment(&helper.repo, &name).map_err(cellar_lib::Error::from)?;
            ui.status(&format!("Switched to environment {name:?}"));
        }
        EnvCommand::Remove { name } => {
            if !helper.repo.env_dir(&name).is_dir() {
                return Err(cellar_lib::Error::from(cellar_lib::error::RepoError::EnvNotFound(name)).into());
            }
            std::fs::remove_dir_all(helper.repo.env_dir(&name))
                .map_err(|e| crate::cli_util::CommandError::Cli(e.to_string()))?;
            ui.status(&format!("Removed environment {name:?}"));
        }
    }
    Ok(())
}
