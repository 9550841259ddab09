use cellar_lib::crypt;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(trailing_var_arg = true, required = true)]
    command: Vec<String>,
}

pub fn run(_ui: &Ui, helper: &CommandHelper, args: RunArgs) -> CommandResult {
    let project = helper.require_project()?;
    let env = helper.current_environment()?;
    let secrets = crypt::load_secrets(&helper.repo, &helper.keystore, &project.id, &env)?;

    let (program, rest) = args
        .command
        .split_first()
        .expect("clap enforces at least one argument");

    let status = std::process::Command::new(program)
        .args(rest)
        .envs(secrets)
        .status()
        .map_err(|e| crate::cli_util::CommandError::Cli(format!("failed to spawn {program:?}: {e}")))?;

    std::process::exit(status.code().unwrap_or(1));
}
