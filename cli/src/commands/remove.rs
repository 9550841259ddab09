use cellar_lib::journal;
use cellar_lib::model::Change;
use cellar_lib::secrets;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    key: String,
}

pub fn run(ui: &Ui, helper: &CommandHelper, args: RemoveArgs) -> CommandResult {
    let env = helper.current_environment()?;
    secrets::remove_secret(&helper.repo, &env, &args.key)?;
    journal::append_change(&helper.repo, Change::remove(&args.key))?;
    ui.status(&format!("Removed {:?}", args.key));
    Ok(())
}
