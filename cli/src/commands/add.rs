use cellar_lib::journal;
use cellar_lib::model::Change;
use cellar_lib::model::ChangeType;
use cellar_lib::secrets;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct AddArgs {
    key: String,
    value: String,
    /// Store the value in plaintext instead of encrypting it.
    #[arg(long = "no-secret")]
    no_secret: bool,
}

pub fn run(ui: &Ui, helper: &CommandHelper, args: AddArgs) -> CommandResult {
    let project = helper.require_project()?;
    let env = helper.current_environment()?;

    let secret = secrets::add_secret(
        &helper.repo,
        &helper.keystore,
        &project.id,
        &env,
        &args.key,
        &args.value,
        args.no_secret,
    )?;

    journal::append_change(
        &helper.repo,
        Change {
            kind: ChangeType::Add,
            key: secret.key.clone(),
            value: secret.value,
            nonce: secret.nonce,
            no_secret: secret.no_secret,
        },
    )?;

    ui.status(&format!("Added {:?}", args.key));
    Ok(())
}
