use cellar_lib::journal;
use cellar_lib::model::Change;
use cellar_lib::model::ChangeType;
use cellar_lib::secrets;
use cellar_lib::secrets::StoreEffect;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct SetArgs {
    key: String,
    value: String,
    #[arg(long = "no-secret")]
    no_secret: bool,
}

pub fn run(ui: &Ui, helper: &CommandHelper, args: SetArgs) -> CommandResult {
    let project = helper.require_project()?;
    let env = helper.current_environment()?;

    let (secret, effect) = secrets::set_secret(
        &helper.repo,
        &helper.keystore,
        &project.id,
        &env,
        &args.key,
        &args.value,
        args.no_secret,
    )?;

    let kind = match effect {
        StoreEffect::Add => ChangeType::Add,
        StoreEffect::Modify => ChangeType::Modify,
    };
    journal::append_change(
        &helper.repo,
        Change {
            kind,
            key: secret.key.clone(),
            value: secret.value,
            nonce: secret.nonce,
            no_secret: secret.no_secret,
        },
    )?;

    ui.status(&format!("Set {:?}", args.key));
    Ok(())
}
