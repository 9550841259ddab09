use std::io::Write as _;

use cellar_lib::crypt;
use cellar_lib::export;
use cellar_lib::export::ExportFormat;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long, default_value = "env")]
    format: String,
}

pub fn run(ui: &Ui, helper: &CommandHelper, args: ExportArgs) -> CommandResult {
    let format = ExportFormat::parse(&args.format)?;
    let project = helper.require_project()?;
    let env = helper.current_environment()?;

    let secrets = crypt::load_secrets(&helper.repo, &helper.keystore, &project.id, &env)?;
    let rendered = export::render(format, &project.name, &env, &secrets)?;
    write!(ui.stdout(), "{rendered}").ok();
    Ok(())
}
