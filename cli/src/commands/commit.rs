use cellar_lib::commit;
use cellar_lib::journal;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct CommitArgs {
    #[arg(short = 'm', long = "message")]
    message: String,
}

pub fn run(ui: &Ui, helper: &CommandHelper, args: CommitArgs) -> CommandResult {
    let env = helper.current_environment()?;
    let current = journal::current(&helper.repo)?;
    if current.pending.is_empty() {
        ui.status("No pending changes to commit");
        return Ok(());
    }

    let author = whoami::username();
    let created = commit::add_commit(
        &helper.repo,
        &env,
        None,
        args.message,
        author,
        current.pending,
        chrono::Utc::now(),
    )?;
    journal::clear(&helper.repo)?;

    ui.status(&format!("Committed {}", created.id));
    Ok(())
}
