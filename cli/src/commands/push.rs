use cellar_lib::remote;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

pub fn run(ui: &Ui, helper: &CommandHelper) -> CommandResult {
    let project = helper.require_project()?;
    let env = helper.current_environment()?;

    match remote::push(&helper.repo, &helper.keystore, &helper.remote, &project, &env)? {
        None => ui.status("No new commits to push"),
        Some(outcome) if outcome.is_first_push => {
            ui.status(&format!("Created and pushed project {:?}", project.name));
        }
        Some(outcome) => {
            ui.status(&format!("Pushed {} new commit(s)", outcome.commits_pushed));
            if !outcome.message.is_empty() {
                ui.hint(&outcome.message);
            }
        }
    }
    Ok(())
}
