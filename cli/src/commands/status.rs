use std::io::Write as _;

use cellar_lib::journal;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

pub fn run(ui: &Ui, helper: &CommandHelper) -> CommandResult {
    let current = journal::current(&helper.repo)?;
    if current.pending.is_empty() {
        writeln!(ui.stdout(), "No pending changes").ok();
        return Ok(());
    }
    writeln!(ui.stdout(), "Pending changes in environment {:?}:", current.environment).ok();
    for change in &current.pending {
        let verb = match change.kind {
            cellar_lib::model::ChangeType::Add => "add",
            cellar_lib::model::ChangeType::Modify => "modify",
            cellar_lib::model::ChangeType::Remove => "remove",
        };
        writeln!(ui.stdout(), "  {verb} {}", change.key).ok();
    }
    Ok(())
}
