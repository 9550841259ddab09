use std::io::Write as _;

use cellar_lib::commit;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

pub fn run(ui: &Ui, helper: &CommandHelper) -> CommandResult {
    let env = helper.current_environment()?;
    let head = commit::load_head(&helper.repo, &env)?;
    let commits = commit::list_commits(&helper.repo, &env)?;

    if commits.is_empty() {
        writeln!(ui.stdout(), "No commits yet").ok();
        return Ok(());
    }

    for c in &commits {
        let mut markers = Vec::new();
        if c.id == head.local_head {
            markers.push("HEAD");
        }
        if c.id == head.remote_head {
            markers.push("remote");
        }
        let suffix = if markers.is_empty() {
            String::new()
        } else {
            format!(" ({})", markers.join(", "))
        };
        writeln!(
            ui.stdout(),
            "{}{suffix}  {}  {}",
            c.id,
            c.timestamp.to_rfc3339(),
            c.message
        )
        .ok();
    }
    Ok(())
}
