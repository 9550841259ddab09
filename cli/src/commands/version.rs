use std::io::Write as _;

use crate::cli_util::CommandResult;
use crate::ui::Ui;

pub fn run(ui: &Ui) -> CommandResult {
    writeln!(ui.stdout(), "cellar {}", env!("CARGO_PKG_VERSION")).ok();
    Ok(())
}
