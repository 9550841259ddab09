use clap::Args;
use clap::CommandFactory as _;
use clap_complete::Shell;
use clap_complete::generate;

use crate::cli_util::CommandResult;

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    shell: Shell,
}

pub fn run(args: CompletionsArgs) -> CommandResult {
    let mut command = crate::Cli::command();
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
