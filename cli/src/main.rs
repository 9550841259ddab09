mod cli_util;
mod commands;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use cli_util::CommandHelper;
use cli_util::CommandResult;
use cli_util::handle_command_result;
use tracing_subscriber::EnvFilter;
use ui::Ui;

#[derive(Debug, Parser)]
#[command(name = "cellar", version, about = "A local, Git-shaped version control system for secrets")]
pub struct Cli {
    /// Suppress non-essential status output.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new repository in the current directory.
    Init(commands::init::InitArgs),
    /// Manage environments.
    Env(commands::env::EnvArgs),
    /// Add a secret (fails if it already exists).
    Add(commands::add::AddArgs),
    /// Set a secret, creating or overwriting it.
    Set(commands::set::SetArgs),
    /// Remove an existing secret.
    Remove(commands::remove::RemoveArgs),
    /// Show the pending change journal.
    Status,
    /// Commit the pending change journal.
    Commit(commands::commit::CommitArgs),
    /// List commit history for the current environment.
    Log,
    /// Export the live secret set.
    Export(commands::export::ExportArgs),
    /// Run a subprocess with decrypted secrets merged into its environment.
    Run(commands::run::RunArgs),
    /// Authenticate via the browser.
    Login,
    /// Push commits since the last push and the resulting final state.
    Push,
    /// Clone a remote project into the current directory.
    Clone(commands::clone::CloneArgs),
    /// Print the CLI's identity string.
    Version,
    /// Generate shell completion scripts.
    Completions(commands::completions::CompletionsArgs),
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let ui = Ui::new(cli.quiet);
    let result = dispatch(&ui, cli.command);
    std::process::exit(handle_command_result(&ui, result) as i32);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn dispatch(ui: &Ui, command: Command) -> CommandResult {
    let cwd = std::env::current_dir().map_err(|e| cli_util::CommandError::Cli(e.to_string()))?;

    match command {
        Command::Init(args) => commands::init::run(ui, &cwd, args),
        Command::Clone(args) => commands::clone::run(ui, &cwd, args),
        Command::Version => commands::version::run(ui),
        Command::Completions(args) => commands::completions::run(args),
        other => dispatch_in_repo(ui, &cwd, other),
    }
}

fn dispatch_in_repo(ui: &Ui, cwd: &PathBuf, command: Command) -> CommandResult {
    let helper = CommandHelper::discover(cwd)?;
    match command {
        Command::Env(args) => commands::env::run(ui, &helper, args),
        Command::Add(args) => commands::add::run(ui, &helper, args),
        Command::Set(args) => commands::set::run(ui, &helper, args),
        Command::Remove(args) => commands::remove::run(ui, &helper, args),
        Command::Status => commands::status::run(ui, &helper),
        Command::Commit(args) => commands::commit::run(ui, &helper, args),
        Command::Log => commands::log::run(ui, &helper),
        Command::Export(args) => commands::export::run(ui, &helper, args),
        Command::Run(args) => commands::run::run(ui, &helper, args),
        Command::Login => commands::login::run(ui, &helper),
        Command::Push => commands::push::run(ui, &helper),
        Command::Init(_) | Command::Clone(_) | Command::Version | Command::Completions(_) => {
            unreachable!("handled in dispatch")
        }
    }
}
