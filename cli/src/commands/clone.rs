use cellar_lib::config;
use cellar_lib::keystore::RepoKeystore;
use cellar_lib::remote;
use cellar_lib::remote::RemoteClient;
use cellar_lib::repo::Repo;
use clap::Args;

use crate::cli_util::CommandResult;
use crate::ui::Ui;

#[derive(Debug, Args)]
pub struct CloneArgs {
    slug: String,
}

pub fn run(ui: &Ui, cwd: &std::path::Path, args: CloneArgs) -> CommandResult {
    let repo = Repo::at(cwd);
    let keystore = RepoKeystore::new(repo.clone());
    let remote_url = config::remote_url(&repo).unwrap_or_else(|_| cellar_lib::remote::DEFAULT_REMOTE_URL.to_string());
    let client = RemoteClient::new(remote_url);

    let project = remote::clone_project(&repo, &keystore, &client, &args.slug)?;
    ui.status(&format!("Cloned project {:?}", project.name));
    Ok(())
}
