use cellar_lib::crypt;
use cellar_lib::journal;
use cellar_lib::keystore::Keystore as _;
use cellar_lib::model::Project;
use cellar_lib::project;
use cellar_lib::repo::Repo;
use clap::Args;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

const DEFAULT_ENVIRONMENT: &str = "dev";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name. Defaults to the current directory's name.
    #[arg(long)]
    name: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    /// Default environment to create and select.
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    environment: String,
}

pub fn run(ui: &Ui, cwd: &std::path::Path, args: InitArgs) -> CommandResult {
    let repo = Repo::at(cwd);
    repo.init().map_err(cellar_lib::Error::from)?;

    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project")
            .to_string()
    });
    let project = Project::new(name, args.description, args.environment.clone());
    project::save(&repo, &project).map_err(cellar_lib::Error::from)?;

    let helper = CommandHelper::for_repo(repo.clone());
    let encoded_key = crypt::generate_key();
    helper
        .keystore
        .set_raw(&cellar_lib::keystore::project_key_entry(&project.id), &encoded_key)
        .map_err(cellar_lib::Error::from)?;

    repo.ensure_env_dir(&args.environment).map_err(cellar_lib::Error::from)?;
    journal::set_current_environment(&repo, &args.environment).map_err(cellar_lib::Error::from)?;

    ui.status(&format!(
        "Initialized project {:?} with environment {:?}",
        project.name, args.environment
    ));
    Ok(())
}
