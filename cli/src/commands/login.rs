use cellar_lib::auth;
use cellar_lib::auth::AuthListener;
use cellar_lib::auth::DEFAULT_LOGIN_REDIRECT_URL;

use crate::cli_util::CommandHelper;
use crate::cli_util::CommandResult;
use crate::ui::Ui;

pub fn run(ui: &Ui, helper: &CommandHelper) -> CommandResult {
    let listener = AuthListener::bind()?;
    let port = listener.port()?;
    let login_url = format!("{DEFAULT_LOGIN_REDIRECT_URL}?callback_port={port}");

    ui.status(&format!("Opening {login_url} in your browser..."));
    if open_in_browser(&login_url).is_err() {
        ui.hint(&format!("Could not open a browser automatically. Visit {login_url} manually."));
    }

    let callback = listener.wait_for_callback()?;
    auth::persist_callback(&helper.keystore, &callback)?;
    ui.status("Logged in successfully");
    Ok(())
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).status()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).status()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd").args(["/C", "start", url]).status()?;
    }
    Ok(())
}
