//! Layered configuration: `CELLAR_REMOTE_URL` env var overrides
//! `.cellar/config.toml`, which overrides the built-in default. A
//! deliberately small subset of the layered-resolution idea (no templates,
//! no aliases, no per-key provenance) — this engine only has a handful of
//! knobs, not a user-scriptable config language.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Error;
use crate::error::InputError;
use crate::error::Result;
use crate::remote::DEFAULT_REMOTE_URL;
use crate::repo::Repo;

const CONFIG_FILE_NAME: &str = "config.toml";
const REMOTE_URL_ENV: &str = "CELLAR_REMOTE_URL";

/// On-disk shape of `.cellar/config.toml`. Every field is optional: an
/// absent or missing file falls through to the next layer.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    remote: RemoteSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RemoteSection {
    url: Option<String>,
}

fn config_file_path(repo: &Repo) -> PathBuf {
    repo.root().join(CONFIG_FILE_NAME)
}

fn load_config_file(repo: &Repo) -> Result<ConfigFile> {
    let path = config_file_path(repo);
    match fs::read_to_string(&path) {
        Ok(contents) => toml::from_str(&contents)
            .map_err(|e| Error::Input(InputError::Usage(format!("{}: {e}", path.display())))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(InputError::Usage(format!("{}: {e}", path.display())).into()),
    }
}

/// Resolves the remote base URL: `CELLAR_REMOTE_URL` env var, then
/// `[remote] url` in `.cellar/config.toml`, then the built-in default.
pub fn remote_url(repo: &Repo) -> Result<String> {
    if let Ok(url) = std::env::var(REMOTE_URL_ENV)
        && !url.is_empty()
    {
        return Ok(url);
    }
    let config = load_config_file(repo)?;
    Ok(config.remote.url.unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string()))
}
