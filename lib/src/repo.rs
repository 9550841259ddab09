//! Repository layout: owns on-disk paths and atomic JSON reads/writes.
//!
//! Everything else in this crate takes a `&Repo` rather than reaching for an
//! ambient working directory, so the repository root is an explicit value
//! instead of a hidden global.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::RepoError;
use crate::file_util::IoResultExt as _;
use crate::file_util::create_private_dir_all;
use crate::file_util::write_file_atomic;

pub const DIR_NAME: &str = ".cellar";

/// A handle onto one repository's on-disk tree, rooted at `<working_dir>/.cellar`.
#[derive(Debug, Clone)]
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// Binds a handle to `working_dir/.cellar` without requiring it to exist.
    pub fn at(working_dir: impl AsRef<Path>) -> Self {
        Self {
            root: working_dir.as_ref().join(DIR_NAME),
        }
    }

    /// Finds an existing repository by walking up from `start` the way `.git`
    /// discovery does, erroring with [`RepoError::NotFound`] if none is found.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let candidate = dir.join(DIR_NAME);
            if candidate.is_dir() {
                return Ok(Self { root: candidate });
            }
            if !dir.pop() {
                return Err(RepoError::NotFound(start.as_ref().to_path_buf()));
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Creates the repository skeleton. Fails if `.cellar` already exists and
    /// is non-empty.
    pub fn init(&self) -> Result<(), RepoError> {
        if self.root.is_dir() {
            let non_empty = fs::read_dir(&self.root).context(&self.root)?.next().is_some();
            if non_empty {
                return Err(RepoError::AlreadyInitialized(self.root.clone()));
            }
        }
        create_private_dir_all(&self.root).context(&self.root)?;
        create_private_dir_all(&self.keystore_dir()).context(self.keystore_dir())?;
        create_private_dir_all(&self.envs_dir()).context(self.envs_dir())?;
        Ok(())
    }

    pub fn project_file(&self) -> PathBuf {
        self.root.join("pro")
    }

    pub fn current_env_file(&self) -> PathBuf {
        self.root.join("current")
    }

    pub fn fallback_key_file(&self) -> PathBuf {
        self.root.join("keys").join("enc.key")
    }

    pub fn keystore_dir(&self) -> PathBuf {
        self.root.join("keystore")
    }

    pub fn keystore_entry_file(&self, name: &str) -> PathBuf {
        self.keystore_dir().join(format!("{name}.json"))
    }

    pub fn envs_dir(&self) -> PathBuf {
        self.root.join("envs")
    }

    pub fn env_dir(&self, env: &str) -> PathBuf {
        self.envs_dir().join(env)
    }

    pub fn secrets_file(&self, env: &str) -> PathBuf {
        self.env_dir(env).join("sec")
    }

    pub fn commits_file(&self, env: &str) -> PathBuf {
        self.env_dir(env).join("commits")
    }

    pub fn head_file(&self, env: &str) -> PathBuf {
        self.env_dir(env).join("HEAD")
    }

    pub fn ensure_env_dir(&self, env: &str) -> Result<(), RepoError> {
        create_private_dir_all(&self.env_dir(env)).context(self.env_dir(env))?;
        Ok(())
    }

    pub fn list_env_names(&self) -> Result<Vec<String>, RepoError> {
        if !self.envs_dir().is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(self.envs_dir()).context(self.envs_dir())? {
            let entry = entry.context(self.envs_dir())?;
            if entry.file_type().context(entry.path())?.is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Reads a JSON document from `path`, returning `T::default()` when the file
/// is missing or empty. A present-but-malformed file is a fatal error.
pub fn read_json<T: Default + DeserializeOwned>(path: &Path) -> Result<T, RepoError> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(T::default()),
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                .context(path)?;
            Ok(value)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e).context(path)?,
    }
}

/// Writes `value` to `path` as two-space-indented JSON, via write-to-temp-
/// and-rename, creating the parent directory if needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), RepoError> {
    if let Some(parent) = path.parent() {
        create_private_dir_all(parent).context(parent)?;
    }
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(
        &mut buf,
        serde_json::ser::PrettyFormatter::with_indent(b"  "),
    );
    serde::Serialize::serialize(value, &mut serializer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        .context(path)?;
    write_file_atomic(path, &buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn read_json_missing_file_is_zero_value() {
        let dir = tempfile::tempdir().unwrap();
        let value: BTreeMap<String, String> =
            read_json(&dir.path().join("missing")).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn write_then_read_json_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1i32);
        write_json(&path, &value).unwrap();
        let read_back: BTreeMap<String, i32> = read_json(&path).unwrap();
        assert_eq!(read_back, value);
    }

    #[test]
    fn init_twice_on_nonempty_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repo::at(dir.path());
        repo.init().unwrap();
        let err = repo.init().unwrap_err();
        assert!(matches!(err, RepoError::AlreadyInitialized(_)));
    }

    #[test]
    fn discover_walks_up_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repo::at(dir.path());
        repo.init().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let found = Repo::discover(&nested).unwrap();
        assert_eq!(found.root(), repo.root());
    }
}
