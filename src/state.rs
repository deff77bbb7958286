//! Local state store for the host CLI.
//!
//! One JSON document per object at `<root>/<type>/<url-encoded name>.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("could not determine a local data directory; pass --state-dir")]
    NoLocation,

    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `dir` when given, otherwise the platform data directory.
    pub fn open(dir: Option<PathBuf>) -> Result<Self, StateError> {
        let root = match dir {
            Some(dir) => dir,
            None => dirs::data_local_dir()
                .ok_or(StateError::NoLocation)?
                .join("pdconf")
                .join("state"),
        };
        tracing::debug!(root = %root.display(), "using state directory");
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, type_name: &str, name: &str) -> PathBuf {
        self.root
            .join(type_name)
            .join(format!("{}.json", urlencoding::encode(name)))
    }

    pub fn load(&self, type_name: &str, name: &str) -> Result<Option<Value>, StateError> {
        let path = self.path(type_name, name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StateError::Io { path, source }),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StateError::Json { path, source })
    }

    pub fn save(&self, type_name: &str, name: &str, state: &Value) -> Result<PathBuf, StateError> {
        let path = self.path(type_name, name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(state).map_err(|source| StateError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, contents).map_err(|source| StateError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved state");
        Ok(path)
    }

    /// Returns whether a state file existed.
    pub fn remove(&self, type_name: &str, name: &str) -> Result<bool, StateError> {
        let path = self.path(type_name, name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StateError::Io { path, source }),
        }
    }
}
