//! Local directory store

use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::ObjectStore;
use crate::error::{BackendError, Result};

/// Objects stored as files below a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an object path to a file, refusing anything that leaves the root
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Err(BackendError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(BackendError::InvalidPath {
                path: path.to_string(),
                reason: "path must stay inside the state directory".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FileStore {
    fn get_object(&self, path: &str, version: Option<&str>) -> Result<Vec<u8>> {
        if let Some(version) = version {
            warn!(path = %path, version = %version, "file store has no versions, reading latest");
        }

        let file = self.resolve(path)?;
        debug!(file = %file.display(), "reading state object");
        std::fs::read(&file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BackendError::ObjectNotFound {
                path: path.to_string(),
            },
            _ => BackendError::Io(e),
        })
    }
}
