//! File-backed key-value store
//!
//! Each key is stored as its own file in an XDG-compliant data directory
//! (`~/.local/share/quotd/` on Linux).

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Stores each key as a file under a single directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where values are stored
    dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore using the XDG-compliant data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "quotd")?;
        Some(Self::with_dir(project_dirs.data_dir().to_path_buf()))
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory this store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the file holding `key`
    ///
    /// Keys are used verbatim as file names, so anything that could escape
    /// the directory is rejected.
    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key).ok()?;
        fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
