//! File-backed key-value store with atomic writes
//!
//! Maps each store key to one file in a directory and writes via a temp file
//! plus rename, so a value is either completely written or not modified at
//! all. This is the desktop stand-in for the browser-local store the original
//! host application used.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{VaultError, VaultResult};

use super::KvStore;

/// A key-value store persisting each key as `<dir>/<key>.json`
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> VaultResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            VaultError::Storage(format!("Failed to create directory {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    /// Create a store in the platform's standard data directory
    pub fn open_default() -> VaultResult<Self> {
        let dirs = ProjectDirs::from("", "", "flowvault")
            .ok_or_else(|| VaultError::Config("Could not determine data directory".to_string()))?;
        Self::new(dirs.data_dir())
    }

    /// The directory this store persists into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> VaultResult<PathBuf> {
        // Store keys are namespace-generated identifiers, never paths
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains('.') {
            return Err(VaultError::Storage(format!("Invalid store key: {}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path).map_err(|e| {
            VaultError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let path = self.path_for(key)?;

        // Temp file in the same directory so the rename stays atomic
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path)
            .map_err(|e| VaultError::Storage(format!("Failed to create temp file: {}", e)))?;
        file.write_all(value.as_bytes())
            .map_err(|e| VaultError::Storage(format!("Failed to write data: {}", e)))?;
        file.sync_all()
            .map_err(|e| VaultError::Storage(format!("Failed to sync data: {}", e)))?;

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            VaultError::Storage(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
