// src/storage/file.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use super::{copy_into, StateStore, StorageError};
use crate::fs::{FileSystem, RealFileSystem};

/// Default location of the state file, relative to the working directory.
pub const STATE_FILE_PATH: &str = ".powertask/state";

/// Stores the record in a single file.
///
/// Writes go to `<path>.tmp` first and are then renamed over `<path>`, so an
/// interrupted save leaves the previous record in place.
#[derive(Debug, Clone)]
pub struct FileStore<F: FileSystem = RealFileSystem> {
    fs: F,
    path: PathBuf,
}

impl FileStore<RealFileSystem> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(RealFileSystem, path)
    }
}

impl<F: FileSystem> FileStore<F> {
    pub fn with_fs(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Delete the stored record, if any. The next load reports
    /// [`StorageError::Empty`].
    pub fn clear(&mut self) -> Result<(), StorageError> {
        if self.fs.exists(&self.path) {
            self.fs.remove_file(&self.path)?;
            info!(path = ?self.path, "removed scheduler state file");
        }
        Ok(())
    }
}

impl<F: FileSystem> StateStore for FileStore<F> {
    fn save(&mut self, data: &[u8]) -> Result<(), StorageError> {
        let tmp = self.tmp_path();
        self.fs
            .write(&tmp, data)
            .with_context(|| format!("writing state to {:?}", tmp))?;
        self.fs
            .rename(&tmp, &self.path)
            .with_context(|| format!("replacing state file {:?}", self.path))?;
        debug!(path = ?self.path, bytes = data.len(), "stored scheduler state (file)");
        Ok(())
    }

    fn load(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        if !self.fs.exists(&self.path) {
            return Err(StorageError::Empty);
        }
        let stored = self.fs.read(&self.path)?;
        copy_into(&stored, buf)
    }
}
