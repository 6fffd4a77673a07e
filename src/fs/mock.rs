// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory filesystem for tests.
///
/// Clones share the same backing map, so a test can keep a handle and
/// inspect what a store wrote. Writes can be made to fail to simulate a
/// worn-out or unpowered storage medium.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.files()
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files().get(path.as_ref()).cloned()
    }

    /// Make every subsequent `write` and `rename` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        let mut guard = self
            .fail_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = fail;
    }

    fn writes_failing(&self) -> bool {
        *self
            .fail_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if self.writes_failing() {
            return Err(anyhow!("Write failed: {:?}", path));
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if self.writes_failing() {
            return Err(anyhow!("Rename failed: {:?}", from));
        }
        let mut files = self.files();
        let content = files
            .remove(from)
            .ok_or_else(|| anyhow!("File not found: {:?}", from))?;
        files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files().contains_key(path)
    }
}
