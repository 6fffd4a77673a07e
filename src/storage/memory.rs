// src/storage/memory.rs

use tracing::debug;

use super::{copy_into, StateStore, StorageError};

/// Stores the record in memory only (lost when the process exits).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Vec<u8>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// A store that already holds `data`, as if written by an earlier boot.
    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn contents(&self) -> &[u8] {
        &self.data
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.data.clear();
        self.data.extend_from_slice(data);
        debug!(bytes = data.len(), "stored scheduler state (memory)");
        Ok(())
    }

    fn load(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        copy_into(&self.data, buf)
    }
}
