// src/storage/mod.rs

//! Persistent completion state.
//!
//! - [`record`] owns the byte layout of the persisted completion vector.
//! - [`StateStore`] is the dumb byte sink/source behind it (flash, EEPROM,
//!   a file on the host), with [`MemoryStore`] and [`FileStore`] provided.

pub mod file;
pub mod memory;
pub mod record;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::RecordError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no state has been stored yet")]
    Empty,

    #[error("stored record is {needed} bytes but the buffer holds {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Opaque blob storage for the scheduler's persisted record.
///
/// The store never interprets the bytes; only [`record`] does.
pub trait StateStore {
    /// Replace the stored blob with `data`.
    fn save(&mut self, data: &[u8]) -> Result<(), StorageError>;

    /// Copy the stored blob into `buf`, returning the number of bytes written.
    fn load(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn save(&mut self, data: &[u8]) -> Result<(), StorageError> {
        (**self).save(data)
    }

    fn load(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        (**self).load(buf)
    }
}

/// Copy `stored` into `buf`, the shared tail of every `load` impl.
pub(crate) fn copy_into(stored: &[u8], buf: &mut [u8]) -> Result<usize, StorageError> {
    if stored.is_empty() {
        return Err(StorageError::Empty);
    }
    if stored.len() > buf.len() {
        return Err(StorageError::BufferTooSmall {
            needed: stored.len(),
            capacity: buf.len(),
        });
    }
    buf[..stored.len()].copy_from_slice(stored);
    Ok(stored.len())
}
