// src/storage/record.rs

//! Byte layout of the persisted completion vector.
//!
//! ```text
//! offset  size  field
//! 0       1     magic 0x50 ('P')
//! 1       1     format version (1)
//! 2       2     task count n, little-endian u16
//! 4       n     completion flags in registration order, 0 or 1
//! 4+n     4     first 4 bytes of blake3(bytes[0..4+n])
//! ```
//!
//! The trailing checksum catches records torn by a power cut in the middle
//! of a write; such a record decodes as corrupt and is ignored.

use thiserror::Error;

/// Largest task count the reference record format accepts.
pub const DEFAULT_MAX_PERSISTED_TASKS: usize = 255;

/// Hard ceiling imposed by the u16 count field.
pub const FORMAT_MAX_TASKS: usize = u16::MAX as usize;

const MAGIC: u8 = 0x50;
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4;
const CHECKSUM_LEN: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record holds {count} tasks but at most {max} are allowed")]
    TooManyTasks { count: usize, max: usize },

    #[error("record is truncated ({len} bytes)")]
    Truncated { len: usize },

    #[error("bad record magic byte {0:#04x}")]
    BadMagic(u8),

    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),

    #[error("record checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid completion flag {value} at index {index}")]
    InvalidFlag { index: usize, value: u8 },

    #[error("record holds {stored} tasks but {registered} are registered")]
    CountMismatch { stored: usize, registered: usize },
}

/// Encoded size of a record holding `count` flags.
pub fn encoded_len(count: usize) -> usize {
    HEADER_LEN + count + CHECKSUM_LEN
}

/// Size of the largest record a scheduler limited to `max_tasks` can write.
pub fn max_record_len(max_tasks: usize) -> usize {
    encoded_len(max_tasks.min(FORMAT_MAX_TASKS))
}

/// Serialize completion flags.
///
/// Fails without producing any bytes if `flags` is longer than `max_tasks`
/// (or than the format itself allows).
pub fn encode(flags: &[bool], max_tasks: usize) -> Result<Vec<u8>, RecordError> {
    let max = max_tasks.min(FORMAT_MAX_TASKS);
    if flags.len() > max {
        return Err(RecordError::TooManyTasks {
            count: flags.len(),
            max,
        });
    }
    let count = u16::try_from(flags.len()).map_err(|_| RecordError::TooManyTasks {
        count: flags.len(),
        max,
    })?;

    let mut out = Vec::with_capacity(encoded_len(flags.len()));
    out.push(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&count.to_le_bytes());
    out.extend(flags.iter().map(|&done| u8::from(done)));

    let checksum = checksum(&out);
    out.extend_from_slice(&checksum);
    Ok(out)
}

/// Parse a record, rejecting anything holding more than `capacity` flags.
///
/// Trailing bytes past the checksum are ignored.
pub fn decode(bytes: &[u8], capacity: usize) -> Result<Vec<bool>, RecordError> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(RecordError::Truncated { len: bytes.len() });
    }
    if bytes[0] != MAGIC {
        return Err(RecordError::BadMagic(bytes[0]));
    }
    if bytes[1] != VERSION {
        return Err(RecordError::UnsupportedVersion(bytes[1]));
    }

    let count = usize::from(u16::from_le_bytes([bytes[2], bytes[3]]));
    if count > capacity {
        return Err(RecordError::TooManyTasks {
            count,
            max: capacity,
        });
    }

    let body_end = HEADER_LEN + count;
    if bytes.len() < body_end + CHECKSUM_LEN {
        return Err(RecordError::Truncated { len: bytes.len() });
    }
    if checksum(&bytes[..body_end]) != bytes[body_end..body_end + CHECKSUM_LEN] {
        return Err(RecordError::ChecksumMismatch);
    }

    bytes[HEADER_LEN..body_end]
        .iter()
        .enumerate()
        .map(|(index, &value)| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(RecordError::InvalidFlag { index, value }),
        })
        .collect()
}

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = blake3::hash(bytes);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash.as_bytes()[..CHECKSUM_LEN]);
    out
}
