//! Archive header record.
//!
//! Written at the start of every archived range. Describes where the range
//! begins and the geometry a reader needs to locate file boundaries inside
//! the copied bytes.
//!
//! # Binary Format (64 bytes)
//!
//! ```text
//! magic("RLAH", 4) + version(4) + begin_lsn(8) + file_size(8)
//! + block_size(8) + reserved(28, zero) + crc32(4) = 64 bytes
//! ```
//!
//! The reserved region is zero-filled and covered by the CRC, leaving room
//! for future format versions without changing the record size.

use super::{RecordError, ARCHIVE_FORMAT_VERSION};
use crate::config::ARCHIVE_HEADER_SIZE;
use redolog_core::Lsn;

/// Magic bytes for archive header records.
pub const HEADER_MAGIC: &[u8; 4] = b"RLAH";

/// Boundary record written at the start of an archived range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// First LSN covered by the archived range.
    pub begin_lsn: Lsn,
    /// Per-file LSN capacity of the source log format.
    pub file_size: u64,
    /// Log block granularity of the source log format.
    pub block_size: u64,
}

impl ArchiveHeader {
    /// Serialize into the caller's buffer.
    ///
    /// Writes exactly [`ARCHIVE_HEADER_SIZE`] bytes. The buffer may be
    /// larger; extra bytes are left untouched.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<(), RecordError> {
        if buf.len() < ARCHIVE_HEADER_SIZE {
            return Err(RecordError::TooShort {
                expected: ARCHIVE_HEADER_SIZE,
                actual: buf.len(),
            });
        }

        let record = &mut buf[..ARCHIVE_HEADER_SIZE];
        record.fill(0);
        record[0..4].copy_from_slice(HEADER_MAGIC);
        record[4..8].copy_from_slice(&ARCHIVE_FORMAT_VERSION.to_le_bytes());
        record[8..16].copy_from_slice(&self.begin_lsn.to_le_bytes());
        record[16..24].copy_from_slice(&self.file_size.to_le_bytes());
        record[24..32].copy_from_slice(&self.block_size.to_le_bytes());

        let crc = crc32fast::hash(&record[..ARCHIVE_HEADER_SIZE - 4]);
        record[ARCHIVE_HEADER_SIZE - 4..].copy_from_slice(&crc.to_le_bytes());
        Ok(())
    }

    /// Deserialize from bytes, validating magic, version, and CRC.
    pub fn decode(data: &[u8]) -> Result<Self, RecordError> {
        if data.len() < ARCHIVE_HEADER_SIZE {
            return Err(RecordError::TooShort {
                expected: ARCHIVE_HEADER_SIZE,
                actual: data.len(),
            });
        }
        let record = &data[..ARCHIVE_HEADER_SIZE];

        if &record[0..4] != HEADER_MAGIC {
            return Err(RecordError::BadMagic);
        }

        let version = u32::from_le_bytes(record[4..8].try_into().unwrap());
        if version != ARCHIVE_FORMAT_VERSION {
            return Err(RecordError::UnsupportedVersion { found: version });
        }

        let stored = u32::from_le_bytes(record[ARCHIVE_HEADER_SIZE - 4..].try_into().unwrap());
        let computed = crc32fast::hash(&record[..ARCHIVE_HEADER_SIZE - 4]);
        if stored != computed {
            return Err(RecordError::ChecksumMismatch { stored, computed });
        }

        Ok(ArchiveHeader {
            begin_lsn: u64::from_le_bytes(record[8..16].try_into().unwrap()),
            file_size: u64::from_le_bytes(record[16..24].try_into().unwrap()),
            block_size: u64::from_le_bytes(record[24..32].try_into().unwrap()),
        })
    }
}
