//! Archive trailer record.
//!
//! Written at the end of an archived range once `stop` fixes the end
//! position. A reader pairs it with the header to validate that the copy it
//! holds is exactly the `[begin_lsn, end_lsn)` range the session reserved.
//!
//! # Binary Format (32 bytes)
//!
//! ```text
//! magic("RLAT", 4) + version(4) + end_lsn(8) + reserved(12, zero)
//! + crc32(4) = 32 bytes
//! ```

use super::{RecordError, ARCHIVE_FORMAT_VERSION};
use crate::config::ARCHIVE_TRAILER_SIZE;
use redolog_core::Lsn;

/// Magic bytes for archive trailer records.
pub const TRAILER_MAGIC: &[u8; 4] = b"RLAT";

/// Boundary record written at the end of an archived range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTrailer {
    /// First LSN past the archived range.
    pub end_lsn: Lsn,
}

impl ArchiveTrailer {
    /// Serialize into the caller's buffer.
    ///
    /// Writes exactly [`ARCHIVE_TRAILER_SIZE`] bytes. The buffer may be
    /// larger; extra bytes are left untouched.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<(), RecordError> {
        if buf.len() < ARCHIVE_TRAILER_SIZE {
            return Err(RecordError::TooShort {
                expected: ARCHIVE_TRAILER_SIZE,
                actual: buf.len(),
            });
        }

        let record = &mut buf[..ARCHIVE_TRAILER_SIZE];
        record.fill(0);
        record[0..4].copy_from_slice(TRAILER_MAGIC);
        record[4..8].copy_from_slice(&ARCHIVE_FORMAT_VERSION.to_le_bytes());
        record[8..16].copy_from_slice(&self.end_lsn.to_le_bytes());

        let crc = crc32fast::hash(&record[..ARCHIVE_TRAILER_SIZE - 4]);
        record[ARCHIVE_TRAILER_SIZE - 4..].copy_from_slice(&crc.to_le_bytes());
        Ok(())
    }

    /// Deserialize from bytes, validating magic, version, and CRC.
    pub fn decode(data: &[u8]) -> Result<Self, RecordError> {
        if data.len() < ARCHIVE_TRAILER_SIZE {
            return Err(RecordError::TooShort {
                expected: ARCHIVE_TRAILER_SIZE,
                actual: data.len(),
            });
        }
        let record = &data[..ARCHIVE_TRAILER_SIZE];

        if &record[0..4] != TRAILER_MAGIC {
            return Err(RecordError::BadMagic);
        }

        let version = u32::from_le_bytes(record[4..8].try_into().unwrap());
        if version != ARCHIVE_FORMAT_VERSION {
            return Err(RecordError::UnsupportedVersion { found: version });
        }

        let stored = u32::from_le_bytes(record[ARCHIVE_TRAILER_SIZE - 4..].try_into().unwrap());
        let computed = crc32fast::hash(&record[..ARCHIVE_TRAILER_SIZE - 4]);
        if stored != computed {
            return Err(RecordError::ChecksumMismatch { stored, computed });
        }

        Ok(ArchiveTrailer {
            end_lsn: u64::from_le_bytes(record[8..16].try_into().unwrap()),
        })
    }
}
