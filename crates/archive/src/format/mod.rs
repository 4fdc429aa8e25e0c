//! Binary boundary records for archived log ranges.
//!
//! Every archived range is bracketed by a fixed-size header and trailer
//! record written into the caller's output stream:
//!
//! - `header`: begin position plus format geometry, written by `start`
//! - `trailer`: end position, written by `stop`
//!
//! Both records carry a 4-byte magic, a format version, and a trailing
//! crc32 so a reader can validate range identity and completeness before
//! trusting the bytes in between.

mod header;
mod trailer;

pub use header::ArchiveHeader;
pub use trailer::ArchiveTrailer;

/// Current version of the boundary record format.
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

/// Boundary record encode/decode errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Buffer shorter than the fixed record size.
    #[error("buffer is {actual} bytes, record requires {expected}")]
    TooShort {
        /// Required record size.
        expected: usize,
        /// Bytes actually provided.
        actual: usize,
    },

    /// Magic bytes did not match.
    #[error("bad magic bytes, not an archive boundary record")]
    BadMagic,

    /// Record was written by an unknown format version.
    #[error("unsupported record format version {found}")]
    UnsupportedVersion {
        /// Version found in the record.
        found: u32,
    },

    /// CRC mismatch.
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum stored in the record.
        stored: u32,
        /// Checksum computed over the payload.
        computed: u32,
    },
}

impl From<RecordError> for redolog_core::ArchiveError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::TooShort { .. } => {
                redolog_core::ArchiveError::InvalidArgument(e.to_string())
            }
            _ => redolog_core::ArchiveError::Corruption(e.to_string()),
        }
    }
}
