//! Log format geometry.
//!
//! The archiving protocol needs three sizes from the underlying log format:
//! the per-file LSN capacity, the header record size, and the trailer record
//! size. Header and trailer sizes are format constants; the file and block
//! sizes are configured per group.

/// Fixed byte size of the archive header record.
pub const ARCHIVE_HEADER_SIZE: usize = 64;

/// Fixed byte size of the archive trailer record.
pub const ARCHIVE_TRAILER_SIZE: usize = 32;

/// Geometry of the log format being archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    /// Bytes of LSN space covered by one archived segment file (default: 4MB).
    pub file_size: u64,

    /// Log block granularity in bytes (default: 512).
    ///
    /// Begin and end positions of an archived range are always captured on a
    /// block boundary, so a reader can parse the copied bytes as a sequence
    /// of whole records.
    pub block_size: u64,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat {
            file_size: 4 * 1024 * 1024, // 4MB
            block_size: 512,
        }
    }
}

impl LogFormat {
    /// Create a new format with default geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-file LSN capacity (builder pattern).
    pub fn with_file_size(mut self, size: u64) -> Self {
        self.file_size = size;
        self
    }

    /// Set the block granularity (builder pattern).
    pub fn with_block_size(mut self, size: u64) -> Self {
        self.block_size = size;
        self
    }

    /// Validate geometry.
    pub fn validate(&self) -> Result<(), LogFormatError> {
        if self.block_size == 0 {
            return Err(LogFormatError::BlockSizeZero);
        }
        if self.file_size < self.block_size {
            return Err(LogFormatError::FileSmallerThanBlock);
        }
        if self.file_size % self.block_size != 0 {
            return Err(LogFormatError::FileNotBlockMultiple);
        }
        Ok(())
    }

    /// The `(file_size, header_size, trailer_size)` triple callers use to
    /// size their buffers before starting a session.
    pub fn sizes(&self) -> (u64, usize, usize) {
        (self.file_size, ARCHIVE_HEADER_SIZE, ARCHIVE_TRAILER_SIZE)
    }

    /// Small geometry for tests: 100-byte files at byte granularity, so
    /// test LSNs stay human-readable.
    pub fn for_testing() -> Self {
        LogFormat {
            file_size: 100,
            block_size: 1,
        }
    }
}

/// Log format geometry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogFormatError {
    /// Block size must be non-zero.
    #[error("block size must be non-zero")]
    BlockSizeZero,

    /// File size is smaller than one block.
    #[error("file size must cover at least one block")]
    FileSmallerThanBlock,

    /// File size is not a whole number of blocks.
    #[error("file size must be a multiple of the block size")]
    FileNotBlockMultiple,
}
