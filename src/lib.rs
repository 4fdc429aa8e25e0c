//! Redolog - redo log archiving client protocol for embedded storage engines
//!
//! Redolog lets an external backup or clone agent obtain a consistent,
//! gap-free, byte-exact copy of a redo log while the engine continues
//! writing, without stalling the writer and without letting the engine
//! reclaim log data the agent still needs.
//!
//! # Quick Start
//!
//! ```
//! use redolog::{ArchiveClient, ArchiveGroup, LogFormat};
//! use std::sync::Arc;
//!
//! # fn main() -> redolog::Result<()> {
//! let group = Arc::new(ArchiveGroup::new(LogFormat::for_testing())?);
//!
//! // The log writer registers segments and advances the head
//! group.advance_head(0);
//! group.add_segment("log-000001", 0, 100)?;
//! group.advance_head(100);
//!
//! // The backup agent drives one session
//! let mut client = ArchiveClient::new(Arc::clone(&group));
//! let (_file_size, header_size, trailer_size) = client.header_sizes();
//!
//! let mut header = vec![0u8; header_size];
//! client.start(&mut header)?;
//!
//! client.get_files(|_file| {
//!     // the agent's copy loop reads _file.name from _file.read_offset
//!     Ok(())
//! })?;
//!
//! let mut trailer = vec![0u8; trailer_size];
//! let (_end_lsn, _trailer_offset) = client.stop(&mut trailer)?;
//! client.release();
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The [`ArchiveGroup`] is the shared registry: segment file metadata, the
//! log head, attached sessions, and the low-water reclaim boundary. Each
//! [`ArchiveClient`] is a per-session state machine over it. Log bytes only
//! ever flow through caller-owned buffers and the caller's own copy loop.

pub use redolog_archive::{
    ArchiveClient, ArchiveGroup, ArchiveHeader, ArchiveTrailer, ArchivedFile, ClientState,
    LogFormat, LogFormatError, RecordError, SegmentFile, SessionInfo, ARCHIVE_FORMAT_VERSION,
    ARCHIVE_HEADER_SIZE, ARCHIVE_TRAILER_SIZE, DEFAULT_MAX_SESSIONS,
};
pub use redolog_core::{align_down, ArchiveError, Lsn, Result, SessionId, LSN_MAX};
