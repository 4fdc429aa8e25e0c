//! Redo log archiving for the redolog engine
//!
//! This crate implements the archiving side of the redo log: the machinery a
//! backup or clone agent uses to obtain a consistent, gap-free, byte-exact
//! copy of the log while the engine keeps writing.
//!
//! - `group`: shared registry of retained LSN ranges, segment metadata, and
//!   the low-water reclaim boundary
//! - `client`: per-session state machine (`Init → Attached → Stopped →
//!   Released`) that reserves a range and enumerates the files covering it
//! - `format`: fixed-size header/trailer boundary records bracketing an
//!   archived range
//! - `config`: log format geometry (file size, block size, record sizes)
//!
//! The crate brokers metadata only. It never reads or copies log bytes;
//! the agent performs its own copy loop over the enumerated files.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod format;
pub mod group;

// Re-export the public API
pub use client::{ArchiveClient, ClientState};
pub use config::{LogFormat, LogFormatError, ARCHIVE_HEADER_SIZE, ARCHIVE_TRAILER_SIZE};
pub use format::{ArchiveHeader, ArchiveTrailer, RecordError, ARCHIVE_FORMAT_VERSION};
pub use group::{
    ArchiveGroup, ArchivedFile, SegmentFile, SessionInfo, DEFAULT_MAX_SESSIONS,
};
