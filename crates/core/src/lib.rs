//! Core types for the redolog archiving subsystem
//!
//! This crate defines the foundational types used throughout the system:
//! - Lsn: position in the logical redo log stream, plus the `LSN_MAX` sentinel
//! - SessionId: handle for a session registered with an archive group
//! - ArchiveError: shared error taxonomy (argument, state, resource,
//!   corruption, cancellation)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ArchiveError, Result};
pub use types::{align_down, Lsn, SessionId, LSN_MAX};
