//! Error types for the archiving subsystem.
//!
//! This module defines the error taxonomy shared by the archive group and
//! client. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! The taxonomy matters operationally:
//! - `InvalidArgument` / `InvalidState`: caller bugs, rejected before any
//!   state is mutated
//! - `ResourceUnavailable`: the group cannot admit the request right now;
//!   the caller may retry later
//! - `Corruption`: the group's segment metadata violates an internal
//!   invariant; a backup built over it would be silently broken
//! - `Cancelled`: the enumeration consumer asked to stop early; not a
//!   failure of the session itself

use thiserror::Error;

/// Result type alias for archiving operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Error types for the archiving subsystem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArchiveError {
    /// Caller-supplied argument rejected (undersized buffer, bad geometry).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation invoked in a state that does not permit it.
    #[error("invalid state: {operation} requires a {expected} client, found {actual}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the operation requires.
        expected: &'static str,
        /// State the client was actually in.
        actual: &'static str,
    },

    /// The archive group cannot admit the request right now.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Segment metadata violates an internal invariant (gap, overlap,
    /// missing coverage, or a record that fails validation).
    #[error("archive metadata corruption: {0}")]
    Corruption(String),

    /// File enumeration stopped early at the consumer's request.
    #[error("enumeration cancelled: {0}")]
    Cancelled(String),
}

impl ArchiveError {
    /// Returns true for cooperative cancellation, which is not a failure of
    /// the archiving session itself.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ArchiveError::Cancelled(_))
    }
}
