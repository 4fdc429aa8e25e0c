//! Core types for the redo log archiving subsystem.
//!
//! This module defines the foundational identifiers:
//! - Lsn: byte position in the logical redo log stream
//! - SessionId: handle for an archiving session registered with a group

use std::fmt;

/// Log sequence number.
///
/// A monotonically increasing 64-bit byte offset into the logical (infinite)
/// redo log stream. LSNs are totally ordered and never reused.
pub type Lsn = u64;

/// Sentinel LSN meaning "not assigned yet".
///
/// A client context that has not attached to a group carries `LSN_MAX` for
/// both its begin and end positions.
pub const LSN_MAX: Lsn = u64::MAX;

/// Align an LSN down to the given block granularity.
///
/// Used when capturing begin/end positions so that an archived range always
/// starts and ends on a log block boundary. `block` must be non-zero; the
/// group validates its format geometry before this is ever called.
pub fn align_down(lsn: Lsn, block: u64) -> Lsn {
    debug_assert!(block > 0, "block granularity must be non-zero");
    lsn - lsn % block
}

/// Identifier for an archiving session registered with an archive group.
///
/// Session ids are assigned by the group at attach time and are never reused
/// within a group's lifetime. The id is the client's only link back to its
/// reservation; all registry access goes through the group's API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a session id from its raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value of this session id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}
