//! Archiving client: the per-session state machine over an archive group.
//!
//! One client drives one archiving session through a strictly linear
//! lifecycle:
//!
//! ```text
//! Init --start--> Attached --stop--> Stopped --release--> Released
//! ```
//!
//! `start` reserves log data from the assigned begin position and fills the
//! caller's header buffer; `get_files` enumerates the segment files covering
//! the reserved range; `stop` fixes the end position and fills the trailer
//! buffer; `release` detaches and unpins the range. The client never copies
//! log bytes itself — data flows only through caller-owned buffers and the
//! caller's own read loop over the enumerated files.
//!
//! A client is single-threaded by contract. Breaking a hung session's
//! reservation from another thread goes through
//! [`ArchiveGroup::force_release`], not through the client.

use crate::config::{ARCHIVE_HEADER_SIZE, ARCHIVE_TRAILER_SIZE};
use crate::format::{ArchiveHeader, ArchiveTrailer};
use crate::group::{ArchiveGroup, ArchivedFile};
use redolog_core::{ArchiveError, Lsn, Result, SessionId, LSN_MAX};
use std::sync::Arc;

/// Archiving client states. Transitions are strictly linear; a released
/// client is permanently inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Constructed, not attached.
    Init,
    /// Registered with the group, range still open-ended.
    Attached,
    /// Range closed, end position fixed, reservation still held.
    Stopped,
    /// Detached; terminal.
    Released,
}

impl ClientState {
    fn name(self) -> &'static str {
        match self {
            ClientState::Init => "init",
            ClientState::Attached => "attached",
            ClientState::Stopped => "stopped",
            ClientState::Released => "released",
        }
    }
}

/// Per-session archiving client.
///
/// The caller owns the client's lifetime. The group is shared across
/// sessions and outlives any of them; the client holds it behind an `Arc`
/// and identifies its reservation by session id only.
pub struct ArchiveClient {
    state: ClientState,
    group: Arc<ArchiveGroup>,
    session: Option<SessionId>,
    begin_lsn: Lsn,
    end_lsn: Lsn,
}

impl ArchiveClient {
    /// Create a client for the given group. No reservation is taken until
    /// [`start`](Self::start).
    pub fn new(group: Arc<ArchiveGroup>) -> Self {
        ArchiveClient {
            state: ClientState::Init,
            group,
            session: None,
            begin_lsn: LSN_MAX,
            end_lsn: LSN_MAX,
        }
    }

    /// The `(file_size, header_size, trailer_size)` triple of the log
    /// format.
    ///
    /// Callable in any state, so buffers can be sized before `start`.
    pub fn header_sizes(&self) -> (u64, usize, usize) {
        self.group.format_sizes()
    }

    /// Start archiving.
    ///
    /// Attaches to the group, which assigns the begin position at the
    /// current record-boundary head and retains log data from there on this
    /// session's behalf. On success the serialized header record is written
    /// into `header` and the begin position is returned.
    ///
    /// # Errors
    /// - `InvalidState` unless the client is in `Init`
    /// - `InvalidArgument` when `header` is shorter than the header size;
    ///   no attach is performed
    /// - `ResourceUnavailable` when the group cannot admit the session;
    ///   the client stays in `Init` and the call may be retried
    pub fn start(&mut self, header: &mut [u8]) -> Result<Lsn> {
        if self.state != ClientState::Init {
            return Err(self.wrong_state("start", "init"));
        }
        if header.len() < ARCHIVE_HEADER_SIZE {
            return Err(ArchiveError::InvalidArgument(format!(
                "header buffer is {} bytes, format requires {}",
                header.len(),
                ARCHIVE_HEADER_SIZE
            )));
        }

        let (session, begin_lsn) = self.group.attach()?;
        let record = ArchiveHeader {
            begin_lsn,
            file_size: self.group.format().file_size,
            block_size: self.group.format().block_size,
        };
        if let Err(e) = record.encode_into(header) {
            // Keep the no-partial-attach contract
            self.group.detach(session);
            return Err(e.into());
        }

        self.session = Some(session);
        self.begin_lsn = begin_lsn;
        self.state = ClientState::Attached;
        tracing::debug!(session = %session, begin_lsn, "archiving started");
        Ok(begin_lsn)
    }

    /// Enumerate the segment files covering the reserved range, in ascending
    /// LSN order.
    ///
    /// While attached the upper bound is the group's current position; after
    /// `stop` it is the fixed end position. The callback runs once per file
    /// on the caller's thread; returning an error aborts the enumeration and
    /// propagates that error verbatim — cooperative cancellation, not a
    /// failure of the session. Zero invocations is valid when no file
    /// intersects the range yet.
    ///
    /// # Errors
    /// - `InvalidState` unless the client is attached or stopped
    /// - `Corruption` when the group's metadata cannot produce a gap-free
    ///   covering of the range
    /// - whatever the callback returned, unchanged
    pub fn get_files<F>(&self, mut callback: F) -> Result<()>
    where
        F: FnMut(&ArchivedFile) -> Result<()>,
    {
        let end = match self.state {
            ClientState::Attached => self.group.current_position(),
            ClientState::Stopped => self.end_lsn,
            _ => return Err(self.wrong_state("get_files", "attached or stopped")),
        };

        let files = self.group.get_file_list(self.begin_lsn, end)?;
        for file in &files {
            callback(file)?;
        }
        Ok(())
    }

    /// Stop archiving.
    ///
    /// Fixes the end position at the group's current record-boundary head,
    /// writes the serialized trailer record into `trailer`, and returns the
    /// end position together with the byte offset within the last covered
    /// file at which the trailer begins. The reservation stays held until
    /// [`release`](Self::release).
    ///
    /// # Errors
    /// - `InvalidState` unless the client is attached
    /// - `InvalidArgument` when `trailer` is shorter than the trailer size;
    ///   the range stays open and the call may be retried
    pub fn stop(&mut self, trailer: &mut [u8]) -> Result<(Lsn, u64)> {
        if self.state != ClientState::Attached {
            return Err(self.wrong_state("stop", "attached"));
        }
        if trailer.len() < ARCHIVE_TRAILER_SIZE {
            return Err(ArchiveError::InvalidArgument(format!(
                "trailer buffer is {} bytes, format requires {}",
                trailer.len(),
                ARCHIVE_TRAILER_SIZE
            )));
        }

        let end_lsn = self.group.current_position();
        debug_assert!(end_lsn >= self.begin_lsn, "log head moved backwards");
        ArchiveTrailer { end_lsn }.encode_into(trailer)?;
        let offset = self.group.trailer_offset(end_lsn);

        self.end_lsn = end_lsn;
        self.state = ClientState::Stopped;
        tracing::debug!(
            session = ?self.session,
            begin_lsn = self.begin_lsn,
            end_lsn,
            trailer_offset = offset,
            "archiving stopped"
        );
        Ok((end_lsn, offset))
    }

    /// Release the reservation so the group can reclaim log data.
    ///
    /// Never fails outward and is idempotent: from `Init` or `Released`
    /// this is a no-op. Internal bookkeeping trouble is logged rather than
    /// propagated — leaving a session attached is strictly worse than
    /// losing a diagnostic.
    pub fn release(&mut self) {
        match self.state {
            ClientState::Init | ClientState::Released => {}
            ClientState::Attached | ClientState::Stopped => {
                match self.session.take() {
                    Some(session) => self.group.detach(session),
                    None => {
                        tracing::error!("attached client lost its session id");
                    }
                }
                self.state = ClientState::Released;
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Begin position of the reserved range, once `start` has assigned one.
    pub fn begin_lsn(&self) -> Option<Lsn> {
        (self.begin_lsn != LSN_MAX).then_some(self.begin_lsn)
    }

    /// End position of the range, once `stop` has fixed it.
    pub fn end_lsn(&self) -> Option<Lsn> {
        (self.end_lsn != LSN_MAX).then_some(self.end_lsn)
    }

    fn wrong_state(&self, operation: &'static str, expected: &'static str) -> ArchiveError {
        ArchiveError::InvalidState {
            operation,
            expected,
            actual: self.state.name(),
        }
    }
}

impl Drop for ArchiveClient {
    /// Dropping a client that still holds a reservation is a contract
    /// violation; it is logged and the reservation is released rather than
    /// leaked, since a leaked reservation wedges log reclamation for good.
    fn drop(&mut self) {
        if matches!(self.state, ClientState::Attached | ClientState::Stopped) {
            tracing::error!(
                session = ?self.session,
                begin_lsn = self.begin_lsn,
                "archive client dropped while still holding a reservation"
            );
            self.release();
        }
    }
}
