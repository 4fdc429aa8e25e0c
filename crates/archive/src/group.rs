//! Shared archive group: the registry of retained LSN ranges.
//!
//! One group serves all concurrent archiving sessions of a log. It tracks
//! three things under a single lock:
//!
//! - the log head position, advanced by the log writer
//! - metadata for the on-disk segment files covering the archived stream
//! - the attached sessions and their begin positions
//!
//! The group never touches file contents; it brokers metadata so that a
//! client can enumerate exactly which files (and sub-ranges within them)
//! cover its reserved range. The lock also makes the low-water computation
//! exact: while any session is attached, `reclaimable_up_to()` never moves
//! past the smallest begin position still reserved.
//!
//! # LSN to byte mapping
//!
//! A segment file covering `[start, end)` stores LSN `x` at byte
//! `header_size + (x - start)`. That mapping defines the first file's
//! `read_offset` during enumeration and the trailer offset reported by a
//! client's `stop`.

use crate::config::{LogFormat, ARCHIVE_HEADER_SIZE};
use parking_lot::Mutex;
use redolog_core::{align_down, ArchiveError, Lsn, Result, SessionId};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Default cap on concurrently attached sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 16;

/// Metadata for one on-disk segment file registered by the log writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFile {
    /// File name as the writer registered it.
    pub name: String,
    /// Total file size in bytes (in-file header included).
    pub size: u64,
    /// First LSN stored in this file.
    pub start_lsn: Lsn,
    /// First LSN past this file.
    pub end_lsn: Lsn,
}

/// One file a client must read to reconstruct its archived range.
///
/// Produced per enumeration step; `read_offset` is non-zero only for the
/// first file of a range whose head was already consumed by an earlier
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedFile {
    /// File name.
    pub name: String,
    /// Total file size in bytes.
    pub size: u64,
    /// Byte offset at which reading should begin.
    pub read_offset: u64,
}

/// An attached session as seen by operators.
///
/// A session that stays attached for a long time pins log space; this view
/// is what an operator inspects before deciding to force-release it.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Session id.
    pub id: SessionId,
    /// Begin position the session still retains.
    pub begin_lsn: Lsn,
    /// When the session attached.
    pub attached_at: SystemTime,
}

/// Per-session registry entry.
#[derive(Debug)]
struct Session {
    begin_lsn: Lsn,
    attached_at: SystemTime,
}

/// Registry state guarded by the group lock.
#[derive(Debug)]
struct GroupInner {
    /// Current log head; always a record-boundary position.
    head_lsn: Lsn,
    /// Registered segment files, ascending and contiguous by construction.
    files: Vec<SegmentFile>,
    /// Attached sessions keyed by id.
    sessions: BTreeMap<SessionId, Session>,
    /// Next session id to hand out; ids are never reused.
    next_session: u64,
}

/// Shared registry of retained LSN ranges across archiving sessions.
pub struct ArchiveGroup {
    format: LogFormat,
    max_sessions: usize,
    inner: Mutex<GroupInner>,
}

impl ArchiveGroup {
    /// Create a group for the given log format.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the format geometry is degenerate.
    pub fn new(format: LogFormat) -> Result<Self> {
        format
            .validate()
            .map_err(|e| ArchiveError::InvalidArgument(e.to_string()))?;
        Ok(ArchiveGroup {
            format,
            max_sessions: DEFAULT_MAX_SESSIONS,
            inner: Mutex::new(GroupInner {
                head_lsn: 0,
                files: Vec::new(),
                sessions: BTreeMap::new(),
                next_session: 1,
            }),
        })
    }

    /// Set the concurrent-session cap (builder pattern).
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    /// The log format this group archives.
    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    /// The `(file_size, header_size, trailer_size)` triple of the format.
    pub fn format_sizes(&self) -> (u64, usize, usize) {
        self.format.sizes()
    }

    // --- writer-side API -------------------------------------------------

    /// Advance the log head.
    ///
    /// The writer only reports positions at record boundaries, so every
    /// value captured from the head is safe to expose as a range boundary.
    /// A position behind the current head is ignored with a warning.
    pub fn advance_head(&self, lsn: Lsn) {
        let mut inner = self.inner.lock();
        if lsn < inner.head_lsn {
            tracing::warn!(
                head_lsn = inner.head_lsn,
                requested = lsn,
                "ignoring log head regression"
            );
            return;
        }
        inner.head_lsn = lsn;
    }

    /// Register a closed segment file with the group.
    ///
    /// Segments must be registered in ascending LSN order with no gap and no
    /// overlap against the previously registered segment; violating that is
    /// a writer bug and is rejected before the metadata can poison a later
    /// enumeration. The file size is derived from the LSN span plus the
    /// in-file header.
    pub fn add_segment(&self, name: impl Into<String>, start_lsn: Lsn, end_lsn: Lsn) -> Result<()> {
        let name = name.into();
        if end_lsn <= start_lsn {
            return Err(ArchiveError::InvalidArgument(format!(
                "segment {name} has empty range [{start_lsn}, {end_lsn})"
            )));
        }

        let mut inner = self.inner.lock();
        if let Some(last) = inner.files.last() {
            if start_lsn != last.end_lsn {
                return Err(ArchiveError::InvalidArgument(format!(
                    "segment {} starts at {}, previous segment {} ends at {}",
                    name, start_lsn, last.name, last.end_lsn
                )));
            }
        }

        let size = ARCHIVE_HEADER_SIZE as u64 + (end_lsn - start_lsn);
        tracing::debug!(segment = %name, start_lsn, end_lsn, "segment registered");
        inner.files.push(SegmentFile {
            name,
            size,
            start_lsn,
            end_lsn,
        });
        Ok(())
    }

    // --- client-side API -------------------------------------------------

    /// Attach a new archiving session.
    ///
    /// Assigns a begin position at the current head, aligned down to a block
    /// boundary, and retains log data from that position until the session
    /// detaches.
    ///
    /// # Errors
    /// Returns `ResourceUnavailable` when the session cap is reached.
    pub fn attach(&self) -> Result<(SessionId, Lsn)> {
        let mut inner = self.inner.lock();
        if inner.sessions.len() >= self.max_sessions {
            return Err(ArchiveError::ResourceUnavailable(format!(
                "archive group already has {} attached sessions",
                inner.sessions.len()
            )));
        }

        let id = SessionId::from_raw(inner.next_session);
        inner.next_session += 1;
        let begin_lsn = align_down(inner.head_lsn, self.format.block_size);
        inner.sessions.insert(
            id,
            Session {
                begin_lsn,
                attached_at: SystemTime::now(),
            },
        );
        tracing::debug!(session = %id, begin_lsn, "archive session attached");
        Ok((id, begin_lsn))
    }

    /// Detach a session, releasing its retained range.
    ///
    /// Never fails outward: detaching an unknown session is logged and
    /// ignored, because the contract here is first of all to never leave a
    /// reservation behind.
    pub fn detach(&self, id: SessionId) {
        let mut inner = self.inner.lock();
        match inner.sessions.remove(&id) {
            Some(session) => {
                let retained = inner.sessions.values().map(|s| s.begin_lsn).min();
                tracing::debug!(
                    session = %id,
                    begin_lsn = session.begin_lsn,
                    new_retained = ?retained,
                    "archive session detached"
                );
            }
            None => {
                tracing::warn!(session = %id, "detach for unknown session ignored");
            }
        }
    }

    /// Current record-boundary position of the log head.
    pub fn current_position(&self) -> Lsn {
        align_down(self.inner.lock().head_lsn, self.format.block_size)
    }

    /// Enumerate the segment files covering `[begin, end)` in ascending LSN
    /// order.
    ///
    /// An empty result is valid when no registered file intersects the range
    /// yet. A gap in front of `begin` or between consecutive files means the
    /// metadata can no longer produce a byte-exact copy of the range and is
    /// reported as `Corruption`.
    pub fn get_file_list(&self, begin: Lsn, end: Lsn) -> Result<Vec<ArchivedFile>> {
        if end <= begin {
            return Ok(Vec::new());
        }

        let inner = self.inner.lock();
        let covering: Vec<&SegmentFile> = inner
            .files
            .iter()
            .filter(|f| f.end_lsn > begin && f.start_lsn < end)
            .collect();

        if covering.is_empty() {
            return Ok(Vec::new());
        }

        if covering[0].start_lsn > begin {
            return Err(ArchiveError::Corruption(format!(
                "range starts at {}, earliest covering segment {} starts at {}",
                begin, covering[0].name, covering[0].start_lsn
            )));
        }
        for pair in covering.windows(2) {
            if pair[1].start_lsn != pair[0].end_lsn {
                return Err(ArchiveError::Corruption(format!(
                    "segments {} and {} are not contiguous ({} vs {})",
                    pair[0].name, pair[1].name, pair[0].end_lsn, pair[1].start_lsn
                )));
            }
        }

        let files = covering
            .iter()
            .map(|f| {
                let read_offset = if begin > f.start_lsn {
                    ARCHIVE_HEADER_SIZE as u64 + (begin - f.start_lsn)
                } else {
                    0
                };
                ArchivedFile {
                    name: f.name.clone(),
                    size: f.size,
                    read_offset,
                }
            })
            .collect();
        Ok(files)
    }

    /// Byte offset within the last file covering `end` at which a trailer
    /// record begins.
    ///
    /// Falls back to pure geometry when no registered file covers the
    /// position, which happens when a session stops before any segment was
    /// closed.
    pub fn trailer_offset(&self, end: Lsn) -> u64 {
        let inner = self.inner.lock();
        let covering = inner
            .files
            .iter()
            .rev()
            .find(|f| f.start_lsn < end && end <= f.end_lsn);
        match covering {
            Some(f) => ARCHIVE_HEADER_SIZE as u64 + (end - f.start_lsn),
            None => ARCHIVE_HEADER_SIZE as u64 + end % self.format.file_size,
        }
    }

    // --- retention and reclaim -------------------------------------------

    /// Smallest begin position any attached session still retains.
    pub fn retained_lsn(&self) -> Option<Lsn> {
        self.inner
            .lock()
            .sessions
            .values()
            .map(|s| s.begin_lsn)
            .min()
    }

    /// Position below which log data is eligible for reclamation.
    ///
    /// The minimum retained begin position, or the current head when no
    /// session is attached.
    pub fn reclaimable_up_to(&self) -> Lsn {
        let inner = self.inner.lock();
        let head = align_down(inner.head_lsn, self.format.block_size);
        inner
            .sessions
            .values()
            .map(|s| s.begin_lsn)
            .min()
            .unwrap_or(head)
    }

    /// Drop segment metadata wholly below the reclaimable boundary.
    ///
    /// Returns the number of segments reclaimed. Only a prefix is ever
    /// dropped, so the remaining metadata stays contiguous.
    pub fn reclaim(&self) -> usize {
        let mut inner = self.inner.lock();
        let boundary = {
            let head = align_down(inner.head_lsn, self.format.block_size);
            inner
                .sessions
                .values()
                .map(|s| s.begin_lsn)
                .min()
                .unwrap_or(head)
        };

        let keep_from = inner
            .files
            .iter()
            .position(|f| f.end_lsn > boundary)
            .unwrap_or(inner.files.len());
        if keep_from > 0 {
            inner.files.drain(..keep_from);
            tracing::info!(reclaimed = keep_from, boundary, "segments reclaimed");
        }
        keep_from
    }

    // --- operator surface ------------------------------------------------

    /// Currently attached sessions, in attach order.
    pub fn sessions(&self) -> Vec<SessionInfo> {
        self.inner
            .lock()
            .sessions
            .iter()
            .map(|(id, s)| SessionInfo {
                id: *id,
                begin_lsn: s.begin_lsn,
                attached_at: s.attached_at,
            })
            .collect()
    }

    /// Forcibly detach a stale session from outside its owning thread.
    ///
    /// Returns whether the session was attached. The abandoned client keeps
    /// its local state; its own later `release` degrades to the unknown-
    /// session no-op in [`detach`](Self::detach).
    pub fn force_release(&self, id: SessionId) -> bool {
        let attached = {
            let inner = self.inner.lock();
            inner.sessions.contains_key(&id)
        };
        if attached {
            tracing::warn!(session = %id, "session forcibly released");
            self.detach(id);
        }
        attached
    }
}
