//! Shared helpers for the archive integration tests.

use redolog::{ArchiveGroup, LogFormat};
use std::sync::Arc;

/// Group with the small test geometry (100-byte files, byte-granularity
/// blocks) and no segments registered yet.
pub fn empty_group() -> Arc<ArchiveGroup> {
    Arc::new(ArchiveGroup::new(LogFormat::for_testing()).unwrap())
}

/// Group whose writer has registered contiguous segments `[start, end)` and
/// advanced the head to `head`.
pub fn group_with_segments(segments: &[(&str, u64, u64)], head: u64) -> Arc<ArchiveGroup> {
    let group = empty_group();
    for (name, start, end) in segments {
        group.add_segment(*name, *start, *end).unwrap();
    }
    group.advance_head(head);
    group
}

/// Allocate a header buffer sized from the client's reported format sizes.
pub fn header_buf(client: &redolog::ArchiveClient) -> Vec<u8> {
    let (_, header_size, _) = client.header_sizes();
    vec![0u8; header_size]
}

/// Allocate a trailer buffer sized from the client's reported format sizes.
pub fn trailer_buf(client: &redolog::ArchiveClient) -> Vec<u8> {
    let (_, _, trailer_size) = client.header_sizes();
    vec![0u8; trailer_size]
}
