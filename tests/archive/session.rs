//! Session lifecycle and state-machine legality.

use crate::common::*;
use redolog::{
    ArchiveClient, ArchiveError, ArchiveHeader, ArchiveTrailer, ClientState,
    ARCHIVE_HEADER_SIZE, ARCHIVE_TRAILER_SIZE,
};
use std::sync::Arc;

#[test]
fn full_lifecycle_round_trip() {
    let group = group_with_segments(
        &[("log-1", 0, 100), ("log-2", 100, 200)],
        200,
    );
    let mut client = ArchiveClient::new(Arc::clone(&group));

    let mut header = header_buf(&client);
    let begin = client.start(&mut header).unwrap();
    assert_eq!(begin, 200);
    assert_eq!(client.state(), ClientState::Attached);

    // Header buffer carries the begin position and geometry
    let decoded = ArchiveHeader::decode(&header).unwrap();
    assert_eq!(decoded.begin_lsn, begin);
    assert_eq!(decoded.file_size, 100);
    assert_eq!(decoded.block_size, 1);

    group.add_segment("log-3", 200, 300).unwrap();
    group.advance_head(300);

    let mut trailer = trailer_buf(&client);
    let (end, offset) = client.stop(&mut trailer).unwrap();
    assert_eq!(end, 300);
    assert!(end >= begin);
    assert_eq!(client.state(), ClientState::Stopped);

    // Trailer buffer agrees with the reported end position
    let decoded = ArchiveTrailer::decode(&trailer).unwrap();
    assert_eq!(decoded.end_lsn, end);
    // end == log-3's end: trailer lands right after its last data byte
    assert_eq!(offset, ARCHIVE_HEADER_SIZE as u64 + 100);

    client.release();
    assert_eq!(client.state(), ClientState::Released);
    assert!(group.sessions().is_empty());
}

#[test]
fn end_lsn_can_equal_begin_lsn() {
    let group = group_with_segments(&[("log-1", 0, 100)], 100);
    let mut client = ArchiveClient::new(group);

    let mut header = header_buf(&client);
    let begin = client.start(&mut header).unwrap();

    // Head never advanced after start: the archived range is empty
    let mut trailer = trailer_buf(&client);
    let (end, _) = client.stop(&mut trailer).unwrap();
    assert_eq!(end, begin);
    client.release();
}

#[test]
fn every_out_of_order_call_is_rejected_without_transition() {
    let group = empty_group();
    let mut trailer = vec![0u8; ARCHIVE_TRAILER_SIZE];
    let mut header = vec![0u8; ARCHIVE_HEADER_SIZE];

    // From Init: only start (and the no-op release) are legal
    let mut client = ArchiveClient::new(Arc::clone(&group));
    assert!(matches!(
        client.stop(&mut trailer),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert!(matches!(
        client.get_files(|_| Ok(())),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert_eq!(client.state(), ClientState::Init);

    // From Attached: start is illegal
    client.start(&mut header).unwrap();
    assert!(matches!(
        client.start(&mut header),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert_eq!(client.state(), ClientState::Attached);

    // From Stopped: start and stop are illegal, get_files still works
    client.stop(&mut trailer).unwrap();
    assert!(matches!(
        client.start(&mut header),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert!(matches!(
        client.stop(&mut trailer),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert!(client.get_files(|_| Ok(())).is_ok());
    assert_eq!(client.state(), ClientState::Stopped);

    // From Released: everything but release is illegal
    client.release();
    assert!(matches!(
        client.start(&mut header),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert!(matches!(
        client.stop(&mut trailer),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert!(matches!(
        client.get_files(|_| Ok(())),
        Err(ArchiveError::InvalidState { .. })
    ));
    assert_eq!(client.state(), ClientState::Released);
}

#[test]
fn one_byte_short_buffers_are_rejected() {
    let group = empty_group();
    let mut client = ArchiveClient::new(Arc::clone(&group));

    let mut short_header = vec![0u8; ARCHIVE_HEADER_SIZE - 1];
    assert!(matches!(
        client.start(&mut short_header),
        Err(ArchiveError::InvalidArgument(_))
    ));
    assert_eq!(client.state(), ClientState::Init);
    assert!(group.sessions().is_empty());

    let mut header = header_buf(&client);
    client.start(&mut header).unwrap();

    let mut short_trailer = vec![0u8; ARCHIVE_TRAILER_SIZE - 1];
    assert!(matches!(
        client.stop(&mut short_trailer),
        Err(ArchiveError::InvalidArgument(_))
    ));
    assert_eq!(client.state(), ClientState::Attached);

    // The failed stop left the range open; a retry closes it
    let mut trailer = trailer_buf(&client);
    client.stop(&mut trailer).unwrap();
    client.release();
}

#[test]
fn release_is_idempotent_and_infallible() {
    let group = empty_group();
    let mut client = ArchiveClient::new(Arc::clone(&group));

    // From Init: no-op
    client.release();
    client.release();
    assert_eq!(client.state(), ClientState::Init);

    let mut header = header_buf(&client);
    client.start(&mut header).unwrap();
    client.release();
    client.release();
    assert_eq!(client.state(), ClientState::Released);
    assert!(group.sessions().is_empty());
}

#[test]
fn release_without_stop_unpins_the_range() {
    let group = group_with_segments(&[("log-1", 0, 100)], 100);
    let mut client = ArchiveClient::new(Arc::clone(&group));

    let mut header = header_buf(&client);
    client.start(&mut header).unwrap();
    assert_eq!(group.reclaimable_up_to(), 100);

    group.advance_head(150);
    // Abandoning the session without stop still releases the reservation
    client.release();
    assert_eq!(group.reclaimable_up_to(), 150);
}

#[test]
fn failed_start_leaves_group_admittable() {
    let group = Arc::new(
        redolog::ArchiveGroup::new(redolog::LogFormat::for_testing())
            .unwrap()
            .with_max_sessions(1),
    );

    let mut first = ArchiveClient::new(Arc::clone(&group));
    let mut header = header_buf(&first);
    first.start(&mut header).unwrap();

    // Cap reached: second client fails and stays in Init
    let mut second = ArchiveClient::new(Arc::clone(&group));
    assert!(matches!(
        second.start(&mut header),
        Err(ArchiveError::ResourceUnavailable(_))
    ));
    assert_eq!(second.state(), ClientState::Init);

    // Once the first session releases, the same client can retry
    first.release();
    second.start(&mut header).unwrap();
    second.release();
}
