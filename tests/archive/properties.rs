//! Property: any contiguous segment layout enumerates gap-free.

use proptest::prelude::*;
use redolog::{ArchiveClient, ArchiveGroup, LogFormat, ARCHIVE_HEADER_SIZE};
use std::sync::Arc;

proptest! {
    #[test]
    fn enumeration_is_gap_free_for_any_layout(
        start in 0u64..10_000,
        spans in prop::collection::vec(1u64..500, 1..20),
    ) {
        let group = Arc::new(ArchiveGroup::new(LogFormat::for_testing()).unwrap());
        group.advance_head(start);

        let mut client = ArchiveClient::new(Arc::clone(&group));
        let mut header = vec![0u8; ARCHIVE_HEADER_SIZE];
        let begin = client.start(&mut header).unwrap();
        prop_assert_eq!(begin, start);

        // Writer closes segments of arbitrary spans, back to back
        let mut lsn = start;
        let mut expected_spans = Vec::new();
        for (i, span) in spans.iter().enumerate() {
            group.add_segment(format!("log-{i}"), lsn, lsn + span).unwrap();
            expected_spans.push(*span);
            lsn += span;
        }
        group.advance_head(lsn);

        let mut trailer = vec![0u8; redolog::ARCHIVE_TRAILER_SIZE];
        let (end, _) = client.stop(&mut trailer).unwrap();
        prop_assert_eq!(end, lsn);

        // Every segment is delivered once, in order, and the data regions
        // chain into exactly [begin, end)
        let mut files = Vec::new();
        client.get_files(|f| {
            files.push(f.clone());
            Ok(())
        }).unwrap();
        prop_assert_eq!(files.len(), expected_spans.len());

        let mut covered = begin;
        for (file, span) in files.iter().zip(&expected_spans) {
            prop_assert_eq!(file.read_offset, 0);
            prop_assert_eq!(file.size, ARCHIVE_HEADER_SIZE as u64 + span);
            covered += span;
        }
        prop_assert_eq!(covered, end);

        client.release();
    }
}
