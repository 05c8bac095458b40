//! End-to-end walk through one channel with instrumented stages

mod common;

use common::{CallTracker, STUB_TAG_LEN, small_config, stub_pipeline, stub_tag};
use tanktrust::{Direction, ExternalFrame, TAG_LEN};

#[test]
fn test_commit_then_retrieve_on_channel_two() {
    let tracker = CallTracker::new();
    let pipeline = stub_pipeline(small_config(4, 32), &tracker);

    let input = vec![0xAB; 10];
    let mut frame = ExternalFrame::new(0x1000, input.clone());

    pipeline
        .process_channel(2, Direction::Commit, &mut frame)
        .unwrap();

    let committed = frame.record();
    assert_eq!(committed.length, 5);
    assert_eq!(committed.start, 0x1000);
    assert_eq!(frame.payload, vec![0xAB ^ 0xFF; 5]);
    assert_eq!(committed.hmac[..STUB_TAG_LEN], stub_tag(&frame.payload));
    assert_eq!(committed.hmac[STUB_TAG_LEN..], [0u8; TAG_LEN - STUB_TAG_LEN]);

    // The channel keeps what was handed out
    let stored = pipeline.snapshot(2).unwrap();
    assert_eq!(stored.record, committed);
    assert_eq!(stored.payload, frame.payload);

    pipeline
        .process_channel(2, Direction::Retrieve, &mut frame)
        .unwrap();
    assert_eq!(frame.payload, input);
    assert_eq!(frame.record().length, 10);

    // Other channels never saw the traffic
    for index in [0, 1, 3] {
        let untouched = pipeline.snapshot(index).unwrap();
        assert_eq!(untouched.record.length, 0);
        assert!(untouched.payload.is_empty());
    }
}

#[test]
fn test_retrieve_of_foreign_frame_fails_authentication() {
    let tracker = CallTracker::new();
    let pipeline = stub_pipeline(small_config(4, 32), &tracker);

    // Never committed, so the empty tag cannot match
    let mut frame = ExternalFrame::new(0, vec![0x54; 5]);
    let before = frame.clone();
    let err = pipeline
        .process_channel(2, Direction::Retrieve, &mut frame)
        .unwrap_err();

    assert_eq!(err.status_code(), 5);
    assert_eq!(frame, before);
}
