use peg_runtime::{ErrorRecord, ErrorTracker, Mark};

#[test]
fn test_tracker_starts_empty_and_enabled() {
    let tracker = ErrorTracker::new();
    assert!(tracker.is_empty());
    assert!(tracker.track_errors());
    assert_eq!(tracker.errors_mark().len(), 0);
}

#[test]
fn test_add_error_appends_in_order() {
    let mut tracker = ErrorTracker::new();
    tracker.add_error(Mark::new(3), "first");
    tracker.add_error(Mark::new(1), "second");

    let records = tracker.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], ErrorRecord::new(3, "first"));
    assert_eq!(records[1], ErrorRecord::new(1, "second"));
}

#[test]
fn test_disabled_tracking_is_a_no_op() {
    let mut tracker = ErrorTracker::new();
    let previous = tracker.set_track_errors(false);
    assert!(previous);

    tracker.add_error(Mark::new(0), "ignored");
    let mut built = false;
    tracker.add_error_with(Mark::new(0), || {
        built = true;
        "also ignored"
    });
    assert!(tracker.is_empty());
    assert!(!built);

    assert!(!tracker.set_track_errors(true));
    tracker.add_error(Mark::new(0), "kept");
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_reset_errors_truncates() {
    let mut tracker = ErrorTracker::new();
    tracker.add_error(Mark::new(0), "kept");
    let mark = tracker.errors_mark();
    tracker.add_error(Mark::new(1), "dropped");
    tracker.add_error(Mark::new(2), "dropped too");

    tracker.reset_errors(mark);
    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.records()[0].description, "kept");
}

#[test]
fn test_deepest_prefers_earliest_among_equals() {
    let mut tracker = ErrorTracker::new();
    assert!(tracker.deepest().is_none());

    tracker.add_error(Mark::new(2), "inner");
    tracker.add_error(Mark::new(5), "deep");
    tracker.add_error(Mark::new(5), "deep outer");
    tracker.add_error(Mark::new(0), "root");

    let deepest = tracker.deepest().map(|r| r.description.as_ref());
    assert_eq!(deepest, Some("deep"));
}

#[test]
fn test_record_display() {
    let record = ErrorRecord::new(4, String::from("LiteralChar(x) failed"));
    assert_eq!(record.to_string(), "LiteralChar(x) failed at offset 4");
}
