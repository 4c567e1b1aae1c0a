use peg_runtime::{CapturePosition, Cursor, EOI};

#[test]
fn test_cursor_new() {
    let cursor = Cursor::new("hello");
    assert_eq!(cursor.offset(), 0);
    assert_eq!(cursor.len(), 5);
    assert!(!cursor.is_eoi());
}

#[test]
fn test_cursor_peek() {
    let cursor = Cursor::new("hello");
    assert_eq!(cursor.peek(), 'h');
    assert_eq!(cursor.offset(), 0); // Should not advance
}

#[test]
fn test_cursor_next_char() {
    let mut cursor = Cursor::new("hello");
    assert_eq!(cursor.next_char(), 'h');
    assert_eq!(cursor.offset(), 1);
    assert_eq!(cursor.next_char(), 'e');
    assert_eq!(cursor.peek(), 'l');
    assert_eq!(cursor.offset(), 2);
}

#[test]
fn test_cursor_eoi_is_idempotent() {
    let mut cursor = Cursor::new("hi");
    cursor.next_char();
    cursor.next_char();
    assert!(cursor.is_eoi());
    for _ in 0..3 {
        assert_eq!(cursor.next_char(), EOI);
        assert_eq!(cursor.offset(), 2);
    }
    assert_eq!(cursor.peek(), EOI);
}

#[test]
fn test_advance_tells_sentinel_from_input() {
    let mut cursor = Cursor::new("a\u{FFFF}");
    assert_eq!(cursor.advance(), Some('a'));
    assert_eq!(cursor.advance(), Some(EOI));
    assert!(cursor.is_eoi());
    assert_eq!(cursor.advance(), None);
    assert_eq!(cursor.offset(), 2);
}

#[test]
fn test_cursor_empty_string() {
    let mut cursor = Cursor::new("");
    assert!(cursor.is_eoi());
    assert!(cursor.is_empty());
    assert_eq!(cursor.next_char(), EOI);
    assert_eq!(cursor.offset(), 0);
}

#[test]
fn test_cursor_offsets_count_characters() {
    let mut cursor = Cursor::new("héllo");
    assert_eq!(cursor.len(), 5);
    cursor.next_char();
    assert_eq!(cursor.next_char(), 'é');
    assert_eq!(cursor.offset(), 2);
}

#[test]
fn test_cursor_mark_and_reset() {
    let mut cursor = Cursor::new("abcdef");
    cursor.next_char();
    let mark = cursor.mark();
    assert_eq!(mark.index(), 1);

    cursor.next_char();
    cursor.next_char();
    assert_eq!(cursor.offset(), 3);

    cursor.reset(mark);
    assert_eq!(cursor.offset(), 1);
    assert_eq!(cursor.next_char(), 'b');
}

#[test]
fn test_cursor_reset_from_eoi() {
    let mut cursor = Cursor::new("ab");
    let start = cursor.mark();
    while cursor.next_char() != EOI {}
    cursor.reset(start);
    assert_eq!(cursor.next_char(), 'a');
}

#[test]
fn test_cursor_slice_and_text() {
    let cursor = Cursor::new("hello world");
    assert_eq!(cursor.slice(0, 5), "hello");
    assert_eq!(cursor.slice(6, 100), "world");
    assert_eq!(cursor.slice(8, 3), "");
    assert_eq!(
        cursor.text(CapturePosition::new(6, 11)).as_deref(),
        Some("world")
    );
    assert_eq!(cursor.text(CapturePosition::EMPTY), None);
}

#[test]
fn test_cursor_shares_buffer() {
    let cursor = Cursor::new("abc");
    let clone = Cursor::with_chars(cursor.buffer());
    assert_eq!(clone.len(), 3);
    assert_eq!(clone.peek(), 'a');
}
