use peg_common::{CapturePosition, Mark};
use std::sync::Arc;

/// End-of-input sentinel returned by [`Cursor::next_char`] once the input is
/// exhausted.
///
/// U+FFFF is a noncharacter but still a valid `char`, so input can contain
/// it. Code that must tell the two apart uses [`Cursor::advance`] or
/// [`Cursor::is_eoi`] instead of comparing against this value.
pub const EOI: char = '\u{FFFF}';

/// A cursor for reading the input one character at a time during a parse.
///
/// The input is decoded into characters up front so that offsets are
/// character indices and every read is O(1).
#[derive(Debug, Clone)]
pub struct Cursor {
    buffer: Arc<[char]>,
    current: usize,
}

impl Cursor {
    /// Creates a new cursor from the input string.
    pub fn new(input: &str) -> Self {
        Self::with_chars(input.chars().collect())
    }

    /// Creates a cursor over an already decoded, shared buffer.
    pub fn with_chars(buffer: Arc<[char]>) -> Self {
        Self { buffer, current: 0 }
    }

    /// Returns the character at the current offset and advances by one, or
    /// `None` at the end of input without moving.
    #[inline]
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.buffer.get(self.current).copied()?;
        self.current += 1;
        Some(ch)
    }

    /// Like [`advance`](Self::advance), but reports the end of input as
    /// [`EOI`], however many times it is called.
    #[inline]
    pub fn next_char(&mut self) -> char {
        self.advance().unwrap_or(EOI)
    }

    /// Returns the next character without advancing.
    #[inline]
    pub fn peek(&self) -> char {
        self.buffer.get(self.current).copied().unwrap_or(EOI)
    }

    /// Snapshot of the current offset.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark::new(self.current)
    }

    /// Moves back (or forward) to a mark taken from this cursor.
    #[inline]
    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.index() <= self.buffer.len());
        self.current = mark.index();
    }

    /// Returns the current offset in characters.
    pub fn offset(&self) -> usize {
        self.current
    }

    /// Returns the input length in characters.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns true if the cursor is at the end of the input.
    pub fn is_eoi(&self) -> bool {
        self.current >= self.buffer.len()
    }

    /// Returns the shared input buffer.
    pub fn buffer(&self) -> Arc<[char]> {
        Arc::clone(&self.buffer)
    }

    /// Collects the characters in `start..end` into a string.
    /// Offsets past the end of input are clamped.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.buffer.len());
        let start = start.min(end);
        self.buffer[start..end].iter().collect()
    }

    /// Returns the text covered by a capture, or `None` for the empty capture.
    pub fn text(&self, capture: CapturePosition) -> Option<String> {
        capture
            .range()
            .map(|range| self.slice(range.start, range.end))
    }
}
