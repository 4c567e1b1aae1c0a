use peg_common::{ErrorsMark, Mark};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// One failure diagnostic: which combinator failed and where it started.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorRecord {
    pub position: usize,
    pub description: Cow<'static, str>,
}

impl ErrorRecord {
    pub fn new(position: usize, description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            position,
            description: description.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.description, self.position)
    }
}

/// Ordered, append-only log of failure records for one parse.
///
/// Recording can be muted while a repetition probes for its terminating
/// failure, and the log can be truncated back to a mark when a later
/// alternative supersedes the attempts that produced the records.
#[derive(Debug, Clone)]
pub struct ErrorTracker {
    records: Vec<ErrorRecord>,
    track_errors: bool,
}

impl Default for ErrorTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorTracker {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            track_errors: true,
        }
    }

    /// Appends a record at `mark` if tracking is enabled.
    pub fn add_error(&mut self, mark: Mark, description: impl Into<Cow<'static, str>>) {
        if self.track_errors {
            self.records.push(ErrorRecord::new(mark.index(), description));
        }
    }

    /// Like [`add_error`](Self::add_error), but only builds the description
    /// when the record is actually kept.
    #[inline]
    pub fn add_error_with<F, D>(&mut self, mark: Mark, description: F)
    where
        F: FnOnce() -> D,
        D: Into<Cow<'static, str>>,
    {
        if self.track_errors {
            self.records.push(ErrorRecord::new(mark.index(), description()));
        }
    }

    #[inline]
    pub fn errors_mark(&self) -> ErrorsMark {
        ErrorsMark::new(self.records.len())
    }

    /// Drops every record appended after `mark` was taken.
    #[inline]
    pub fn reset_errors(&mut self, mark: ErrorsMark) {
        self.records.truncate(mark.len());
    }

    pub fn track_errors(&self) -> bool {
        self.track_errors
    }

    /// Enables or disables recording and returns the previous setting.
    #[inline]
    pub fn set_track_errors(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.track_errors, enabled)
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record furthest into the input; the earliest one wins a tie.
    pub fn deepest(&self) -> Option<&ErrorRecord> {
        deepest(&self.records)
    }
}

/// Picks the record with the greatest position, preferring the earliest
/// inserted among equals.
pub fn deepest(records: &[ErrorRecord]) -> Option<&ErrorRecord> {
    records
        .iter()
        .fold(None, |best: Option<&ErrorRecord>, record| match best {
            Some(current) if current.position >= record.position => Some(current),
            _ => Some(record),
        })
}
