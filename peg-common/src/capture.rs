//! Packed capture ranges.
//!
//! A capture is a `(start, end)` pair of character offsets packed into a
//! single `i64`: `end` lives in the high 32 bits, `start` in the low 32 bits.
//! The pair `(-1, -1)` is reserved as the "empty" value, which packs to an
//! all-ones bit pattern and never collides with a real range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Packs `start` and `end` into one value.
#[inline]
pub const fn pack(start: i32, end: i32) -> i64 {
    ((end as i64) << 32) | (start as u32 as i64)
}

/// Splits a packed value back into `(start, end)`.
#[inline]
pub const fn unpack(value: i64) -> (i32, i32) {
    (start(value), end(value))
}

#[inline]
pub const fn start(value: i64) -> i32 {
    value as i32
}

#[inline]
pub const fn end(value: i64) -> i32 {
    (value >> 32) as i32
}

/// Returns true for the reserved empty value, `pack(-1, -1)`.
#[inline]
pub const fn is_empty(value: i64) -> bool {
    value == EMPTY
}

#[inline]
pub const fn is_defined(value: i64) -> bool {
    !is_empty(value)
}

/// Raw bit pattern of the empty capture.
pub const EMPTY: i64 = pack(-1, -1);

/// A captured input range in packed form.
///
/// Copying a `CapturePosition` is copying one `i64`; recording a capture
/// never allocates beyond the capture list itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct CapturePosition(i64);

impl CapturePosition {
    /// The reserved "no capture" value.
    pub const EMPTY: CapturePosition = CapturePosition(EMPTY);

    /// Largest offset a capture can hold.
    pub const MAX_OFFSET: usize = i32::MAX as usize;

    /// Creates a capture for `start..end`.
    ///
    /// Callers keep offsets within [`Self::MAX_OFFSET`]; the parser enforces
    /// this through its input-size limit.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= Self::MAX_OFFSET);
        Self(pack(start as i32, end as i32))
    }

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn start(self) -> i32 {
        start(self.0)
    }

    pub const fn end(self) -> i32 {
        end(self.0)
    }

    pub const fn unpack(self) -> (i32, i32) {
        unpack(self.0)
    }

    pub const fn is_empty(self) -> bool {
        is_empty(self.0)
    }

    pub const fn is_defined(self) -> bool {
        is_defined(self.0)
    }

    /// Number of characters covered; zero for the empty capture.
    pub fn len(self) -> usize {
        self.range().map_or(0, |range| range.len())
    }

    /// The covered offsets, or `None` for the empty capture.
    pub fn range(self) -> Option<Range<usize>> {
        if self.is_empty() {
            return None;
        }
        let (start, end) = self.unpack();
        Some(start as usize..end as usize)
    }
}

impl Default for CapturePosition {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for CapturePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "CapturePosition(empty)")
        } else {
            write!(f, "CapturePosition({}..{})", self.start(), self.end())
        }
    }
}
