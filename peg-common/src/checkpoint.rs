/// A saved cursor offset.
///
/// Marks are only meaningful for the cursor that produced them, and only
/// within the parse that produced them. They exist for backtracking: a
/// combinator takes a mark before attempting a match and resets to it if the
/// attempt has to be rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark {
    index: usize,
}

impl Mark {
    /// Creates a mark at the given character offset.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Returns the character offset stored in this mark.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A saved error-log length, used to discard records appended after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorsMark {
    len: usize,
}

impl ErrorsMark {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Number of records the log held when the mark was taken.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A saved capture-list length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapturesMark {
    len: usize,
}

impl CapturesMark {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Cursor offset and capture-list length saved together.
///
/// Restoring a checkpoint rewinds the input and drops every capture recorded
/// since, which is what a combinator needs when it abandons a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    mark: Mark,
    captures: CapturesMark,
}

impl Checkpoint {
    pub fn new(mark: Mark, captures: CapturesMark) -> Self {
        Self { mark, captures }
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn captures(&self) -> CapturesMark {
        self.captures
    }
}
