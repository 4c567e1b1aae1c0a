use crate::grammar::{Grammar, RuleBody, RuleId};
use crate::parser::ParseOutcome;
use peg_common::{CapturePosition, CapturesMark, Checkpoint};
use peg_runtime::{Cursor, ErrorTracker};
use tracing::trace;

/// Everything one parse mutates: the cursor, the error log and the captures.
///
/// A context belongs to exactly one parse. The grammar is only borrowed, so
/// any number of contexts can run against the same grammar at once.
#[derive(Debug)]
pub struct ParseContext<'g> {
    grammar: &'g Grammar,
    cursor: Cursor,
    errors: ErrorTracker,
    captures: Vec<CapturePosition>,
}

impl<'g> ParseContext<'g> {
    pub fn new(grammar: &'g Grammar, input: &str) -> Self {
        Self::with_cursor(grammar, Cursor::new(input))
    }

    pub fn with_cursor(grammar: &'g Grammar, cursor: Cursor) -> Self {
        Self {
            grammar,
            cursor,
            errors: ErrorTracker::new(),
            captures: Vec::new(),
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn errors(&self) -> &ErrorTracker {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorTracker {
        &mut self.errors
    }

    /// Captures recorded so far, in the order their rules completed.
    pub fn captures(&self) -> &[CapturePosition] {
        &self.captures
    }

    #[inline]
    pub fn captures_mark(&self) -> CapturesMark {
        CapturesMark::new(self.captures.len())
    }

    #[inline]
    pub fn reset_captures(&mut self, mark: CapturesMark) {
        self.captures.truncate(mark.len());
    }

    pub fn push_capture(&mut self, capture: CapturePosition) {
        self.captures.push(capture);
    }

    /// Saves the cursor offset and capture count together.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.cursor.mark(), self.captures_mark())
    }

    /// Rewinds the cursor and drops captures recorded after `checkpoint`.
    /// The error log is left alone.
    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor.reset(checkpoint.mark());
        self.reset_captures(checkpoint.captures());
    }

    /// Runs the body of rule `id` at the current offset.
    pub fn call_rule(&mut self, id: RuleId) -> bool {
        let grammar = self.grammar;
        trace!(
            target: "peg::rule",
            rule = grammar.name(id).unwrap_or_default(),
            offset = self.cursor.offset(),
            "enter"
        );
        let matched = match grammar.body(id) {
            Some(RuleBody::Expr(rule)) => rule.matches(self),
            Some(RuleBody::Native(matcher)) => matcher.matches(self),
            None => false,
        };
        trace!(
            target: "peg::rule",
            rule = grammar.name(id).unwrap_or_default(),
            offset = self.cursor.offset(),
            matched,
            "exit"
        );
        matched
    }

    /// Runs a rule by name, for native rules that delegate to grammar rules.
    /// Unknown names do not match.
    pub fn call(&mut self, name: &str) -> bool {
        match self.grammar.rule_id(name) {
            Some(id) => self.call_rule(id),
            None => false,
        }
    }

    pub fn into_outcome(self, matched: bool) -> ParseOutcome {
        ParseOutcome::new(
            matched,
            self.cursor.offset(),
            self.errors.into_records(),
            self.captures,
        )
    }
}
