use crate::config::ParserConfig;
use crate::context::ParseContext;
use crate::error::ParseError;
use crate::grammar::{Grammar, RuleId};
use peg_common::CapturePosition;
use peg_runtime::{tracker, Cursor, ErrorRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Runs a grammar over inputs.
///
/// A parser only borrows its grammar; each call to [`parse`](Self::parse)
/// builds a fresh [`ParseContext`], so one parser (or many parsers over the
/// same grammar) can be used from several threads.
#[derive(Debug, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Matches `input` against the grammar's root rule.
    ///
    /// The root does not have to consume the whole input; end the root with
    /// [`Rule::eoi`](crate::Rule::eoi) for that.
    pub fn parse(&self, input: &str) -> Result<ParseOutcome, ParseError> {
        self.parse_chars(input.chars().collect())
    }

    /// Matches `input` against the named rule.
    pub fn parse_rule(&self, name: &str, input: &str) -> Result<ParseOutcome, ParseError> {
        let id = self
            .grammar
            .rule_id(name)
            .ok_or_else(|| ParseError::UnknownRule {
                name: name.to_string(),
            })?;
        self.run(id, input.chars().collect())
    }

    /// Matches an already decoded input against the root rule.
    pub fn parse_chars(&self, input: Arc<[char]>) -> Result<ParseOutcome, ParseError> {
        let root = self.grammar.root().ok_or(ParseError::EmptyGrammar)?;
        self.run(root, input)
    }

    fn run(&self, id: RuleId, input: Arc<[char]>) -> Result<ParseOutcome, ParseError> {
        let limit = self.config.effective_max_input_len();
        if input.len() > limit {
            return Err(ParseError::InputTooLarge {
                len: input.len(),
                limit,
            });
        }

        let rule = self.grammar.name(id).unwrap_or_default();
        debug!(target: "peg::parse", rule, len = input.len(), "parse started");

        let mut ctx = ParseContext::with_cursor(self.grammar, Cursor::with_chars(input));
        ctx.errors_mut().set_track_errors(self.config.track_errors);
        let matched = ctx.call_rule(id);
        let outcome = ctx.into_outcome(matched);

        debug!(
            target: "peg::parse",
            rule,
            matched,
            position = outcome.position(),
            errors = outcome.errors().len(),
            "parse finished"
        );
        Ok(outcome)
    }
}

/// The result of one parse: matched or not, where the cursor stopped, the
/// failure records and the captures.
///
/// A successful parse can still carry records, for example from an
/// `Optional` whose inner rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    matched: bool,
    position: usize,
    errors: Vec<ErrorRecord>,
    captures: Vec<CapturePosition>,
}

impl ParseOutcome {
    pub fn new(
        matched: bool,
        position: usize,
        errors: Vec<ErrorRecord>,
        captures: Vec<CapturePosition>,
    ) -> Self {
        Self {
            matched,
            position,
            errors,
            captures,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// Cursor offset when the root rule returned.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Failure records in the order they were logged.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn captures(&self) -> &[CapturePosition] {
        &self.captures
    }

    /// The range consumed by a successful parse; empty otherwise.
    pub fn span(&self) -> CapturePosition {
        if self.matched {
            CapturePosition::new(0, self.position)
        } else {
            CapturePosition::EMPTY
        }
    }

    pub fn deepest_error(&self) -> Option<&ErrorRecord> {
        tracker::deepest(&self.errors)
    }

    /// Turns a non-match into [`ParseError::NoMatch`].
    pub fn into_result(self) -> Result<Self, ParseError> {
        if self.matched {
            Ok(self)
        } else {
            Err(ParseError::NoMatch {
                position: self.position,
                errors: self.errors,
            })
        }
    }
}
