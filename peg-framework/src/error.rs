use peg_runtime::ErrorRecord;
use thiserror::Error;

/// Problems found while assembling a [`Grammar`](crate::Grammar).
///
/// Everything here would otherwise surface at match time as a hang or a
/// silently failing rule call, so the builder refuses to produce a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar defines no rules")]
    Empty,

    #[error("rule `{name}` is defined more than once")]
    DuplicateRule { name: String },

    #[error("rule `{referenced_from}` refers to undefined rule `{rule}`")]
    UndefinedRule {
        rule: String,
        referenced_from: String,
    },

    #[error("root rule `{name}` is not defined")]
    UnknownRoot { name: String },

    #[error("rule `{rule}` repeats an expression that can match empty input")]
    NullableRepetition { rule: String },

    #[error("left recursion: {cycle}")]
    LeftRecursion { cycle: String },
}

/// Errors returned by [`Parser`](crate::Parser).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input has {len} characters, limit is {limit}")]
    InputTooLarge { len: usize, limit: usize },

    #[error("unknown rule `{name}`")]
    UnknownRule { name: String },

    #[error("grammar has no root rule")]
    EmptyGrammar,

    #[error("input did not match (stopped at offset {position}, {} error records)", .errors.len())]
    NoMatch {
        position: usize,
        errors: Vec<ErrorRecord>,
    },
}
