//! A parsing expression grammar engine.
//!
//! Grammars are trees of [`Rule`] combinators registered by name in a
//! [`Grammar`]; a [`Parser`] evaluates them over an in-memory input and
//! reports matched or not-matched together with the failure records and
//! captures collected on the way.
//!
//! ```
//! use peg_framework::{Grammar, Rule};
//!
//! let grammar = Grammar::builder()
//!     .rule("number", Rule::sequence(Rule::one_or_more(Rule::digit()), Rule::eoi()))
//!     .build()
//!     .unwrap();
//!
//! assert!(grammar.parse("123").unwrap().is_match());
//! assert!(!grammar.parse("12a").unwrap().is_match());
//! ```

mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod rule;
pub mod traits;

pub use config::ParserConfig;
pub use context::ParseContext;
pub use error::{GrammarError, ParseError};
pub use grammar::{Grammar, GrammarBuilder, RuleBody, RuleId};
pub use parser::{ParseOutcome, Parser};
pub use peg_common::{capture, CapturePosition, Checkpoint, ErrorsMark, Mark};
pub use peg_runtime::{Cursor, ErrorRecord, ErrorTracker, EOI};
pub use rule::{Rule, RuleRef};
pub use traits::Matcher;
