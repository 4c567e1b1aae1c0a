//! The combinator tree and its matching semantics.
//!
//! Every node evaluates against a [`ParseContext`] and answers matched or
//! not-matched. The cursor and error-log post-states are part of each node's
//! contract and are relied on by the nodes around it:
//!
//! * `Sequence` resets the cursor only when its first half fails. When the
//!   second half fails the cursor stays wherever it stopped, so the furthest
//!   progress is still visible to diagnostics.
//! * `FirstOf` clears every record logged since it started once its second
//!   alternative succeeds.
//! * `LiteralString` rewinds on failure, `LiteralChar` does not: the single
//!   read has already advanced the cursor.
//! * `ZeroOrMore` mutes the error log while it probes for the failing
//!   iteration that ends it.
//!
//! Any node that fails also drops the captures recorded while it ran.

use crate::context::ParseContext;
use crate::grammar::RuleId;
use peg_common::CapturePosition;
use peg_runtime::EOI;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A parsing expression.
///
/// Trees are immutable once built and carry no per-parse state, so one tree
/// can serve any number of parses, concurrently included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Sequence(Box<Rule>, Box<Rule>),
    FirstOf(Box<Rule>, Box<Rule>),
    LiteralString(String),
    /// A single character. `LiteralChar(EOI)` matches the end of input and
    /// never a U+FFFF inside it.
    LiteralChar(char),
    /// Any character in `lo..=hi`. Never matches at the end of input.
    CharRange(char, char),
    /// Any character; fails only at the end of input.
    AnyChar,
    Optional(Box<Rule>),
    ZeroOrMore(Box<Rule>),
    /// Same as `Sequence(inner, ZeroOrMore(inner))`.
    OneOrMore(Box<Rule>),
    AndPredicate(Box<Rule>),
    NotPredicate(Box<Rule>),
    RuleCall(RuleRef),
    /// Records the range matched by the inner rule.
    Capture(Box<Rule>),
    Empty,
}

/// A by-name reference to a grammar rule.
///
/// References start unresolved and are bound to a [`RuleId`] when the
/// grammar is built, which is what allows forward and self references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRef {
    name: Arc<str>,
    id: Option<RuleId>,
}

impl RuleRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound rule, once the grammar has been built.
    pub fn id(&self) -> Option<RuleId> {
        self.id
    }

    pub(crate) fn bind(&mut self, id: RuleId) {
        self.id = Some(id);
    }
}

impl Rule {
    pub fn sequence(lhs: impl Into<Rule>, rhs: impl Into<Rule>) -> Self {
        Rule::Sequence(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn first_of(lhs: impl Into<Rule>, rhs: impl Into<Rule>) -> Self {
        Rule::FirstOf(Box::new(lhs.into()), Box::new(rhs.into()))
    }

    /// Chains rules into right-nested sequences. No rules gives `Empty`.
    pub fn seq<I>(rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Rule>,
    {
        let rules: Vec<Rule> = rules.into_iter().map(Into::into).collect();
        rules
            .into_iter()
            .rev()
            .reduce(|rest, rule| Rule::sequence(rule, rest))
            .unwrap_or(Rule::Empty)
    }

    /// Chains alternatives into right-nested ordered choices.
    ///
    /// No alternatives gives a rule that always fails.
    pub fn choice<I>(rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Rule>,
    {
        let rules: Vec<Rule> = rules.into_iter().map(Into::into).collect();
        rules
            .into_iter()
            .rev()
            .reduce(|rest, rule| Rule::first_of(rule, rest))
            .unwrap_or_else(|| Rule::not(Rule::Empty))
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Rule::LiteralString(text.into())
    }

    pub fn ch(ch: char) -> Self {
        Rule::LiteralChar(ch)
    }

    pub fn range(lo: char, hi: char) -> Self {
        Rule::CharRange(lo, hi)
    }

    pub fn digit() -> Self {
        Rule::CharRange('0', '9')
    }

    pub fn any() -> Self {
        Rule::AnyChar
    }

    /// Matches only at the end of input.
    pub fn eoi() -> Self {
        Rule::LiteralChar(EOI)
    }

    pub fn optional(inner: impl Into<Rule>) -> Self {
        Rule::Optional(Box::new(inner.into()))
    }

    pub fn zero_or_more(inner: impl Into<Rule>) -> Self {
        Rule::ZeroOrMore(Box::new(inner.into()))
    }

    pub fn one_or_more(inner: impl Into<Rule>) -> Self {
        Rule::OneOrMore(Box::new(inner.into()))
    }

    pub fn and(inner: impl Into<Rule>) -> Self {
        Rule::AndPredicate(Box::new(inner.into()))
    }

    pub fn not(inner: impl Into<Rule>) -> Self {
        Rule::NotPredicate(Box::new(inner.into()))
    }

    pub fn call(name: impl Into<Arc<str>>) -> Self {
        Rule::RuleCall(RuleRef::new(name))
    }

    pub fn capture(inner: impl Into<Rule>) -> Self {
        Rule::Capture(Box::new(inner.into()))
    }

    pub fn empty() -> Self {
        Rule::Empty
    }

    /// Attempts a match at the cursor's current offset.
    pub fn matches(&self, ctx: &mut ParseContext<'_>) -> bool {
        let captures = ctx.captures_mark();
        let matched = self.match_node(ctx);
        if !matched {
            ctx.reset_captures(captures);
        }
        matched
    }

    fn match_node(&self, ctx: &mut ParseContext<'_>) -> bool {
        match self {
            Rule::Sequence(lhs, rhs) => {
                sequence(ctx, |ctx| lhs.matches(ctx), |ctx| rhs.matches(ctx))
            }
            Rule::FirstOf(lhs, rhs) => {
                let errors = ctx.errors().errors_mark();
                let mark = ctx.cursor().mark();
                if lhs.matches(ctx) {
                    return true;
                }
                ctx.cursor_mut().reset(mark);
                if rhs.matches(ctx) {
                    ctx.errors_mut().reset_errors(errors);
                    return true;
                }
                ctx.errors_mut().add_error(mark, "FirstOf failed");
                false
            }
            Rule::LiteralString(text) => {
                let mark = ctx.cursor().mark();
                for expected in text.chars() {
                    if ctx.cursor_mut().advance() != Some(expected) {
                        ctx.cursor_mut().reset(mark);
                        ctx.errors_mut()
                            .add_error_with(mark, || format!("LiteralString({text}) failed"));
                        return false;
                    }
                }
                true
            }
            Rule::LiteralChar(expected) => single_char(
                ctx,
                |ch| match ch {
                    Some(ch) => *expected != EOI && ch == *expected,
                    None => *expected == EOI,
                },
                || format!("LiteralChar({}) failed", display_char(*expected)),
            ),
            Rule::CharRange(lo, hi) => single_char(
                ctx,
                |ch| ch.is_some_and(|ch| (*lo..=*hi).contains(&ch)),
                || {
                    format!(
                        "CharRange({}..={}) failed",
                        display_char(*lo),
                        display_char(*hi)
                    )
                },
            ),
            Rule::AnyChar => single_char(ctx, |ch| ch.is_some(), || "AnyChar failed"),
            Rule::Optional(inner) => {
                let mark = ctx.cursor().mark();
                if !inner.matches(ctx) {
                    ctx.cursor_mut().reset(mark);
                }
                true
            }
            Rule::ZeroOrMore(inner) => {
                repeat(inner, ctx);
                true
            }
            Rule::OneOrMore(inner) => sequence(
                ctx,
                |ctx| inner.matches(ctx),
                |ctx| {
                    repeat(inner, ctx);
                    true
                },
            ),
            Rule::AndPredicate(inner) => {
                let checkpoint = ctx.checkpoint();
                let matched = inner.matches(ctx);
                ctx.restore(checkpoint);
                if !matched {
                    ctx.errors_mut()
                        .add_error(checkpoint.mark(), "AndPredicate failed");
                }
                matched
            }
            Rule::NotPredicate(inner) => {
                let checkpoint = ctx.checkpoint();
                let matched = inner.matches(ctx);
                ctx.restore(checkpoint);
                if matched {
                    ctx.errors_mut()
                        .add_error(checkpoint.mark(), "NotPredicate failed");
                }
                !matched
            }
            Rule::RuleCall(reference) => {
                let mark = ctx.cursor().mark();
                // Unbound references only occur in trees that never went
                // through a grammar build; they simply fail.
                let matched = match reference.id() {
                    Some(id) => ctx.call_rule(id),
                    None => false,
                };
                if !matched {
                    ctx.errors_mut().add_error_with(mark, || {
                        format!("RuleCall({}) failed", reference.name())
                    });
                }
                matched
            }
            Rule::Capture(inner) => {
                let start = ctx.cursor().offset();
                if !inner.matches(ctx) {
                    return false;
                }
                let end = ctx.cursor().offset();
                ctx.push_capture(CapturePosition::new(start, end));
                true
            }
            Rule::Empty => true,
        }
    }

    /// Calls `f` on this node and every node below it, parents first.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Rule)) {
        f(self);
        match self {
            Rule::Sequence(lhs, rhs) | Rule::FirstOf(lhs, rhs) => {
                lhs.walk(f);
                rhs.walk(f);
            }
            Rule::Optional(inner)
            | Rule::ZeroOrMore(inner)
            | Rule::OneOrMore(inner)
            | Rule::AndPredicate(inner)
            | Rule::NotPredicate(inner)
            | Rule::Capture(inner) => inner.walk(f),
            Rule::LiteralString(_)
            | Rule::LiteralChar(_)
            | Rule::CharRange(..)
            | Rule::AnyChar
            | Rule::RuleCall(_)
            | Rule::Empty => {}
        }
    }

    /// Visits every rule reference in the tree, stopping at the first error.
    pub(crate) fn try_for_each_ref_mut<E>(
        &mut self,
        f: &mut dyn FnMut(&mut RuleRef) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Rule::Sequence(lhs, rhs) | Rule::FirstOf(lhs, rhs) => {
                lhs.try_for_each_ref_mut(f)?;
                rhs.try_for_each_ref_mut(f)
            }
            Rule::Optional(inner)
            | Rule::ZeroOrMore(inner)
            | Rule::OneOrMore(inner)
            | Rule::AndPredicate(inner)
            | Rule::NotPredicate(inner)
            | Rule::Capture(inner) => inner.try_for_each_ref_mut(f),
            Rule::RuleCall(reference) => f(reference),
            Rule::LiteralString(_)
            | Rule::LiteralChar(_)
            | Rule::CharRange(..)
            | Rule::AnyChar
            | Rule::Empty => Ok(()),
        }
    }
}

/// Shared by `Sequence` and `OneOrMore`.
#[inline]
fn sequence<L, R>(ctx: &mut ParseContext<'_>, lhs: L, rhs: R) -> bool
where
    L: FnOnce(&mut ParseContext<'_>) -> bool,
    R: FnOnce(&mut ParseContext<'_>) -> bool,
{
    let mark = ctx.cursor().mark();
    if !lhs(ctx) {
        ctx.cursor_mut().reset(mark);
        ctx.errors_mut().add_error(mark, "Sequence failed");
        return false;
    }
    if rhs(ctx) {
        return true;
    }
    ctx.errors_mut().add_error(mark, "Sequence failed");
    false
}

/// Reads one character and tests it, `None` standing for the end of input.
/// The cursor stays advanced either way.
#[inline]
fn single_char<P, F, D>(ctx: &mut ParseContext<'_>, accept: P, description: F) -> bool
where
    P: FnOnce(Option<char>) -> bool,
    F: FnOnce() -> D,
    D: Into<Cow<'static, str>>,
{
    let mark = ctx.cursor().mark();
    if accept(ctx.cursor_mut().advance()) {
        return true;
    }
    ctx.errors_mut().add_error_with(mark, description);
    false
}

/// The body of `ZeroOrMore`, also the tail of `OneOrMore`.
fn repeat(inner: &Rule, ctx: &mut ParseContext<'_>) {
    let mut mark = ctx.cursor().mark();
    let tracking = ctx.errors_mut().set_track_errors(false);
    while inner.matches(ctx) {
        let next = ctx.cursor().mark();
        // An iteration that consumed nothing would repeat forever.
        if next == mark {
            break;
        }
        mark = next;
    }
    ctx.errors_mut().set_track_errors(tracking);
    ctx.cursor_mut().reset(mark);
}

fn display_char(ch: char) -> Cow<'static, str> {
    if ch == EOI {
        Cow::Borrowed("EOI")
    } else {
        Cow::Owned(ch.escape_debug().to_string())
    }
}

impl From<&str> for Rule {
    fn from(text: &str) -> Self {
        Rule::literal(text)
    }
}

impl From<String> for Rule {
    fn from(text: String) -> Self {
        Rule::LiteralString(text)
    }
}

impl From<char> for Rule {
    fn from(ch: char) -> Self {
        Rule::LiteralChar(ch)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Sequence(lhs, rhs) => write!(f, "({lhs} {rhs})"),
            Rule::FirstOf(lhs, rhs) => write!(f, "({lhs} / {rhs})"),
            Rule::LiteralString(text) => write!(f, "{text:?}"),
            Rule::LiteralChar(ch) if *ch == EOI => write!(f, "EOI"),
            Rule::LiteralChar(ch) => write!(f, "{ch:?}"),
            Rule::CharRange(lo, hi) => write!(f, "[{}-{}]", lo.escape_debug(), hi.escape_debug()),
            Rule::AnyChar => write!(f, "."),
            Rule::Optional(inner) => write!(f, "{inner}?"),
            Rule::ZeroOrMore(inner) => write!(f, "{inner}*"),
            Rule::OneOrMore(inner) => write!(f, "{inner}+"),
            Rule::AndPredicate(inner) => write!(f, "&{inner}"),
            Rule::NotPredicate(inner) => write!(f, "!{inner}"),
            Rule::RuleCall(reference) => write!(f, "{}", reference.name()),
            Rule::Capture(inner) => write!(f, "<{inner}>"),
            Rule::Empty => write!(f, "()"),
        }
    }
}
