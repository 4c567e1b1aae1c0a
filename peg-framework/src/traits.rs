use crate::context::ParseContext;
use crate::rule::Rule;

/// Anything that can attempt a match against a parse context.
///
/// This is the contract every named rule satisfies: given the cursor and
/// error log of the current parse, report matched or not-matched and leave
/// both in the post-state the rule documents. Combinator trees implement it,
/// and so does any plain function or closure, which lets hand-written
/// recognizers sit in a grammar next to combinator rules.
///
/// Matchers are shared by every parse running against a grammar, so they
/// must be `Send + Sync` and must keep all per-parse state in the context.
pub trait Matcher: Send + Sync {
    fn matches(&self, ctx: &mut ParseContext<'_>) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&mut ParseContext<'_>) -> bool + Send + Sync,
{
    #[inline]
    fn matches(&self, ctx: &mut ParseContext<'_>) -> bool {
        self(ctx)
    }
}

impl Matcher for Rule {
    #[inline]
    fn matches(&self, ctx: &mut ParseContext<'_>) -> bool {
        Rule::matches(self, ctx)
    }
}
