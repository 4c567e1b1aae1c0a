//! Construction-time checks on a resolved grammar.
//!
//! The matcher itself never guards against left recursion or against a
//! repetition of something that matches empty input. Both are found here,
//! before the grammar is handed out.

use crate::error::GrammarError;
use crate::grammar::{Grammar, RuleBody, RuleId};
use crate::rule::Rule;

pub(crate) fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    let nullable = nullable_rules(grammar);
    check_repetitions(grammar, &nullable)?;
    check_left_recursion(grammar, &nullable)
}

/// For each rule, whether it can succeed without consuming input.
/// Native rules count as non-nullable.
pub(crate) fn nullable_rules(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.len()];
    loop {
        let mut changed = false;
        for (id, _, body) in grammar.rules() {
            if nullable[id.index()] {
                continue;
            }
            if let RuleBody::Expr(rule) = body {
                if is_nullable(rule, &nullable) {
                    nullable[id.index()] = true;
                    changed = true;
                }
            }
        }
        if !changed {
            return nullable;
        }
    }
}

pub(crate) fn is_nullable(rule: &Rule, nullable: &[bool]) -> bool {
    match rule {
        Rule::Sequence(lhs, rhs) => is_nullable(lhs, nullable) && is_nullable(rhs, nullable),
        Rule::FirstOf(lhs, rhs) => is_nullable(lhs, nullable) || is_nullable(rhs, nullable),
        Rule::LiteralString(text) => text.is_empty(),
        Rule::LiteralChar(_) | Rule::CharRange(..) | Rule::AnyChar => false,
        Rule::Optional(_)
        | Rule::ZeroOrMore(_)
        | Rule::AndPredicate(_)
        | Rule::NotPredicate(_)
        | Rule::Empty => true,
        Rule::OneOrMore(inner) | Rule::Capture(inner) => is_nullable(inner, nullable),
        Rule::RuleCall(reference) => reference
            .id()
            .map_or(false, |id| nullable[id.index()]),
    }
}

fn check_repetitions(grammar: &Grammar, nullable: &[bool]) -> Result<(), GrammarError> {
    for (_, name, body) in grammar.rules() {
        let RuleBody::Expr(rule) = body else {
            continue;
        };
        let mut offending = false;
        rule.walk(&mut |node| {
            if let Rule::ZeroOrMore(inner) | Rule::OneOrMore(inner) = node {
                offending |= is_nullable(inner, nullable);
            }
        });
        if offending {
            return Err(GrammarError::NullableRepetition {
                rule: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Rules that `rule` may call before it has consumed any input.
fn leading_calls(rule: &Rule, nullable: &[bool], out: &mut Vec<RuleId>) {
    match rule {
        Rule::Sequence(lhs, rhs) => {
            leading_calls(lhs, nullable, out);
            if is_nullable(lhs, nullable) {
                leading_calls(rhs, nullable, out);
            }
        }
        Rule::FirstOf(lhs, rhs) => {
            leading_calls(lhs, nullable, out);
            leading_calls(rhs, nullable, out);
        }
        Rule::Optional(inner)
        | Rule::ZeroOrMore(inner)
        | Rule::OneOrMore(inner)
        | Rule::AndPredicate(inner)
        | Rule::NotPredicate(inner)
        | Rule::Capture(inner) => leading_calls(inner, nullable, out),
        Rule::RuleCall(reference) => out.extend(reference.id()),
        Rule::LiteralString(_)
        | Rule::LiteralChar(_)
        | Rule::CharRange(..)
        | Rule::AnyChar
        | Rule::Empty => {}
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

fn check_left_recursion(grammar: &Grammar, nullable: &[bool]) -> Result<(), GrammarError> {
    let edges: Vec<Vec<RuleId>> = grammar
        .rules()
        .map(|(_, _, body)| {
            let mut calls = Vec::new();
            if let RuleBody::Expr(rule) = body {
                leading_calls(rule, nullable, &mut calls);
            }
            calls
        })
        .collect();

    let mut state = vec![Visit::Unvisited; grammar.len()];
    let mut path = Vec::new();
    for (id, _, _) in grammar.rules() {
        if state[id.index()] == Visit::Unvisited {
            if let Some(cycle) = find_cycle(id, &edges, &mut state, &mut path) {
                let names: Vec<&str> = cycle
                    .iter()
                    .map(|&id| grammar.name(id).unwrap_or("?"))
                    .collect();
                return Err(GrammarError::LeftRecursion {
                    cycle: names.join(" -> "),
                });
            }
        }
    }
    Ok(())
}

/// Depth-first search; returns the cycle with its first rule repeated at
/// the end, e.g. `[a, b, a]`.
fn find_cycle(
    id: RuleId,
    edges: &[Vec<RuleId>],
    state: &mut [Visit],
    path: &mut Vec<RuleId>,
) -> Option<Vec<RuleId>> {
    state[id.index()] = Visit::InProgress;
    path.push(id);
    for &next in &edges[id.index()] {
        match state[next.index()] {
            Visit::InProgress => {
                let start = path.iter().position(|&p| p == next).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            Visit::Unvisited => {
                if let Some(cycle) = find_cycle(next, edges, state, path) {
                    return Some(cycle);
                }
            }
            Visit::Done => {}
        }
    }
    path.pop();
    state[id.index()] = Visit::Done;
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_fixpoint_through_calls() {
        let grammar = Grammar::builder()
            .rule("a", Rule::sequence(Rule::call("b"), Rule::call("c")))
            .rule("b", Rule::optional('x'))
            .rule("c", Rule::first_of('y', Rule::call("b")))
            .rule("d", Rule::sequence(Rule::call("c"), 'z'))
            .build()
            .unwrap();
        assert_eq!(nullable_rules(&grammar), [true, true, true, false]);
    }

    #[test]
    fn test_leading_calls_stop_at_consuming_prefix() {
        let grammar = Grammar::builder()
            .rule("list", Rule::sequence('x', Rule::optional(Rule::call("list"))))
            .rule("pick", Rule::first_of('x', Rule::call("list")))
            .build()
            .unwrap();
        let nullable = nullable_rules(&grammar);

        let body = |name: &str| grammar.rule_id(name).and_then(|id| grammar.body(id));

        let mut calls = Vec::new();
        if let Some(RuleBody::Expr(rule)) = body("list") {
            leading_calls(rule, &nullable, &mut calls);
        }
        assert!(calls.is_empty());

        if let Some(RuleBody::Expr(rule)) = body("pick") {
            leading_calls(rule, &nullable, &mut calls);
        }
        assert_eq!(calls, grammar.rule_id("list").into_iter().collect::<Vec<_>>());
    }
}
