//! Grammar construction: reference resolution, validation and recursion.

use peg_framework::{Grammar, GrammarError, Rule};

#[test]
fn test_empty_grammar_is_rejected() {
    assert_eq!(Grammar::builder().build().unwrap_err(), GrammarError::Empty);
}

#[test]
fn test_duplicate_rule() {
    let err = Grammar::builder()
        .rule("a", 'a')
        .rule("a", 'b')
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::DuplicateRule {
            name: "a".to_string()
        }
    );
}

#[test]
fn test_undefined_reference() {
    let err = Grammar::builder()
        .rule("start", Rule::sequence('x', Rule::call("missing")))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::UndefinedRule {
            rule: "missing".to_string(),
            referenced_from: "start".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "rule `start` refers to undefined rule `missing`"
    );
}

#[test]
fn test_unknown_root() {
    let err = Grammar::builder()
        .rule("a", 'a')
        .root("b")
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::UnknownRoot {
            name: "b".to_string()
        }
    );
}

#[test]
fn test_nullable_repetition() {
    let err = Grammar::builder()
        .rule("list", Rule::zero_or_more(Rule::optional('a')))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::NullableRepetition {
            rule: "list".to_string()
        }
    );
}

#[test]
fn test_nullable_repetition_through_rule_call() {
    let err = Grammar::builder()
        .rule("list", Rule::one_or_more(Rule::call("maybe")))
        .rule("maybe", Rule::optional('a'))
        .build()
        .unwrap_err();
    assert!(matches!(err, GrammarError::NullableRepetition { rule } if rule == "list"));
}

#[test]
fn test_direct_left_recursion() {
    let expr = Rule::first_of(
        Rule::seq([Rule::call("expr"), Rule::ch('+'), Rule::call("term")]),
        Rule::call("term"),
    );
    let err = Grammar::builder()
        .rule("expr", expr)
        .rule("term", Rule::digit())
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::LeftRecursion {
            cycle: "expr -> expr".to_string()
        }
    );
}

#[test]
fn test_indirect_left_recursion() {
    let err = Grammar::builder()
        .rule("a", Rule::sequence(Rule::call("b"), 'x'))
        .rule("b", Rule::first_of(Rule::call("a"), 'y'))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::LeftRecursion {
            cycle: "a -> b -> a".to_string()
        }
    );
}

#[test]
fn test_left_recursion_behind_nullable_prefix() {
    let err = Grammar::builder()
        .rule(
            "a",
            Rule::seq([Rule::optional('x'), Rule::call("a"), Rule::ch('y')]),
        )
        .build()
        .unwrap_err();
    assert!(matches!(err, GrammarError::LeftRecursion { .. }));
}

#[test]
fn test_right_recursion_is_accepted() {
    let grammar = Grammar::builder()
        .rule("list", Rule::sequence('x', Rule::optional(Rule::call("list"))))
        .build()
        .unwrap();
    let outcome = grammar.parse("xxx").unwrap();
    assert!(outcome.is_match());
    assert_eq!(outcome.position(), 3);
}

#[test]
fn test_native_rules_are_opaque_to_validation() {
    let grammar = Grammar::builder()
        .rule("start", Rule::one_or_more(Rule::call("word")))
        .native("word", |ctx| {
            let mark = ctx.cursor().mark();
            let mut consumed = false;
            while ctx.cursor().peek().is_ascii_alphabetic() {
                ctx.cursor_mut().next_char();
                consumed = true;
            }
            if !consumed {
                ctx.cursor_mut().reset(mark);
            }
            consumed
        })
        .build()
        .unwrap();
    let outcome = grammar.parse("abc").unwrap();
    assert!(outcome.is_match());
    assert_eq!(outcome.position(), 3);
}

#[test]
fn test_native_rule_delegates_through_its_grammar() {
    // Skips any run of blanks, then hands over to whichever rule is named
    // `token` in the grammar it runs against.
    let grammar = Grammar::builder()
        .rule("start", Rule::sequence(Rule::call("skip"), Rule::eoi()))
        .native("skip", |ctx| {
            while ctx.cursor().peek() == ' ' {
                ctx.cursor_mut().next_char();
            }
            match ctx.grammar().rule_id("token") {
                Some(id) => ctx.call_rule(id),
                None => false,
            }
        })
        .rule("token", Rule::literal("ok"))
        .build()
        .unwrap();

    assert!(grammar.parse("  ok").unwrap().is_match());
    let outcome = grammar.parse("  no").unwrap();
    assert!(!outcome.is_match());
    assert_eq!(outcome.errors()[0].description, "LiteralString(ok) failed");
    assert_eq!(outcome.errors()[0].position, 2);
}

fn parens() -> Grammar {
    Grammar::builder()
        .rule("start", Rule::sequence(Rule::call("parens"), Rule::eoi()))
        .rule(
            "parens",
            Rule::zero_or_more(Rule::seq([
                Rule::ch('('),
                Rule::call("parens"),
                Rule::ch(')'),
            ])),
        )
        .build()
        .unwrap()
}

#[test]
fn test_recursive_rules() {
    let grammar = parens();
    for input in ["", "()", "(()())", "((()))()"] {
        assert!(grammar.parse(input).unwrap().is_match(), "{:?}", input);
    }
    for input in ["(", "(()", "())", ")("] {
        assert!(!grammar.parse(input).unwrap().is_match(), "{:?}", input);
    }
}

#[test]
fn test_rule_call_failure_is_recorded() {
    let grammar = Grammar::builder()
        .rule("start", Rule::sequence(Rule::call("word"), Rule::eoi()))
        .rule("word", Rule::one_or_more(Rule::range('a', 'z')))
        .build()
        .unwrap();

    let outcome = grammar.parse("1").unwrap();
    let descriptions: Vec<String> = outcome
        .errors()
        .iter()
        .map(|r| r.description.to_string())
        .collect();
    assert_eq!(
        descriptions,
        [
            "CharRange(a..=z) failed",
            "Sequence failed",
            "RuleCall(word) failed",
            "Sequence failed",
        ]
    );
    assert!(outcome.errors().iter().all(|r| r.position == 0));
}

#[test]
fn test_grammar_lookups() {
    let grammar = parens();
    let id = grammar.rule_id("parens").unwrap();
    assert_eq!(grammar.name(id), Some("parens"));
    assert_eq!(grammar.root(), grammar.rule_id("start"));
    assert!(grammar.rule_id("nope").is_none());
    assert!(!grammar.is_empty());
}
