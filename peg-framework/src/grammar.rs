use crate::analysis;
use crate::error::GrammarError;
use crate::parser::{ParseOutcome, Parser};
use crate::rule::{Rule, RuleRef};
use crate::traits::Matcher;
use crate::{context::ParseContext, error::ParseError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Index of a rule inside its [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a named rule evaluates.
#[derive(Clone)]
pub enum RuleBody {
    /// A combinator tree.
    Expr(Rule),
    /// A hand-written matcher. It is opaque to grammar validation.
    Native(Arc<dyn Matcher>),
}

impl fmt::Debug for RuleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleBody::Expr(rule) => f.debug_tuple("Expr").field(rule).finish(),
            RuleBody::Native(_) => f.write_str("Native(..)"),
        }
    }
}

#[derive(Debug, Clone)]
struct RuleDef {
    name: Arc<str>,
    body: RuleBody,
}

/// A registry of named rules with every reference resolved.
///
/// Built once through [`GrammarBuilder`] and read-only afterwards; share it
/// by reference (or behind an `Arc`) between as many parses as needed.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<RuleDef>,
    index: HashMap<Arc<str>, RuleId>,
    root: Option<RuleId>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: RuleId) -> Option<&str> {
        self.rules.get(id.0).map(|def| def.name.as_ref())
    }

    pub fn body(&self, id: RuleId) -> Option<&RuleBody> {
        self.rules.get(id.0).map(|def| &def.body)
    }

    /// The rule a plain [`Parser::parse`] starts from.
    pub fn root(&self) -> Option<RuleId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in definition order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &str, &RuleBody)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, def)| (RuleId(i), def.name.as_ref(), &def.body))
    }

    /// Parses `input` from the root rule with the default configuration.
    pub fn parse(&self, input: &str) -> Result<ParseOutcome, ParseError> {
        Parser::new(self).parse(input)
    }
}

/// Collects rule definitions and turns them into a validated [`Grammar`].
#[derive(Default)]
pub struct GrammarBuilder {
    rules: Vec<(Arc<str>, RuleBody)>,
    root: Option<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a rule. The first rule defined is the root unless
    /// [`root`](Self::root) says otherwise.
    pub fn rule(mut self, name: &str, rule: impl Into<Rule>) -> Self {
        self.rules.push((Arc::from(name), RuleBody::Expr(rule.into())));
        self
    }

    /// Defines a rule implemented by a function or closure.
    pub fn native<F>(self, name: &str, matcher: F) -> Self
    where
        F: Fn(&mut ParseContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.native_matcher(name, matcher)
    }

    pub fn native_matcher(mut self, name: &str, matcher: impl Matcher + 'static) -> Self {
        self.rules
            .push((Arc::from(name), RuleBody::Native(Arc::new(matcher))));
        self
    }

    pub fn root(mut self, name: &str) -> Self {
        self.root = Some(name.to_string());
        self
    }

    /// Resolves every rule reference and validates the result.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut index = HashMap::with_capacity(self.rules.len());
        for (i, (name, _)) in self.rules.iter().enumerate() {
            if index.insert(Arc::clone(name), RuleId(i)).is_some() {
                return Err(GrammarError::DuplicateRule {
                    name: name.to_string(),
                });
            }
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for (name, mut body) in self.rules {
            if let RuleBody::Expr(rule) = &mut body {
                rule.try_for_each_ref_mut(&mut |reference: &mut RuleRef| {
                    match index.get(reference.name()) {
                        Some(&id) => {
                            reference.bind(id);
                            Ok(())
                        }
                        None => Err(GrammarError::UndefinedRule {
                            rule: reference.name().to_string(),
                            referenced_from: name.to_string(),
                        }),
                    }
                })?;
            }
            rules.push(RuleDef { name, body });
        }

        let root = match self.root {
            Some(name) => match index.get(name.as_str()) {
                Some(&id) => id,
                None => return Err(GrammarError::UnknownRoot { name }),
            },
            None => RuleId(0),
        };

        let grammar = Grammar {
            rules,
            index,
            root: Some(root),
        };
        analysis::validate(&grammar)?;

        debug!(
            rules = grammar.len(),
            root = grammar.name(root).unwrap_or_default(),
            "grammar built"
        );
        Ok(grammar)
    }
}
