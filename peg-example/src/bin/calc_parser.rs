//! Arithmetic expression parser.
//!
//! ```text
//! program <- ws expr EOI
//! expr    <- term (<[+-]> ws term)*
//! term    <- unary (<[*/]> ws unary)*
//! unary   <- <'-'> ws unary / factor
//! factor  <- (number / <'('> ws expr <')'>) ws
//! number  <- <[0-9]+ ('.' [0-9]+)?>
//! ws      <- ' '*
//! ```
//!
//! Every token is captured, so the capture list is the token stream in
//! input order. The grammar only validates; evaluation walks that stream.

use clap::Parser as ClapParser;
use peg_example::cli::{self, CommonArgs};
use peg_framework::{CapturePosition, Cursor, Grammar, GrammarError, Parser, Rule};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Debug, ClapParser)]
#[command(name = "calc-parser", about = "Parse and evaluate an arithmetic expression")]
struct Cli {
    /// Expression to parse, e.g. "2 * (3 + 4)"
    expression: String,

    /// Only validate, do not evaluate
    #[arg(long)]
    no_eval: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn calc_grammar() -> Result<Grammar, GrammarError> {
    let pair = |a: char, b: char| Rule::capture(Rule::first_of(a, b));
    Grammar::builder()
        .rule(
            "program",
            Rule::seq([Rule::call("ws"), Rule::call("expr"), Rule::eoi()]),
        )
        .rule(
            "expr",
            Rule::sequence(
                Rule::call("term"),
                Rule::zero_or_more(Rule::seq([
                    pair('+', '-'),
                    Rule::call("ws"),
                    Rule::call("term"),
                ])),
            ),
        )
        .rule(
            "term",
            Rule::sequence(
                Rule::call("unary"),
                Rule::zero_or_more(Rule::seq([
                    pair('*', '/'),
                    Rule::call("ws"),
                    Rule::call("unary"),
                ])),
            ),
        )
        .rule(
            "unary",
            Rule::first_of(
                Rule::seq([
                    Rule::capture('-'),
                    Rule::call("ws"),
                    Rule::call("unary"),
                ]),
                Rule::call("factor"),
            ),
        )
        .rule(
            "factor",
            Rule::sequence(
                Rule::first_of(
                    Rule::call("number"),
                    Rule::seq([
                        Rule::capture('('),
                        Rule::call("ws"),
                        Rule::call("expr"),
                        Rule::capture(')'),
                    ]),
                ),
                Rule::call("ws"),
            ),
        )
        .rule(
            "number",
            Rule::capture(Rule::sequence(
                Rule::one_or_more(Rule::digit()),
                Rule::optional(Rule::sequence('.', Rule::one_or_more(Rule::digit()))),
            )),
        )
        .rule("ws", Rule::zero_or_more(' '))
        .build()
}

fn tokens(input: &str, captures: &[CapturePosition]) -> Vec<String> {
    let cursor = Cursor::new(input);
    captures
        .iter()
        .filter_map(|&capture| cursor.text(capture))
        .collect()
}

/// Precedence climbing over the captured token stream. The stream has
/// already been validated by the grammar, so `None` only means the two
/// disagree.
struct Evaluator<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Evaluator<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn evaluate(mut self) -> Option<f64> {
        let value = self.expr()?;
        (self.pos == self.tokens.len()).then_some(value)
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn bump(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op @ ("+" | "-")) = self.peek() {
            let add = op == "+";
            self.pos += 1;
            let rhs = self.term()?;
            value = if add { value + rhs } else { value - rhs };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        while let Some(op @ ("*" | "/")) = self.peek() {
            let mul = op == "*";
            self.pos += 1;
            let rhs = self.unary()?;
            value = if mul { value * rhs } else { value / rhs };
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        match self.bump()? {
            "-" => self.unary().map(|value| -value),
            "(" => {
                let value = self.expr()?;
                (self.bump()? == ")").then_some(value)
            }
            number => number.parse().ok(),
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli::load_config(cli.common.config.as_deref())?;
    let grammar = calc_grammar()?;
    if cli.common.show_grammar {
        cli::print_grammar(&grammar);
    }

    let outcome = Parser::new(&grammar)
        .with_config(config)
        .parse(&cli.expression)?;

    let summary = if outcome.is_match() && !cli.no_eval {
        let tokens = tokens(&cli.expression, outcome.captures());
        debug!(?tokens, "captured tokens");
        let value = Evaluator::new(&tokens)
            .evaluate()
            .ok_or("captured tokens do not form an expression")?;
        info!(value, "evaluated");
        Some(format!("= {value}"))
    } else {
        None
    };

    cli::print_outcome(
        &cli.expression,
        &outcome,
        summary.as_deref(),
        cli.common.json,
    )?;
    Ok(outcome.is_match())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(&cli.common.log_level);
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
