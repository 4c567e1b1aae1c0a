//! JSON validator.
//!
//! ```text
//! json    <- ws <value> ws EOI
//! value   <- object / array / string / number / "true" / "false" / "null"
//! element <- value ws
//! object  <- '{' ws (member (',' ws member)*)? '}'
//! member  <- string ws ':' ws element
//! array   <- '[' ws (element (',' ws element)*)? ']'
//! string  <- '"' (escape / !('"' / '\\' / [\0-\x1f]) .)* '"'
//! escape  <- '\\' (["\\/bfnrt] / 'u' hex hex hex hex)
//! number  <- '-'? ('0' / [1-9] [0-9]*) ('.' [0-9]+)? ([eE] [+-]? [0-9]+)?
//! ws      <- [ \t\n\r]*
//! ```
//!
//! `hex` is a native rule. The top-level value is captured without the
//! whitespace around it.

use clap::Parser as ClapParser;
use peg_example::cli::{self, CommonArgs};
use peg_framework::{Cursor, Grammar, GrammarError, ParseContext, Parser, Rule};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, ClapParser)]
#[command(name = "json-parser", about = "Validate a JSON document")]
struct Cli {
    /// JSON text; read from --file or stdin when absent
    input: Option<String>,

    /// Read the document from a file
    #[arg(long, short, value_name = "FILE", conflicts_with = "input")]
    file: Option<PathBuf>,

    /// Start from this rule instead of `json` (e.g. "number")
    #[arg(long)]
    rule: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

fn hex_digit(ctx: &mut ParseContext<'_>) -> bool {
    let mark = ctx.cursor().mark();
    if ctx.cursor_mut().next_char().is_ascii_hexdigit() {
        return true;
    }
    ctx.cursor_mut().reset(mark);
    ctx.errors_mut().add_error(mark, "hex digit expected");
    false
}

fn json_grammar() -> Result<Grammar, GrammarError> {
    let ws = || Rule::call("ws");
    let digits = || Rule::one_or_more(Rule::digit());
    let comma_list = |item: &str| {
        Rule::optional(Rule::sequence(
            Rule::call(item),
            Rule::zero_or_more(Rule::seq([Rule::ch(','), ws(), Rule::call(item)])),
        ))
    };

    Grammar::builder()
        .rule(
            "json",
            Rule::seq([ws(), Rule::capture(Rule::call("value")), ws(), Rule::eoi()]),
        )
        .rule(
            "value",
            Rule::choice([
                Rule::call("object"),
                Rule::call("array"),
                Rule::call("string"),
                Rule::call("number"),
                Rule::literal("true"),
                Rule::literal("false"),
                Rule::literal("null"),
            ]),
        )
        .rule("element", Rule::sequence(Rule::call("value"), ws()))
        .rule(
            "object",
            Rule::seq([Rule::ch('{'), ws(), comma_list("member"), Rule::ch('}')]),
        )
        .rule(
            "member",
            Rule::seq([
                Rule::call("string"),
                ws(),
                Rule::ch(':'),
                ws(),
                Rule::call("element"),
            ]),
        )
        .rule(
            "array",
            Rule::seq([Rule::ch('['), ws(), comma_list("element"), Rule::ch(']')]),
        )
        .rule(
            "string",
            Rule::seq([
                Rule::ch('"'),
                Rule::zero_or_more(Rule::first_of(
                    Rule::call("escape"),
                    Rule::sequence(
                        Rule::not(Rule::choice([
                            Rule::ch('"'),
                            Rule::ch('\\'),
                            Rule::range('\u{0}', '\u{1f}'),
                        ])),
                        Rule::any(),
                    ),
                )),
                Rule::ch('"'),
            ]),
        )
        .rule(
            "escape",
            Rule::sequence(
                '\\',
                Rule::first_of(
                    Rule::choice("\"\\/bfnrt".chars().map(Rule::ch)),
                    Rule::seq([
                        Rule::ch('u'),
                        Rule::call("hex"),
                        Rule::call("hex"),
                        Rule::call("hex"),
                        Rule::call("hex"),
                    ]),
                ),
            ),
        )
        .rule(
            "number",
            Rule::seq([
                Rule::optional('-'),
                Rule::first_of(
                    '0',
                    Rule::sequence(Rule::range('1', '9'), Rule::zero_or_more(Rule::digit())),
                ),
                Rule::optional(Rule::sequence('.', digits())),
                Rule::optional(Rule::seq([
                    Rule::first_of('e', 'E'),
                    Rule::optional(Rule::first_of('+', '-')),
                    digits(),
                ])),
            ]),
        )
        .rule(
            "ws",
            Rule::zero_or_more(Rule::choice([' ', '\t', '\n', '\r'].map(Rule::ch))),
        )
        .native("hex", hex_digit)
        .build()
}

fn read_input(cli: &Cli) -> io::Result<String> {
    match (&cli.input, &cli.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path),
        (None, None) => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli::load_config(cli.common.config.as_deref())?;
    let grammar = json_grammar()?;
    if cli.common.show_grammar {
        cli::print_grammar(&grammar);
    }

    let input = read_input(cli)?;
    let parser = Parser::new(&grammar).with_config(config);
    let outcome = match &cli.rule {
        Some(rule) => parser.parse_rule(rule, &input)?,
        None => parser.parse(&input)?,
    };

    let summary = outcome.captures().first().and_then(|&value| {
        let text = Cursor::new(&input).text(value)?;
        let kind = match text.chars().next()? {
            '{' => "object",
            '[' => "array",
            '"' => "string",
            't' | 'f' => "boolean",
            'n' => "null",
            _ => "number",
        };
        Some(format!("valid JSON {kind} ({} characters)", value.len()))
    });

    cli::print_outcome(&input, &outcome, summary.as_deref(), cli.common.json)?;
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
