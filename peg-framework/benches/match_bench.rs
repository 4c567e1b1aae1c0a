use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use peg_framework::{Grammar, Parser, ParserConfig, Rule};

// --- Grammar ---
// expr   <- term (('+' / '-') term)*
// term   <- factor (('*' / '/') factor)*
// factor <- number / '(' expr ')'
fn expression_grammar() -> Grammar {
    let ws = || Rule::zero_or_more(Rule::ch(' '));
    let op = |a: char, b: char| Rule::sequence(Rule::first_of(a, b), ws());
    Grammar::builder()
        .rule("program", Rule::seq([ws(), Rule::call("expr"), Rule::eoi()]))
        .rule(
            "expr",
            Rule::sequence(
                Rule::call("term"),
                Rule::zero_or_more(Rule::sequence(op('+', '-'), Rule::call("term"))),
            ),
        )
        .rule(
            "term",
            Rule::sequence(
                Rule::call("factor"),
                Rule::zero_or_more(Rule::sequence(op('*', '/'), Rule::call("factor"))),
            ),
        )
        .rule(
            "factor",
            Rule::sequence(
                Rule::first_of(
                    Rule::capture(Rule::one_or_more(Rule::digit())),
                    Rule::seq([Rule::ch('('), ws(), Rule::call("expr"), Rule::ch(')')]),
                ),
                ws(),
            ),
        )
        .build()
        .expect("benchmark grammar is valid")
}

// --- Data Generation ---
// "1 + (2 * 3) - 4 / 5 + ..." repeated to roughly `len` characters.
fn generate_expression(len: usize) -> String {
    let mut input = String::from("1");
    while input.len() < len {
        input.push_str(" + (2 * 3) - 4 / 5");
    }
    input
}

fn bench_parse(c: &mut Criterion) {
    let grammar = expression_grammar();
    let input = generate_expression(10_000);

    let mut group = c.benchmark_group("expression");
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("with_errors", |b| {
        let parser = Parser::new(&grammar);
        b.iter(|| parser.parse(black_box(&input)))
    });

    group.bench_function("without_errors", |b| {
        let parser =
            Parser::new(&grammar).with_config(ParserConfig::default().with_track_errors(false));
        b.iter(|| parser.parse(black_box(&input)))
    });

    // A failure at the very end forces every record along the way to be kept.
    let broken = format!("{input} +");
    group.bench_function("failing_tail", |b| {
        let parser = Parser::new(&grammar);
        b.iter(|| parser.parse(black_box(&broken)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
