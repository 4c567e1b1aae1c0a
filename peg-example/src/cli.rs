use clap::Args;
use peg_framework::{Cursor, Grammar, ParseOutcome, ParserConfig, RuleBody};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Flags every demo binary accepts.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Parser configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the grammar before parsing
    #[arg(long)]
    pub show_grammar: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "peg::rule=trace")
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(filter))
        .init();
}

/// Reads a [`ParserConfig`] from a JSON file, or returns the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ParserConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ParserConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?config, path = %path.display(), "loaded parser config");
    Ok(config)
}

pub fn print_grammar(grammar: &Grammar) {
    for (_, name, body) in grammar.rules() {
        match body {
            RuleBody::Expr(rule) => println!("{name} <- {rule}"),
            RuleBody::Native(_) => println!("{name} <- <native>"),
        }
    }
    println!();
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    outcome: &'a ParseOutcome,
    captured_text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
}

/// Prints an outcome either as plain text or as one JSON document.
pub fn print_outcome(
    input: &str,
    outcome: &ParseOutcome,
    summary: Option<&str>,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        let cursor = Cursor::new(input);
        let report = Report {
            outcome,
            captured_text: outcome
                .captures()
                .iter()
                .filter_map(|&capture| cursor.text(capture))
                .collect(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if outcome.is_match() {
        println!("matched {} characters", outcome.position());
        if let Some(summary) = summary {
            println!("{summary}");
        }
        return Ok(());
    }

    println!("no match (stopped at offset {})", outcome.position());
    for record in outcome.errors() {
        println!("  {record}");
    }
    if let Some(deepest) = outcome.deepest_error() {
        println!("deepest failure: {deepest}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Some(Path::new("/nonexistent/peg.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), ParserConfig::default());
    }
}
