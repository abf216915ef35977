pub mod commands;
pub mod util;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::query::QueryArgs;
use commands::reduce::ReduceArgs;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use util::{CliResult, read_records};

#[derive(Parser, Debug)]
#[command(name = "lazyseq", version, about = "Filter, sort and reduce JSON-lines records with lazy pipelines")]
pub struct Cli {
    /// Read records from FILE instead of stdin.
    #[arg(long = "input", short = 'i', value_name = "FILE", global = true)]
    pub input: Option<PathBuf>,
    /// More log output on stderr (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter, sort and project records.
    Query(QueryArgs),
    /// Reduce matching records to one record or a count.
    Reduce(ReduceArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = execute(&cli)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Loads the records named by `cli` and runs its command; returns the
/// rendered output.
pub fn execute(cli: &Cli) -> CliResult<String> {
    let records = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            read_records(BufReader::new(file))?
        }
        None => read_records(io::stdin().lock())?,
    };
    debug!(count = records.len(), "records loaded");

    match &cli.command {
        Command::Query(args) => commands::query::run(records, args),
        Command::Reduce(args) => commands::reduce::run(records, args),
    }
}

fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbose)));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(7, "trace")]
    fn verbosity_levels(#[case] verbose: u8, #[case] expected: &str) {
        assert_eq!(verbosity_filter(verbose), expected);
    }

    #[rstest]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lazyseq", "query", "-vv", "--input", "data.jsonl", "--sort", "age:desc"])
            .expect("cli");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.input, Some(PathBuf::from("data.jsonl")));
        let Command::Query(args) = cli.command else { panic!("expected query") };
        assert_eq!(args.sort.len(), 1);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[rstest]
    fn rejects_malformed_condition() {
        let err = Cli::try_parse_from(["lazyseq", "reduce", "count", "--where", "age"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
