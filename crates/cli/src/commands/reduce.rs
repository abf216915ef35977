use crate::OutputFormat;
use crate::util::{CliResult, Condition, format_value};
use clap::{Args, ValueEnum};
use lazyseq::{ArraySource, count_where, first_where, last_where, single_where};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReduceOp {
    /// First matching record.
    First,
    /// Last matching record.
    Last,
    /// The only matching record; fails when more than one matches.
    Single,
    /// Number of matching records.
    Count,
}

#[derive(Args, Debug, Clone)]
pub struct ReduceArgs {
    #[arg(value_enum)]
    pub op: ReduceOp,
    /// Only records where `FIELD<op>VALUE` holds count as matches. Repeatable.
    #[arg(long = "where", value_name = "EXPR")]
    pub conditions: Vec<Condition>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ReduceOutcome {
    Count(usize),
    Record(Option<Value>),
}

pub fn run(records: Vec<Value>, args: &ReduceArgs) -> CliResult<String> {
    debug!(records = records.len(), op = ?args.op, conditions = args.conditions.len(), "running reducer");
    let outcome = reduce(records, args)?;
    let output = match args.format {
        OutputFormat::Text => render_reduce_text(&outcome),
        OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
    };
    Ok(output)
}

pub(crate) fn reduce(records: Vec<Value>, args: &ReduceArgs) -> CliResult<ReduceOutcome> {
    let source = ArraySource::from(records);
    let conditions = args.conditions.clone();
    let predicate = move |record: &Value| conditions.iter().all(|condition| condition.matches(record));
    let outcome = match args.op {
        ReduceOp::First => ReduceOutcome::Record(first_where(Some(&source), Some(predicate))?),
        ReduceOp::Last => ReduceOutcome::Record(last_where(Some(&source), Some(predicate))?),
        ReduceOp::Single => ReduceOutcome::Record(single_where(Some(&source), Some(predicate))?),
        ReduceOp::Count => ReduceOutcome::Count(count_where(Some(&source), Some(predicate))?),
    };
    Ok(outcome)
}

fn render_reduce_text(outcome: &ReduceOutcome) -> String {
    match outcome {
        ReduceOutcome::Count(count) => count.to_string(),
        ReduceOutcome::Record(Some(record)) => format_value(record),
        ReduceOutcome::Record(None) => "(none)".to_owned(),
    }
}
