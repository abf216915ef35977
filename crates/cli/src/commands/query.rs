use crate::OutputFormat;
use crate::util::{CliResult, Condition, SortKey, SortSpec, format_value, lookup};
use clap::Args;
use lazyseq::{ArraySource, OrderedView, Pipeline, Sequence, Stage};
use owo_colors::{OwoColorize, Stream};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt::Write;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Keep records where `FIELD<op>VALUE` holds; op is one of = != < <= > >=.
    /// Repeatable, every condition must hold.
    #[arg(long = "where", value_name = "EXPR")]
    pub conditions: Vec<Condition>,
    /// Sort key, `FIELD` or `FIELD:desc`. Repeatable; the first key is primary.
    #[arg(long = "sort", value_name = "FIELD[:desc]")]
    pub sort: Vec<SortSpec>,
    /// Comma-separated fields to output, in that order.
    #[arg(long = "select", value_name = "FIELDS", value_delimiter = ',')]
    pub select: Vec<String>,
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output record: named fields in display order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    fn from_record(record: Value, select: &[String]) -> Self {
        if !select.is_empty() {
            let fields = select
                .iter()
                .map(|name| (name.clone(), lookup(&record, name).cloned().unwrap_or(Value::Null)))
                .collect();
            return Row { fields };
        }
        match record {
            Value::Object(map) => Row { fields: map.into_iter().collect() },
            other => Row { fields: vec![("value".to_owned(), other)] },
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub fn run(records: Vec<Value>, args: &QueryArgs) -> CliResult<String> {
    debug!(
        records = records.len(),
        conditions = args.conditions.len(),
        sort_keys = args.sort.len(),
        selected = args.select.len(),
        "running query"
    );
    let stage = filtered(records, &args.conditions);
    let rows: Box<dyn Sequence<Row>> = match args.sort.split_last() {
        None => Box::new(select(stage, &args.select)),
        Some((last, rest)) => Box::new(select(ordered(stage, last, rest), &args.select)),
    };
    let rows: Vec<Row> = rows.iter().take(args.limit.unwrap_or(usize::MAX)).collect();

    let output = match args.format {
        OutputFormat::Text => render_query_text(&rows),
        OutputFormat::Json => render_query_json(&rows)?,
    };
    Ok(output)
}

/// One stage over the records with every condition fused into it.
pub(crate) fn filtered(records: Vec<Value>, conditions: &[Condition]) -> Stage<ArraySource<Value>, Value> {
    let source = ArraySource::from(records);
    let Some((first, rest)) = conditions.split_first() else {
        return source.project(|record| record);
    };
    debug!(field = %first.field, op = first.op.as_str(), "adding condition");
    let first = first.clone();
    let stage = source.filter(move |record| first.matches(record));
    rest.iter().cloned().fold(stage, |stage, condition| {
        debug!(field = %condition.field, op = condition.op.as_str(), "adding condition");
        stage.filter(move |record| condition.matches(record))
    })
}

/// Sort keys are listed primary first, while the most recently added
/// `then_by` key is the one compared first. The view is therefore seeded
/// with the last listed key and refined back towards the first.
fn ordered<S>(source: S, last: &SortSpec, rest: &[SortSpec]) -> OrderedView<Value>
where
    S: Sequence<Value> + 'static,
{
    let view = OrderedView::order_by_with(source, last.key_selector(), SortKey::cmp, last.direction);
    rest.iter().rev().fold(view, |view, spec| view.then_by_with(spec.key_selector(), SortKey::cmp, spec.direction))
}

fn select<P>(source: P, fields: &[String]) -> Stage<P::Shape, Row>
where
    P: Pipeline<Item = Value>,
{
    let fields = fields.to_vec();
    source.project(move |record| Row::from_record(record, &fields))
}

fn colorize_field_name(name: &str) -> String {
    name.if_supports_color(Stream::Stdout, |text| text.bold().fg_rgb::<241, 149, 255>().to_string()).to_string()
}

fn colorize_field_value(value: &str) -> String {
    value.if_supports_color(Stream::Stdout, |text| text.fg_rgb::<136, 192, 74>().to_string()).to_string()
}

pub(crate) fn render_query_text(rows: &[Row]) -> String {
    let mut output = String::new();
    for row in rows {
        let line = row
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", colorize_field_name(name), colorize_field_value(&format_value(value))))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(&mut output, "{line}");
    }
    output.trim_end().to_owned()
}

pub(crate) fn render_query_json(rows: &[Row]) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
