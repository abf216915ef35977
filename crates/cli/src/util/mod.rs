mod condition;
mod sort_key;

pub use condition::{CompareOp, Condition, SortSpec};
pub use sort_key::SortKey;

use anyhow::Context;
use serde_json::Value;
use std::io::BufRead;

pub type CliResult<T> = anyhow::Result<T>;

/// Parses one JSON value per non-blank line.
pub fn read_records<R: BufRead>(reader: R) -> CliResult<Vec<Value>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str(trimmed)
            .with_context(|| format!("line {}: invalid JSON record", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Resolves a dotted field path (`address.city`) inside a record.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, segment| value.get(segment))
}

/// Single-line rendering used by the text output format.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => {
            serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text.replace('"', "\\\"")))
        }
        other => other.to_string(),
    }
}
