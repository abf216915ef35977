use clap::Parser;
use lazyseq_cli::{Cli, execute};
use rstest::{fixture, rstest};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

#[fixture]
fn input() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    for line in [
        r#"{"id": 1, "city": "Berlin", "score": 7}"#,
        r#"{"id": 2, "city": "Hamburg", "score": 9}"#,
        "",
        r#"{"id": 3, "city": "Berlin", "score": 9}"#,
        r#"{"id": 4, "city": "Bremen"}"#,
    ] {
        writeln!(file, "{line}").expect("write");
    }
    file
}

fn run(file: &NamedTempFile, args: &[&str]) -> anyhow::Result<String> {
    let path = file.path().to_str().expect("utf-8 path");
    let mut argv = vec!["lazyseq", "--input", path];
    argv.extend_from_slice(args);
    execute(&Cli::try_parse_from(argv).expect("cli"))
}

#[rstest]
fn query_sorts_with_first_key_primary(input: NamedTempFile) {
    let output = run(&input, &["query", "--sort", "score:desc", "--sort", "id", "--select", "id", "--format", "json"])
        .expect("query");
    let rows: Value = serde_json::from_str(&output).expect("json");
    let ids: Vec<i64> = rows.as_array().expect("array").iter().filter_map(|row| row["id"].as_i64()).collect();
    assert_eq!(ids, vec![2, 3, 1, 4]);
}

#[rstest]
fn query_filters_and_limits(input: NamedTempFile) {
    let output =
        run(&input, &["query", "--where", "city=Berlin", "--sort", "score", "--select", "id,score", "--limit", "1"])
            .expect("query");
    assert!(output.contains("id=1"));
    assert!(output.contains("score=7"));
    assert!(!output.contains("id=3"));
}

#[rstest]
#[case(&["reduce", "count", "--where", "score>=9"], "2")]
#[case(&["reduce", "first", "--where", "city=Nowhere"], "(none)")]
#[case(&["reduce", "single", "--where", "city=Bremen", "--format", "json"], "{\n  \"city\": \"Bremen\",\n  \"id\": 4\n}")]
fn reduce_commands(input: NamedTempFile, #[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(run(&input, args).expect("reduce"), expected);
}

#[rstest]
fn reduce_single_reports_cardinality(input: NamedTempFile) {
    let err = run(&input, &["reduce", "single", "--where", "city=Berlin"]).unwrap_err();
    assert!(err.to_string().starts_with("cardinality:"));
}

#[rstest]
fn invalid_json_line_is_reported() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "{{\"ok\": true}}\nnot json").expect("write");
    let err = run(&file, &["reduce", "count", "--where", "ok=true"]).unwrap_err();
    assert!(format!("{err:#}").contains("line 2"));
}

#[rstest]
fn missing_input_file_is_an_error() {
    let cli = Cli::try_parse_from(["lazyseq", "--input", "/definitely/not/here.jsonl", "reduce", "count"]).expect("cli");
    assert!(execute(&cli).is_err());
}
