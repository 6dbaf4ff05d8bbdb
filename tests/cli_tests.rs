//! CLI command tests

use pivotify::cli::commands::{self, InstructionSource, OutputFormat};
use pivotify::external::load_table;
use pivotify::types::AggregateOperator;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// INSTRUCTION LOADING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_directive_file() {
    let source = InstructionSource::File(PathBuf::from("test-data/subscriptions.directives.txt"));
    let instructions = commands::load_instructions(&source).unwrap();
    assert_eq!(instructions.groups, vec!["Last Checked"]);
    let operators: Vec<AggregateOperator> =
        instructions.aggregate.iter().map(|i| i.operator).collect();
    assert_eq!(
        operators,
        vec![AggregateOperator::Sum, AggregateOperator::Average]
    );
}

#[test]
fn test_load_yaml_instruction_document() {
    let source = InstructionSource::File(PathBuf::from("test-data/grocery.instructions.yaml"));
    let instructions = commands::load_instructions(&source).unwrap();
    assert_eq!(instructions.compute.len(), 1);
    assert_eq!(instructions.compute[0].variables[1].default, "1");
    assert_eq!(instructions.summarize[0].operator, AggregateOperator::Average);
}

#[test]
fn test_load_inline_directives() {
    let source = InstructionSource::Directives(vec![
        r#"PIVOTIFYJS_GROUPS:["Category"]"#.to_string(),
        r#"PIVOTIFYJS_MEDIAN:["Annual Cost"]"#.to_string(),
    ]);
    let instructions = commands::load_instructions(&source).unwrap();
    assert_eq!(instructions.groups, vec!["Category"]);
    assert_eq!(instructions.aggregate[0].operator, AggregateOperator::Median);
}

#[test]
fn test_load_missing_file() {
    let source = InstructionSource::File(PathBuf::from("nonexistent.txt"));
    assert!(commands::load_instructions(&source).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// PROCESS COMMAND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_process_writes_json() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");

    commands::process(
        PathBuf::from("test-data/subscriptions.complex.yaml"),
        InstructionSource::File(PathBuf::from("test-data/subscriptions.directives.txt")),
        OutputFormat::Json,
        Some(output.clone()),
        false,
    )
    .unwrap();

    let written = load_table(&output).unwrap();
    assert_eq!(written.headers, vec!["Last Checked", "Annual Cost"]);
    assert_eq!(written.rows.len(), 3);
}

#[test]
fn test_process_writes_yaml_with_yaml_instructions() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.yaml");

    commands::process(
        PathBuf::from("test-data/grocery.arithmetic.json"),
        InstructionSource::File(PathBuf::from("test-data/grocery.instructions.yaml")),
        OutputFormat::Yaml,
        Some(output.clone()),
        true,
    )
    .unwrap();

    let written = load_table(&output).unwrap();
    assert_eq!(written.rows.len(), 4);
    assert_eq!(written.rows[3][1].text, "0.42");
}

#[test]
fn test_process_html_carries_styles() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.html");

    commands::process(
        PathBuf::from("test-data/grocery.arithmetic.json"),
        InstructionSource::File(PathBuf::from("test-data/grocery.directives.txt")),
        OutputFormat::Html,
        Some(output.clone()),
        false,
    )
    .unwrap();

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<table>"));
    assert!(html.contains("<th>Subtotal</th>"));
    assert!(html.contains("style=\"background-color: rgb(0, 128, 0);\""));
}

#[test]
fn test_process_fails_on_missing_column() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");

    let result = commands::process(
        PathBuf::from("test-data/subscriptions.simple.json"),
        InstructionSource::Directives(vec![r#"PIVOTIFYJS_SUMMARY_SUM:["Price"]"#.to_string()]),
        OutputFormat::Json,
        Some(output.clone()),
        false,
    );
    assert!(result.is_err());
    assert!(!output.exists(), "no output on failure");
}

#[test]
fn test_process_without_instructions_writes_table_unchanged() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");

    commands::process(
        PathBuf::from("test-data/subscriptions.simple.json"),
        InstructionSource::Directives(vec!["plain caption".to_string()]),
        OutputFormat::Json,
        Some(output.clone()),
        false,
    )
    .unwrap();

    let original = load_table(&PathBuf::from("test-data/subscriptions.simple.json")).unwrap();
    assert_eq!(load_table(&output).unwrap(), original);
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT COMMAND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_directive_file() {
    let result = commands::inspect(InstructionSource::File(PathBuf::from(
        "test-data/grocery.directives.txt",
    )));
    assert!(result.is_ok());
}

#[test]
fn test_inspect_invalid_directive() {
    let result = commands::inspect(InstructionSource::Directives(vec![
        "PIVOTIFYJS_GROUPS:[Category]".to_string(),
    ]));
    assert!(result.is_err());
}
