//! Instruction directives embedded in the paragraph next to a table
//!
//! Directives are plain text, one per line (`<br>` also separates lines):
//!
//! ```text
//! PIVOTIFYJS_GROUPS:["Category"]
//! PIVOTIFYJS_SUM:["Annual Cost"]
//! PIVOTIFYJS_SUMMARY_AVERAGE:["Annual Cost"]
//! PIVOTIFYJS_COMPUTE:"Subtotal"="${Unit Cost} * ${Qty:1}"
//! PIVOTIFYJS_STYLE_GRADIENT:"Annual Cost"="from:green;to:red"
//! ```

pub mod gradient;

use crate::core::template::{self, Segment};
use crate::error::{PivotError, PivotResult};
use crate::types::{
    AggregateInstruction, AggregateOperator, ComputeInstruction, ComputeVariable, Instructions,
};
use regex::Regex;
use tracing::debug;

pub use gradient::parse_gradients;

pub const KEYWORD_PREFIX: &str = "PIVOTIFYJS";
pub const GROUPS_KEYWORD: &str = "PIVOTIFYJS_GROUPS";
pub const COMPUTE_KEYWORD: &str = "PIVOTIFYJS_COMPUTE";
pub const SUMMARY_PREFIX: &str = "PIVOTIFYJS_SUMMARY";

/// Parse every directive found in `text`
pub fn parse_instructions(text: &str) -> PivotResult<Instructions> {
    let instructions = Instructions {
        groups: parse_groups(text)?,
        compute: parse_computations(text)?,
        aggregate: parse_aggregations(text, false)?,
        summarize: parse_aggregations(text, true)?,
        style: parse_gradients(text)?,
    };
    debug!(
        groups = instructions.groups.len(),
        compute = instructions.compute.len(),
        aggregate = instructions.aggregate.len(),
        summarize = instructions.summarize.len(),
        style = instructions.style.len(),
        "parsed directives"
    );
    Ok(instructions)
}

/// Split directive text into trimmed, non-empty lines
pub fn lines(text: &str) -> PivotResult<Vec<&str>> {
    let separator = Regex::new(r"(?i)<br\s*/?>|\r?\n")
        .map_err(|e| PivotError::InvalidDirective(format!("Regex error: {}", e)))?;
    Ok(separator
        .split(text)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect())
}

/// Every column named by `KEYWORD:[...]` lists, in order of appearance
fn column_lists(text: &str, keyword: &str) -> PivotResult<Vec<String>> {
    let pattern = Regex::new(&format!(r"\b{}:\s*(\[[^\]]*\])", regex::escape(keyword)))
        .map_err(|e| PivotError::InvalidDirective(format!("Regex error: {}", e)))?;

    let mut columns: Vec<String> = Vec::new();
    for captures in pattern.captures_iter(text) {
        let Some(list) = captures.get(1) else { continue };
        let parsed: Vec<String> = serde_json::from_str(list.as_str()).map_err(|e| {
            PivotError::InvalidDirective(format!(
                "{} expects a JSON list of column names, got {}: {}",
                keyword,
                list.as_str(),
                e
            ))
        })?;
        for column in parsed {
            let column = column.trim().to_string();
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }
    Ok(columns)
}

/// Pivot columns from `PIVOTIFYJS_GROUPS:[...]`
pub fn parse_groups(text: &str) -> PivotResult<Vec<String>> {
    column_lists(text, GROUPS_KEYWORD)
}

/// Aggregate instructions from `PIVOTIFYJS_<OP>:[...]`, or from
/// `PIVOTIFYJS_SUMMARY_<OP>:[...]` when `summary` is set.
///
/// Operators are scanned in [`AggregateOperator::ALL`] order and duplicate
/// (column, operator) pairs are dropped.
pub fn parse_aggregations(text: &str, summary: bool) -> PivotResult<Vec<AggregateInstruction>> {
    let mut instructions: Vec<AggregateInstruction> = Vec::new();
    for operator in AggregateOperator::ALL {
        let keyword = if summary {
            format!("{}_{}", SUMMARY_PREFIX, operator.keyword())
        } else {
            format!("{}_{}", KEYWORD_PREFIX, operator.keyword())
        };
        for column in column_lists(text, &keyword)? {
            let instr = AggregateInstruction::new(column, operator);
            if !instructions.contains(&instr) {
                instructions.push(instr);
            }
        }
    }
    Ok(instructions)
}

/// Compute instructions from `PIVOTIFYJS_COMPUTE:"Column"="template"` lines.
///
/// Variables are the `${Column}` references of the template. A
/// `${Column:default}` reference records its default on the variable and is
/// stored in the template as plain `${Column}`.
pub fn parse_computations(text: &str) -> PivotResult<Vec<ComputeInstruction>> {
    let pattern = Regex::new(&format!(r#"^{}:"([^"]+)"=(.+)$"#, COMPUTE_KEYWORD))
        .map_err(|e| PivotError::InvalidDirective(format!("Regex error: {}", e)))?;

    let mut instructions = Vec::new();
    for line in lines(text)? {
        if !line.starts_with(COMPUTE_KEYWORD) {
            continue;
        }
        let captures = pattern.captures(line).ok_or_else(|| {
            PivotError::InvalidDirective(format!(
                "expected {}:\"Column\"=\"template\", got: {}",
                COMPUTE_KEYWORD, line
            ))
        })?;
        let column = captures[1].trim().to_string();
        let raw = unquote(captures[2].trim());

        let mut variables: Vec<ComputeVariable> = Vec::new();
        for segment in template::segments(raw) {
            if let Segment::Variable(var) = segment {
                if !variables.iter().any(|v| v.column == var.column) {
                    variables.push(ComputeVariable::new(var.column, var.default.unwrap_or("")));
                }
            }
        }

        instructions.push(ComputeInstruction {
            column,
            equation: template::strip_defaults(raw),
            variables,
        });
    }
    Ok(instructions)
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}
