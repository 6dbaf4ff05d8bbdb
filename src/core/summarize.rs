//! Summary row: whole-table aggregation without grouping

use super::aggregators::{aggregate_column, LabelMode};
use super::cell::CellValue;
use super::table::TableData;
use crate::error::{PivotError, PivotResult};
use crate::types::{group_by_column, AggregateInstruction};
use tracing::debug;

/// Return a copy of `table` with one summary row appended.
///
/// Each instructed column gets its aggregated results over every existing row;
/// other columns get an empty cell. A single operator renders a bare value,
/// several render as "Sum: 349, Avg: 116.33". Columns are never added or
/// removed, and `table` is left untouched.
pub fn summarize(table: &TableData, instructions: &[AggregateInstruction]) -> PivotResult<TableData> {
    if let Some(instr) = instructions.iter().find(|i| i.operator.requires_grouping()) {
        return Err(PivotError::GroupingRequired {
            operator: instr.operator.keyword().to_string(),
        });
    }

    let grouped = group_by_column(instructions);

    let missing: Vec<String> = grouped
        .iter()
        .map(|(col, _)| col)
        .filter(|col| !table.has_column(col))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PivotError::ColumnNotFound { columns: missing });
    }

    let mut summary: Vec<CellValue> = Vec::with_capacity(table.column_count());
    for (col_idx, name) in table.column_names().iter().enumerate() {
        let operators = grouped
            .iter()
            .find(|(col, _)| table.column_index(col) == Some(col_idx))
            .map(|(_, ops)| ops);
        match operators {
            Some(ops) => {
                let values = table.column_values(col_idx)?;
                let rendered = aggregate_column(ops, name, &values, LabelMode::WhenMultiple)?;
                summary.push(CellValue::resolved(rendered));
            }
            None => summary.push(CellValue::empty()),
        }
    }

    debug!(
        rows = table.row_count(),
        columns = grouped.len(),
        "appending summary row"
    );

    let mut out = table.clone();
    let row = out.create_row();
    for (slot, cell) in row.iter_mut().zip(summary) {
        *slot = cell;
    }
    Ok(out)
}
