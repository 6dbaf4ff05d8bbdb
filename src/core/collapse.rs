//! Pivot-style grouping: one output row per distinct combination of pivot values

use super::aggregators::{aggregate_column, LabelMode};
use super::cell::{CellValue, Value};
use super::table::TableData;
use crate::error::{PivotError, PivotResult};
use crate::types::AggregateOperator;
use std::collections::HashMap;
use tracing::debug;

/// Composite key of a row's pivot values.
///
/// Each component is written as `<byte length>:<text>`, so no cell content
/// can make two different value tuples serialize to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(values: &[Value]) -> Self {
        let mut key = String::new();
        for value in values {
            let text = value.as_text();
            key.push_str(&text.len().to_string());
            key.push(':');
            key.push_str(&text);
        }
        GroupKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rows sharing one group key
#[derive(Debug, Clone)]
struct Group {
    pivot_values: Vec<Value>,
    members: Vec<usize>,
}

/// Partition row indices by pivot values, groups ordered by first appearance
fn partition(table: &TableData, pivots: &[String]) -> PivotResult<Vec<Group>> {
    let pivot_indices: Vec<Option<usize>> =
        pivots.iter().map(|p| table.column_index(p)).collect();

    let mut groups: Vec<Group> = Vec::new();
    let mut lookup: HashMap<GroupKey, usize> = HashMap::new();

    for row in 0..table.row_count() {
        let pivot_values = pivot_indices
            .iter()
            .map(|idx| match idx {
                Some(col) => table.value(row, *col),
                None => Ok(Value::empty()),
            })
            .collect::<PivotResult<Vec<Value>>>()?;

        let key = GroupKey::new(&pivot_values);
        match lookup.get(&key) {
            Some(&group_idx) => groups[group_idx].members.push(row),
            None => {
                lookup.insert(key, groups.len());
                groups.push(Group {
                    pivot_values,
                    members: vec![row],
                });
            }
        }
    }

    Ok(groups)
}

/// Collapse `table` by `pivots`, aggregating each listed column per group.
///
/// The result has columns `[pivots..., aggregated columns...]` and one row per
/// group, in the order each group's first row appears. Pivot columns missing
/// from the table contribute an empty value to every key. Every aggregated
/// column must exist. `table` is left untouched.
pub fn collapse(
    table: &TableData,
    pivots: &[String],
    aggregations: &[(String, Vec<AggregateOperator>)],
) -> PivotResult<TableData> {
    if pivots.is_empty() {
        return Err(PivotError::InvalidGroupingCall);
    }

    let missing: Vec<String> = aggregations
        .iter()
        .map(|(col, _)| col)
        .filter(|col| !table.has_column(col))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PivotError::ColumnNotFound { columns: missing });
    }

    for pivot in pivots.iter().filter(|p| !table.has_column(p)) {
        debug!(pivot = %pivot, "pivot column not in table; using empty values");
    }

    let groups = partition(table, pivots)?;
    debug!(
        rows = table.row_count(),
        groups = groups.len(),
        "partitioned rows"
    );

    let mut out = TableData::with_columns(
        pivots
            .iter()
            .cloned()
            .chain(aggregations.iter().map(|(col, _)| col.clone())),
    );

    for group in groups {
        let mut cells: Vec<CellValue> = group
            .pivot_values
            .into_iter()
            .map(CellValue::resolved)
            .collect();

        for (column, operators) in aggregations {
            let values = group
                .members
                .iter()
                .map(|&row| table.value(row, column))
                .collect::<PivotResult<Vec<Value>>>()?;
            let rendered = aggregate_column(operators, column, &values, LabelMode::Always)?;
            cells.push(CellValue::resolved(rendered));
        }

        out.push_row(cells);
    }

    Ok(out)
}
