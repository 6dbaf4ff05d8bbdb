//! Orchestration: compute, then collapse or summarize, then stylize

use super::collapse::collapse;
use super::compute::apply_computed_columns;
use super::stylize::stylize;
use super::summarize::summarize;
use super::table::TableData;
use crate::error::PivotResult;
use crate::external::RawTable;
use crate::types::{group_by_column, Instructions};
use tracing::{debug, info};

/// Run every instruction against an external table.
///
/// Returns `Ok(None)` when there is nothing to do. `raw` is never modified,
/// its spans are expanded before anything else, and an error produces no
/// table at all.
pub fn process(raw: &RawTable, instructions: &Instructions) -> PivotResult<Option<RawTable>> {
    if instructions.is_empty() {
        debug!("no instructions found; table left as is");
        return Ok(None);
    }

    let table = TableData::from_external(&raw.expand_spans());
    info!(
        columns = table.column_count(),
        rows = table.row_count(),
        "processing table"
    );

    let out = transform(table, instructions)?.to_external()?;
    info!(
        columns = out.headers.len(),
        rows = out.rows.len(),
        "table processed"
    );
    Ok(Some(out))
}

/// Apply the stages in order: computed columns, then grouping (or, with no
/// groups, aggregate instructions as a summary row), then summary
/// instructions, then styling.
pub fn transform(mut table: TableData, instructions: &Instructions) -> PivotResult<TableData> {
    apply_computed_columns(&mut table, &instructions.compute)?;

    if !instructions.aggregate.is_empty() {
        table = if instructions.groups.is_empty() {
            debug!("no pivoting groups; aggregating into a summary row");
            summarize(&table, &instructions.aggregate)?
        } else {
            let aggregations = group_by_column(&instructions.aggregate);
            collapse(&table, &instructions.groups, &aggregations)?
        };
    } else if !instructions.groups.is_empty() {
        debug!("pivoting groups given without aggregations; grouping skipped");
    }

    if !instructions.summarize.is_empty() {
        table = summarize(&table, &instructions.summarize)?;
    }

    stylize(&mut table, &instructions.style)?;
    Ok(table)
}
