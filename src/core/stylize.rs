//! Value-driven cell styling

use super::color::{self, gradient_color};
use super::table::TableData;
use crate::error::{PivotError, PivotResult};
use crate::types::{GradientInstruction, StyleInstruction};
use tracing::debug;

/// Annotate cells in place according to each style instruction.
///
/// All target columns and colors are checked before any cell is touched.
pub fn stylize(table: &mut TableData, instructions: &[StyleInstruction]) -> PivotResult<()> {
    let missing: Vec<String> = instructions
        .iter()
        .map(StyleInstruction::column)
        .filter(|col| !table.has_column(col))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(PivotError::ColumnNotFound { columns: missing });
    }

    for instruction in instructions {
        match instruction {
            StyleInstruction::Gradient(gradient) => validate_gradient(gradient)?,
        }
    }

    for instruction in instructions {
        match instruction {
            StyleInstruction::Gradient(gradient) => apply_gradient(table, gradient)?,
        }
    }
    Ok(())
}

fn validate_gradient(gradient: &GradientInstruction) -> PivotResult<()> {
    for c in [&gradient.from, &gradient.to] {
        if !color::is_valid(c) {
            return Err(PivotError::InvalidStyle(format!(
                "Invalid color value: {}. Must be a valid hex code or CSS color name.",
                c
            )));
        }
    }
    Ok(())
}

/// Color each numeric cell of the column by its position between the column's
/// minimum and maximum. Non-numeric cells keep their style.
fn apply_gradient(table: &mut TableData, gradient: &GradientInstruction) -> PivotResult<()> {
    let col = table
        .column_index(&gradient.column)
        .ok_or_else(|| PivotError::ColumnNotFound {
            columns: vec![gradient.column.clone()],
        })?;

    let values: Vec<Option<f64>> = table
        .column_values(col)?
        .iter()
        .map(|v| v.as_number())
        .collect();
    let numbers: Vec<f64> = values.iter().flatten().copied().collect();

    let (Some(min), Some(max)) = (
        numbers.iter().copied().reduce(f64::min),
        numbers.iter().copied().reduce(f64::max),
    ) else {
        debug!(column = %gradient.column, "no numeric values; gradient skipped");
        return Ok(());
    };

    let property = gradient.target.css_property();
    for (row, value) in values.iter().enumerate() {
        let Some(value) = value else { continue };
        let color = gradient_color(*value, min, max, &gradient.from, &gradient.to)
            .ok_or_else(|| PivotError::InvalidStyle(format!("cannot mix {} and {}", gradient.from, gradient.to)))?;
        if let Some(cell) = table.cell_mut(row, col) {
            cell.set_style(format!("{}: {};", property, color));
        }
    }

    debug!(
        column = %gradient.column,
        cells = numbers.len(),
        min,
        max,
        "applied gradient"
    );
    Ok(())
}
