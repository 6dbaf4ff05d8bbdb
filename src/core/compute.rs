//! Computed columns: per-row variable substitution into an arithmetic template

use super::arithmetic::{evaluate_expression, parse_number};
use super::cell::CellValue;
use super::table::TableData;
use super::template::{self, VariableRef};
use crate::error::{PivotError, PivotResult};
use crate::types::ComputeInstruction;
use tracing::debug;

/// Append one column per instruction, in declared order.
///
/// Later instructions see the columns added by earlier ones. Any failure
/// leaves `table` exactly as it was.
pub fn apply_computed_columns(
    table: &mut TableData,
    instructions: &[ComputeInstruction],
) -> PivotResult<()> {
    if instructions.is_empty() {
        return Ok(());
    }

    let mut working = table.clone();
    for instr in instructions {
        let cells = (0..working.row_count())
            .map(|row| compute_row(&working, instr, row).map(CellValue::resolved))
            .collect::<PivotResult<Vec<CellValue>>>()?;
        debug!(
            column = %instr.column,
            rows = cells.len(),
            "appended computed column"
        );
        working.add_column(instr.column.clone(), cells);
    }

    *table = working;
    Ok(())
}

/// Substitute one row's values into the template and evaluate it
pub fn compute_row(table: &TableData, instr: &ComputeInstruction, row: usize) -> PivotResult<f64> {
    let substituted = template::substitute(&instr.equation, |var| {
        substitution_for(table, instr, var, row)
    })?;

    let value = evaluate_expression(&substituted).map_err(|e| PivotError::Computation {
        equation: substituted.clone(),
        row,
        reason: e.message,
    })?;

    if !value.is_finite() {
        return Err(PivotError::Computation {
            equation: substituted,
            row,
            reason: format!("result is not a finite number ({})", value),
        });
    }

    Ok(value)
}

/// Numeric text for one variable: the row's cell, or the declared default when
/// the cell is empty or the column is missing.
fn substitution_for(
    table: &TableData,
    instr: &ComputeInstruction,
    var: &VariableRef<'_>,
    row: usize,
) -> PivotResult<String> {
    let default = instr
        .variables
        .iter()
        .find(|v| v.column == var.column)
        .map(|v| v.default.as_str())
        .or(var.default)
        .unwrap_or("");

    let cell_text = match table.column_index(var.column) {
        Some(col) => table.value(row, col)?.as_text().trim().to_string(),
        None => String::new(),
    };
    let text = if cell_text.is_empty() {
        default.to_string()
    } else {
        cell_text
    };

    match parse_number(&text) {
        Some(n) if n < 0.0 => Ok(format!("({})", n)),
        Some(n) => Ok(n.to_string()),
        None => Err(PivotError::Computation {
            equation: instr.equation.clone(),
            row,
            reason: format!("non-numeric value for column '{}': '{}'", var.column, text),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Value;
    use crate::external::RawTable;
    use crate::types::ComputeVariable;
    use pretty_assertions::assert_eq;

    fn grocery() -> TableData {
        TableData::from_external(&RawTable::from_text_rows(
            ["Item", "Unit Cost", "Qty"],
            [["Onion", "0.58", "2"], ["Banana", "0.5/2", "5"], ["Leek", "1.2", ""]],
        ))
    }

    fn subtotal(default_qty: &str) -> ComputeInstruction {
        ComputeInstruction {
            column: "Subtotal".to_string(),
            equation: "${Unit Cost} * ${Qty}".to_string(),
            variables: vec![
                ComputeVariable::new("Unit Cost", ""),
                ComputeVariable::new("Qty", default_qty),
            ],
        }
    }

    #[test]
    fn test_subtotal_with_default() {
        let mut table = grocery();
        apply_computed_columns(&mut table, &[subtotal("1")]).unwrap();
        assert_eq!(table.column_names().last().unwrap(), "Subtotal");
        assert_eq!(table.value(0, "Subtotal").unwrap(), Value::Number(1.16));
        assert_eq!(table.value(1, "Subtotal").unwrap(), Value::Number(1.25));
        assert_eq!(table.value(2, "Subtotal").unwrap(), Value::Number(1.2));
    }

    #[test]
    fn test_zero_padded_values_substitute_as_numbers() {
        let mut table = TableData::from_external(&RawTable::from_text_rows(
            ["Unit Cost", "Qty"],
            [["2", "05"], ["3", ""]],
        ));
        apply_computed_columns(&mut table, &[subtotal("02")]).unwrap();
        assert_eq!(table.value(0, "Subtotal").unwrap(), Value::Number(10.0));
        assert_eq!(table.value(1, "Subtotal").unwrap(), Value::Number(6.0));
    }

    #[test]
    fn test_later_instructions_see_earlier_columns() {
        let mut table = grocery();
        let doubled = ComputeInstruction {
            column: "Doubled".to_string(),
            equation: "${Subtotal} * 2".to_string(),
            variables: vec![ComputeVariable::new("Subtotal", "")],
        };
        apply_computed_columns(&mut table, &[subtotal("1"), doubled]).unwrap();
        assert_eq!(table.value(1, "Doubled").unwrap(), Value::Number(2.5));
    }

    #[test]
    fn test_missing_value_without_default_fails_without_mutation() {
        let mut table = grocery();
        let before = table.clone();
        let err = apply_computed_columns(&mut table, &[subtotal("")]).unwrap_err();
        match err {
            PivotError::Computation { row, reason, .. } => {
                assert_eq!(row, 2);
                assert!(reason.contains("Qty"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(table, before);
    }

    #[test]
    fn test_non_finite_result_fails() {
        let mut table = grocery();
        let instr = ComputeInstruction {
            column: "Ratio".to_string(),
            equation: "${Unit Cost} / 0".to_string(),
            variables: vec![ComputeVariable::new("Unit Cost", "")],
        };
        let err = apply_computed_columns(&mut table, &[instr]).unwrap_err();
        match err {
            PivotError::Computation { equation, .. } => assert_eq!(equation, "0.58 / 0"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_template_outside_arithmetic_is_rejected() {
        let mut table = grocery();
        let instr = ComputeInstruction {
            column: "Bad".to_string(),
            equation: "${Qty} + process.exit()".to_string(),
            variables: vec![ComputeVariable::new("Qty", "0")],
        };
        assert!(matches!(
            apply_computed_columns(&mut table, &[instr]),
            Err(PivotError::Computation { .. })
        ));
    }

    #[test]
    fn test_negative_values_are_parenthesized() {
        let mut table = TableData::from_external(&RawTable::from_text_rows(
            ["A", "B"],
            [["5", "-3"]],
        ));
        let instr = ComputeInstruction {
            column: "Diff".to_string(),
            equation: "${A} - ${B}".to_string(),
            variables: vec![ComputeVariable::new("A", ""), ComputeVariable::new("B", "")],
        };
        apply_computed_columns(&mut table, &[instr]).unwrap();
        assert_eq!(table.value(0, "Diff").unwrap(), Value::Number(8.0));
    }

    #[test]
    fn test_rerun_duplicates_column() {
        let mut table = grocery();
        apply_computed_columns(&mut table, &[subtotal("1")]).unwrap();
        apply_computed_columns(&mut table, &[subtotal("1")]).unwrap();
        assert_eq!(table.column_count(), 5);
    }
}
