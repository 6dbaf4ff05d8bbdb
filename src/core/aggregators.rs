//! Aggregate functions: SUM, AVERAGE, MIN, MAX, MEDIAN, FIRST
//!
//! Numeric operators only ever see numbers: the input set is validated once
//! per column before any handler runs, and a non-numeric value fails the whole
//! aggregation instead of being skipped.

use super::cell::Value;
use crate::error::{PivotError, PivotResult};
use crate::types::AggregateOperator;

/// Decimal places used when rendering aggregate results
pub const DEFAULT_DECIMAL_PLACES: usize = 2;

/// Whether rendered results carry their operator label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Always "Sum: 12" (grouped subtotals)
    Always,
    /// Bare value for a single operator, labels for several (summary rows)
    WhenMultiple,
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Mean of the values; 0 for an empty set
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Middle element after an ascending sort. Even counts take the upper-middle
/// element, not the mean of the two middle values. 0 for an empty set.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[sorted.len() / 2]
}

/// Fixed two-decimal rendering with a trailing ".00" stripped
pub fn format_number(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    let formatted = format!("{:.*}", DEFAULT_DECIMAL_PLACES, n);
    match formatted.strip_suffix(".00") {
        Some(integer) => integer.to_string(),
        None => formatted,
    }
}

/// Fail unless every value is a number, listing all offenders at once
pub fn ensure_numeric(
    operators: &[AggregateOperator],
    column: &str,
    values: &[Value],
) -> PivotResult<Vec<f64>> {
    let offending: Vec<String> = values
        .iter()
        .filter(|v| !v.is_number())
        .map(Value::as_text)
        .collect();

    if !offending.is_empty() {
        return Err(PivotError::NonNumericAggregationInput {
            operator: operators
                .iter()
                .map(|op| op.keyword())
                .collect::<Vec<_>>()
                .join(", "),
            column: column.to_string(),
            values: offending,
        });
    }

    Ok(values.iter().filter_map(Value::as_number).collect())
}

/// Apply one numeric operator to already-validated numbers
pub fn apply_numeric(operator: AggregateOperator, column: &str, values: &[f64]) -> PivotResult<f64> {
    let empty = || PivotError::EmptyAggregation {
        operator: operator.keyword().to_string(),
        column: column.to_string(),
    };
    match operator {
        AggregateOperator::Sum => Ok(sum(values)),
        AggregateOperator::Average => Ok(average(values)),
        AggregateOperator::Min => min(values).ok_or_else(empty),
        AggregateOperator::Max => max(values).ok_or_else(empty),
        AggregateOperator::Median => Ok(median(values)),
        AggregateOperator::First => values.first().copied().ok_or_else(empty),
    }
}

/// Aggregate one column's values under each operator and join the rendered
/// results with ", ".
pub fn aggregate_column(
    operators: &[AggregateOperator],
    column: &str,
    values: &[Value],
    labels: LabelMode,
) -> PivotResult<String> {
    let numeric_ops: Vec<AggregateOperator> = operators
        .iter()
        .copied()
        .filter(|op| !matches!(op, AggregateOperator::First))
        .collect();
    let numbers = if numeric_ops.is_empty() {
        Vec::new()
    } else {
        ensure_numeric(&numeric_ops, column, values)?
    };

    let with_label = match labels {
        LabelMode::Always => true,
        LabelMode::WhenMultiple => operators.len() > 1,
    };

    let mut results = Vec::with_capacity(operators.len());
    for &operator in operators {
        let rendered = match operator {
            AggregateOperator::First => match values.first() {
                Some(Value::Number(n)) => format_number(*n),
                Some(Value::Text(s)) => s.clone(),
                None => String::new(),
            },
            _ => format_number(apply_numeric(operator, column, &numbers)?),
        };
        results.push(if with_label {
            format!("{}: {}", operator.label(), rendered)
        } else {
            rendered
        });
    }

    Ok(results.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|n| Value::Number(*n)).collect()
    }

    #[test]
    fn test_median_even_count_takes_upper_middle() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 3.0);
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(median(&[9.0, 1.0, 5.0]), 5.0);
    }

    #[test]
    fn test_average_of_empty_set_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn test_min_max_of_empty_set_is_an_error() {
        for op in [AggregateOperator::Min, AggregateOperator::Max] {
            let err = apply_numeric(op, "Cost", &[]).unwrap_err();
            assert!(matches!(err, PivotError::EmptyAggregation { .. }));
        }
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[3.0, -1.0, 2.0]), Some(-1.0));
        assert_eq!(max(&[3.0, -1.0, 2.0]), Some(3.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(349.0), "349");
        assert_eq!(format_number(116.333333), "116.33");
        assert_eq!(format_number(0.415), "0.41");
        assert_eq!(format_number(1.5), "1.50");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_labels_for_multiple_operators() {
        let out = aggregate_column(
            &[AggregateOperator::Sum, AggregateOperator::Average],
            "Annual Cost",
            &numbers(&[120.0, 99.0, 130.0]),
            LabelMode::WhenMultiple,
        )
        .unwrap();
        assert_eq!(out, "Sum: 349, Avg: 116.33");
    }

    #[test]
    fn test_single_operator_label_depends_on_mode() {
        let values = numbers(&[2.0, 4.0]);
        let ops = [AggregateOperator::Sum];
        assert_eq!(
            aggregate_column(&ops, "Qty", &values, LabelMode::WhenMultiple).unwrap(),
            "6"
        );
        assert_eq!(
            aggregate_column(&ops, "Qty", &values, LabelMode::Always).unwrap(),
            "Sum: 6"
        );
    }

    #[test]
    fn test_non_numeric_input_names_all_offenders() {
        let values = vec![Value::Number(1.0), Value::from("n/a"), Value::empty()];
        let err = aggregate_column(
            &[AggregateOperator::Sum],
            "Cost",
            &values,
            LabelMode::Always,
        )
        .unwrap_err();
        match err {
            PivotError::NonNumericAggregationInput {
                operator,
                column,
                values,
            } => {
                assert_eq!(operator, "SUM");
                assert_eq!(column, "Cost");
                assert_eq!(values, vec!["n/a".to_string(), String::new()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_skips_numeric_guard() {
        let values = vec![Value::from("Fruit"), Value::from("Veg")];
        let out = aggregate_column(
            &[AggregateOperator::First],
            "Category",
            &values,
            LabelMode::Always,
        )
        .unwrap();
        assert_eq!(out, "First: Fruit");
    }
}
