use thiserror::Error;

pub type PivotResult<T> = Result<T, PivotError>;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Column(s) not found in table: '{}'", columns.join("', '"))]
    ColumnNotFound { columns: Vec<String> },

    #[error(
        "Cannot apply {operator} to column '{column}' because it contains non-numeric values: {}. Only numeric values are allowed for aggregation.",
        values.iter().map(|v| format!("'{}'", v)).collect::<Vec<_>>().join(", ")
    )]
    NonNumericAggregationInput {
        operator: String,
        column: String,
        values: Vec<String>,
    },

    #[error("Row {row} out of bounds (table has {rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("Cannot aggregate empty group: {operator} over column '{column}' has no values")]
    EmptyAggregation { operator: String, column: String },

    #[error("Computation failed for equation '{equation}' at row {row}: {reason}")]
    Computation {
        equation: String,
        row: usize,
        reason: String,
    },

    #[error("At least one pivoting group must be specified to collapse a table. Use summary instructions for a single summary row.")]
    InvalidGroupingCall,

    #[error("Aggregator '{operator}' can only be used when grouping is enabled")]
    GroupingRequired { operator: String },

    #[error("Circular reference detected while resolving column '{column}' at row {row}")]
    CircularReference { column: String, row: usize },

    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    #[error("Invalid style instruction: {0}")]
    InvalidStyle(String),
}
