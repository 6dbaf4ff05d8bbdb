use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Aggregation Instructions
//==============================================================================

/// Aggregate operators understood by the grouping and summary engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateOperator {
    Sum,
    Average,
    Min,
    Max,
    Median,
    /// First value in group order (grouping only)
    First,
}

impl AggregateOperator {
    /// All operators, in directive scan order
    pub const ALL: [AggregateOperator; 6] = [
        AggregateOperator::Sum,
        AggregateOperator::Average,
        AggregateOperator::Min,
        AggregateOperator::Max,
        AggregateOperator::Median,
        AggregateOperator::First,
    ];

    /// Directive keyword suffix (e.g. "SUM" in PIVOTIFYJS_SUM)
    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateOperator::Sum => "SUM",
            AggregateOperator::Average => "AVERAGE",
            AggregateOperator::Min => "MIN",
            AggregateOperator::Max => "MAX",
            AggregateOperator::Median => "MEDIAN",
            AggregateOperator::First => "FIRST",
        }
    }

    /// Label prefixed to rendered results
    pub fn label(&self) -> &'static str {
        match self {
            AggregateOperator::Sum => "Sum",
            AggregateOperator::Average => "Avg",
            AggregateOperator::Min => "Min",
            AggregateOperator::Max => "Max",
            AggregateOperator::Median => "Median",
            AggregateOperator::First => "First",
        }
    }

    /// Whether the operator needs an active grouping
    pub fn requires_grouping(&self) -> bool {
        matches!(self, AggregateOperator::First)
    }
}

impl fmt::Display for AggregateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One operator applied to one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateInstruction {
    pub column: String,
    pub operator: AggregateOperator,
}

impl AggregateInstruction {
    pub fn new(column: impl Into<String>, operator: AggregateOperator) -> Self {
        Self {
            column: column.into(),
            operator,
        }
    }
}

/// Group aggregate instructions by column, keeping first-declared column order
/// and dropping duplicate (column, operator) pairs.
pub fn group_by_column(
    instructions: &[AggregateInstruction],
) -> Vec<(String, Vec<AggregateOperator>)> {
    let mut grouped: Vec<(String, Vec<AggregateOperator>)> = Vec::new();
    for instr in instructions {
        match grouped.iter_mut().find(|(col, _)| *col == instr.column) {
            Some((_, ops)) => {
                if !ops.contains(&instr.operator) {
                    ops.push(instr.operator);
                }
            }
            None => grouped.push((instr.column.clone(), vec![instr.operator])),
        }
    }
    grouped
}

//==============================================================================
// Compute Instructions
//==============================================================================

/// A variable referenced by a compute template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeVariable {
    pub column: String,
    /// Literal used when the cell is empty or the column is missing
    #[serde(default)]
    pub default: String,
}

impl ComputeVariable {
    pub fn new(column: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            default: default.into(),
        }
    }
}

/// Derives a new column by substituting row values into an arithmetic template.
///
/// The template references variables as `${Column}`; defaults live in
/// [`ComputeVariable::default`], not in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeInstruction {
    pub column: String,
    pub equation: String,
    pub variables: Vec<ComputeVariable>,
}

//==============================================================================
// Style Instructions
//==============================================================================

/// Which color property a gradient drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientTarget {
    Background,
    Text,
}

impl GradientTarget {
    pub fn css_property(&self) -> &'static str {
        match self {
            GradientTarget::Background => "background-color",
            GradientTarget::Text => "color",
        }
    }
}

/// Value-driven color gradient over one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientInstruction {
    pub column: String,
    pub target: GradientTarget,
    /// Color of the smallest value
    pub from: String,
    /// Color of the largest value
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StyleInstruction {
    Gradient(GradientInstruction),
}

impl StyleInstruction {
    pub fn column(&self) -> &str {
        match self {
            StyleInstruction::Gradient(g) => &g.column,
        }
    }
}

//==============================================================================
// Instruction Set
//==============================================================================

/// Everything parsed from one instruction paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub compute: Vec<ComputeInstruction>,
    #[serde(default)]
    pub aggregate: Vec<AggregateInstruction>,
    #[serde(default)]
    pub summarize: Vec<AggregateInstruction>,
    #[serde(default)]
    pub style: Vec<StyleInstruction>,
}

impl Instructions {
    /// True when no transformation would be applied
    pub fn is_empty(&self) -> bool {
        self.compute.is_empty()
            && self.aggregate.is_empty()
            && self.summarize.is_empty()
            && self.style.is_empty()
    }
}
