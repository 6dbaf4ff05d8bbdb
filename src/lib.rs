//! Pivotify - pivoting, summarizing and styling for HTML-style tables
//!
//! This library reads instructions embedded in a table's caption, then
//! derives computed columns, collapses rows by pivoting groups, appends
//! summary rows and colors cells by value.
//!
//! # Features
//!
//! - Lazily resolved cells with `${Column}` references and arithmetic coercion
//! - Computed columns from templates such as `${Unit Cost} * ${Qty}`
//! - Grouping with SUM, AVERAGE, MIN, MAX, MEDIAN and FIRST
//! - Summary rows over the whole table
//! - Value-driven color gradients
//!
//! # Example
//!
//! ```no_run
//! use pivotify::directives::parse_instructions;
//! use pivotify::external::load_table;
//! use std::path::Path;
//!
//! let table = load_table(Path::new("subscriptions.json"))?;
//! let instructions = parse_instructions(r#"PIVOTIFYJS_SUMMARY_SUM:["Annual Cost"]"#)?;
//!
//! if let Some(result) = pivotify::process(&table, &instructions)? {
//!     println!("{}", result.to_html());
//! }
//! # Ok::<(), pivotify::error::PivotError>(())
//! ```

pub mod cli;
pub mod core;
pub mod directives;
pub mod error;
pub mod external;
pub mod types;

// Re-export commonly used types
pub use crate::core::{process, CellValue, TableData, Value};
pub use error::{PivotError, PivotResult};
pub use external::{RawCell, RawTable};
pub use types::{AggregateInstruction, AggregateOperator, ComputeInstruction, Instructions, StyleInstruction};
