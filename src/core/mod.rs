//! Table engine: cell resolution, computed columns, grouping, summaries and styling

pub mod aggregators;
pub mod arithmetic;
pub mod cell;
pub mod collapse;
pub mod color;
pub mod compute;
pub mod pipeline;
pub mod stylize;
pub mod summarize;
pub mod table;
pub mod template;

pub use cell::{CellValue, Value};
pub use collapse::collapse;
pub use compute::apply_computed_columns;
pub use pipeline::{process, transform};
pub use stylize::stylize;
pub use summarize::summarize;
pub use table::{ColumnRef, TableData};
