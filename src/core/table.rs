//! In-memory tabular model

use super::cell::{CellState, CellValue, Value};
use super::template;
use crate::error::{PivotError, PivotResult};
use crate::external::{RawCell, RawTable};
use std::collections::HashMap;
use tracing::debug;

/// A column addressed by name or by zero-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef<'_> {
    fn from(idx: usize) -> Self {
        ColumnRef::Index(idx)
    }
}

/// Named columns and ordered rows of [`CellValue`]s.
///
/// Every row holds exactly one cell per column. When two columns share a
/// name, lookups by name resolve to the later one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl TableData {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table with the given columns
    pub fn with_columns<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.push_column_name(name.into());
        }
        table
    }

    /// Build from an external table: trimmed header text becomes the columns,
    /// trimmed body text becomes unresolved cells. Short rows are padded with
    /// empty cells and cells past the last header are dropped.
    pub fn from_external(raw: &RawTable) -> Self {
        let mut table = Self::with_columns(raw.headers.iter().map(|h| h.trim().to_string()));
        let width = table.column_count();

        for (row_idx, raw_row) in raw.rows.iter().enumerate() {
            if raw_row.len() > width {
                debug!(
                    row = row_idx,
                    cells = raw_row.len(),
                    columns = width,
                    "dropping cells past the last header"
                );
            }
            let mut row: Vec<CellValue> = raw_row
                .iter()
                .take(width)
                .map(|cell| {
                    let mut value = CellValue::unresolved(cell.text.trim());
                    if let Some(style) = &cell.style {
                        value.set_style(style.clone());
                    }
                    value
                })
                .collect();
            row.resize_with(width, || CellValue::unresolved(""));
            table.rows.push(row);
        }

        table
    }

    /// Render back to the external representation, resolving every cell
    pub fn to_external(&self) -> PivotResult<RawTable> {
        let mut raw = RawTable::new(self.columns.clone());
        for row_idx in 0..self.rows.len() {
            let mut out = Vec::with_capacity(self.columns.len());
            for col_idx in 0..self.columns.len() {
                let value = self.resolve_cell(row_idx, col_idx)?;
                let mut cell = RawCell::new(value.as_text());
                cell.style = self.rows[row_idx][col_idx].style().map(str::to_string);
                out.push(cell);
            }
            raw.rows.push(out);
        }
        Ok(raw)
    }

    fn push_column_name(&mut self, name: String) -> usize {
        let idx = self.columns.len();
        self.index.insert(name.clone(), idx);
        self.columns.push(name);
        idx
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn resolve_column(&self, column: ColumnRef<'_>) -> PivotResult<usize> {
        match column {
            ColumnRef::Name(name) => self.column_index(name).ok_or_else(|| {
                PivotError::ColumnNotFound {
                    columns: vec![name.to_string()],
                }
            }),
            ColumnRef::Index(idx) if idx < self.columns.len() => Ok(idx),
            ColumnRef::Index(idx) => Err(PivotError::ColumnNotFound {
                columns: vec![format!("#{}", idx)],
            }),
        }
    }

    pub fn cell<'a>(&self, row: usize, column: impl Into<ColumnRef<'a>>) -> Option<&CellValue> {
        let col = self.resolve_column(column.into()).ok()?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Resolve and return one cell's value
    pub fn value<'a>(&self, row: usize, column: impl Into<ColumnRef<'a>>) -> PivotResult<Value> {
        let col = self.resolve_column(column.into())?;
        if row >= self.rows.len() {
            return Err(PivotError::RowOutOfBounds {
                row,
                rows: self.rows.len(),
            });
        }
        self.resolve_cell(row, col)
    }

    /// Every cell value of one row, in column order
    pub fn row_values(&self, row: usize) -> PivotResult<Vec<Value>> {
        (0..self.columns.len())
            .map(|col| self.value(row, col))
            .collect()
    }

    /// Every row's value in one column, in row order
    pub fn column_values<'a>(&self, column: impl Into<ColumnRef<'a>>) -> PivotResult<Vec<Value>> {
        let col = self.resolve_column(column.into())?;
        (0..self.rows.len())
            .map(|row| self.resolve_cell(row, col))
            .collect()
    }

    /// Resolve every cell so no unresolved state remains
    pub fn resolve_all(&self) -> PivotResult<()> {
        for row in 0..self.rows.len() {
            for col in 0..self.columns.len() {
                self.resolve_cell(row, col)?;
            }
        }
        Ok(())
    }

    /// Single-pass substitution of `${Column}` references, then numeric coercion.
    /// The result is cached in the cell; re-entering a cell under resolution is
    /// a circular reference.
    fn resolve_cell(&self, row: usize, col: usize) -> PivotResult<Value> {
        let cell = &self.rows[row][col];
        let raw = {
            let mut state = cell.state.borrow_mut();
            let raw = match &*state {
                CellState::Resolved(value) => return Ok(value.clone()),
                CellState::Resolving => {
                    return Err(PivotError::CircularReference {
                        column: self.columns[col].clone(),
                        row,
                    })
                }
                CellState::Unresolved(raw) => raw.clone(),
            };
            *state = CellState::Resolving;
            raw
        };

        let substituted = if template::has_variables(&raw) {
            template::substitute(&raw, |var| -> PivotResult<String> {
                let text = match self.column_index(var.column) {
                    Some(idx) => self.resolve_cell(row, idx)?.as_text(),
                    None => String::new(),
                };
                Ok(match var.default {
                    Some(default) if text.is_empty() => default.to_string(),
                    _ => text,
                })
            })
        } else {
            Ok(raw.clone())
        };

        match substituted {
            Ok(text) => {
                let value = Value::from_text(&text);
                *cell.state.borrow_mut() = CellState::Resolved(value.clone());
                Ok(value)
            }
            Err(e) => {
                *cell.state.borrow_mut() = CellState::Unresolved(raw);
                Err(e)
            }
        }
    }

    /// Append a row of empty cells and return it for the caller to populate
    pub fn create_row(&mut self) -> &mut [CellValue] {
        let width = self.columns.len();
        self.rows
            .push((0..width).map(|_| CellValue::empty()).collect());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Append a row, padding or truncating it to the column count
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        cells.resize_with(self.columns.len(), CellValue::empty);
        self.rows.push(cells);
    }

    /// Append a column at the end of the column order with one cell per row
    pub fn add_column(&mut self, name: impl Into<String>, cells: Vec<CellValue>) {
        self.push_column_name(name.into());
        let mut cells = cells.into_iter();
        for row in &mut self.rows {
            row.push(cells.next().unwrap_or_else(CellValue::empty));
        }
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut CellValue> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }
}
