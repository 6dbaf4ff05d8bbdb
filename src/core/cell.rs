//! Cell values with lazy, memoized resolution

use super::arithmetic;
use std::cell::RefCell;
use std::fmt;

/// A resolved cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Coerce text into a value: arithmetic over numeric literals becomes a
    /// number, anything else stays text as given.
    pub fn from_text(text: &str) -> Self {
        match arithmetic::parse_number(text) {
            Some(n) => Value::Number(n),
            None => Value::Text(text.to_string()),
        }
    }

    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Rendered cell text
    pub fn as_text(&self) -> String {
        match self {
            Value::Number(_) => self.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // negative zero renders as "0"
            Value::Number(n) if *n == 0.0 => f.write_str("0"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Resolution state of a cell
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellState {
    /// Raw text, possibly holding `${Column}` references
    Unresolved(String),
    /// Resolution in progress; seeing this again means a reference cycle
    Resolving,
    Resolved(Value),
}

/// A single table cell.
///
/// An unresolved cell is owned by a [`TableData`](super::table::TableData) row,
/// and its position there is the row context its references resolve against.
/// Resolution goes through [`TableData::value`](super::table::TableData::value)
/// and happens at most once; afterwards the cached value is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct CellValue {
    pub(crate) state: RefCell<CellState>,
    style: Option<String>,
}

impl CellValue {
    /// A cell already holding its final value
    pub fn resolved(value: impl Into<Value>) -> Self {
        Self {
            state: RefCell::new(CellState::Resolved(value.into())),
            style: None,
        }
    }

    /// A cell holding raw text, resolved on first read
    pub fn unresolved(raw: impl Into<String>) -> Self {
        Self {
            state: RefCell::new(CellState::Unresolved(raw.into())),
            style: None,
        }
    }

    pub fn empty() -> Self {
        Self::resolved(Value::empty())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.state.borrow(), CellState::Resolved(_))
    }

    /// The cached value, if resolution already happened
    pub fn cached(&self) -> Option<Value> {
        match &*self.state.borrow() {
            CellState::Resolved(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = Some(style.into());
    }
}
