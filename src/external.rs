//! External tabular representation
//!
//! A table document is a header row plus body rows of cells, read from and
//! written to JSON or YAML. Cells may be bare strings or numbers in input:
//!
//! ```yaml
//! headers: [Service, Annual Cost]
//! rows:
//!   - [Netflix, 120]
//!   - [{ text: Total, colspan: 2 }]
//! ```

use crate::error::PivotResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// One cell of an external table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCellRepr", into = "RawCellRepr")]
pub struct RawCell {
    pub text: String,
    /// Inline CSS applied when rendering
    pub style: Option<String>,
    pub colspan: usize,
    pub rowspan: usize,
}

impl RawCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            colspan: 1,
            rowspan: 1,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_span(mut self, colspan: usize, rowspan: usize) -> Self {
        self.colspan = colspan;
        self.rowspan = rowspan;
        self
    }

    fn is_plain(&self) -> bool {
        self.style.is_none() && self.colspan == 1 && self.rowspan == 1
    }
}

impl From<&str> for RawCell {
    fn from(text: &str) -> Self {
        RawCell::new(text)
    }
}

fn one() -> usize {
    1
}

fn is_one(n: &usize) -> bool {
    *n == 1
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCellRepr {
    Text(String),
    Number(f64),
    Full {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default = "one", skip_serializing_if = "is_one")]
        colspan: usize,
        #[serde(default = "one", skip_serializing_if = "is_one")]
        rowspan: usize,
    },
}

impl From<RawCellRepr> for RawCell {
    fn from(repr: RawCellRepr) -> Self {
        match repr {
            RawCellRepr::Text(text) => RawCell::new(text),
            RawCellRepr::Number(n) => RawCell::new(n.to_string()),
            RawCellRepr::Full {
                text,
                style,
                colspan,
                rowspan,
            } => RawCell {
                text,
                style,
                colspan,
                rowspan,
            },
        }
    }
}

impl From<RawCell> for RawCellRepr {
    fn from(cell: RawCell) -> Self {
        if cell.is_plain() {
            RawCellRepr::Text(cell.text)
        } else {
            RawCellRepr::Full {
                text: cell.text,
                style: cell.style,
                colspan: cell.colspan,
                rowspan: cell.rowspan,
            }
        }
    }
}

/// A table with a single header row and zero or more body rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from plain header and cell text
    pub fn from_text_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|t| RawCell::new(t)).collect())
                .collect(),
        }
    }

    pub fn from_json_str(content: &str) -> PivotResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> PivotResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_json(&self) -> PivotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> PivotResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Cell text of every body row, for assertions and display
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    /// Expand colspan/rowspan so every visual position holds its own cell.
    ///
    /// Spanned cells are duplicated into each position they cover and their
    /// spans reset to 1. Positions covered by nothing become empty cells, and
    /// row spans past the last body row are dropped.
    pub fn expand_spans(&self) -> RawTable {
        let row_count = self.rows.len();
        let mut matrix: Vec<Vec<Option<RawCell>>> = vec![Vec::new(); row_count];

        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut col_idx = 0;
            for cell in row {
                while matrix[row_idx].get(col_idx).is_some_and(Option::is_some) {
                    col_idx += 1;
                }
                // spans never reach past the header width or the last row
                let width_left = self.headers.len().saturating_sub(col_idx).max(1);
                let colspan = cell.colspan.clamp(1, width_left);
                let rowspan = cell.rowspan.max(1);
                let mut copy = cell.clone();
                copy.colspan = 1;
                copy.rowspan = 1;

                for target_row in row_idx..row_idx.saturating_add(rowspan).min(row_count) {
                    let slots = &mut matrix[target_row];
                    for target_col in col_idx..col_idx + colspan {
                        if slots.len() <= target_col {
                            slots.resize(target_col + 1, None);
                        }
                        slots[target_col] = Some(copy.clone());
                    }
                }
                col_idx += colspan;
            }
        }

        RawTable {
            headers: self.headers.clone(),
            rows: matrix
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|c| c.unwrap_or_else(|| RawCell::new("")))
                        .collect()
                })
                .collect(),
        }
    }

    /// Render `<table>` markup with escaped text and inline styles
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table><thead><tr>");
        for header in &self.headers {
            let _ = write!(html, "<th>{}</th>", escape_html(header));
        }
        html.push_str("</tr></thead><tbody>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td");
                if let Some(style) = &cell.style {
                    let _ = write!(html, " style=\"{}\"", escape_html(style));
                }
                if cell.colspan > 1 {
                    let _ = write!(html, " colspan=\"{}\"", cell.colspan);
                }
                if cell.rowspan > 1 {
                    let _ = write!(html, " rowspan=\"{}\"", cell.rowspan);
                }
                let _ = write!(html, ">{}</td>", escape_html(&cell.text));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Load a table document, choosing YAML or JSON by file extension
pub fn load_table(path: &Path) -> PivotResult<RawTable> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => RawTable::from_yaml_str(&content),
        _ => RawTable::from_json_str(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_mixed_cells() {
        let table = RawTable::from_yaml_str(
            r#"
headers: [Service, Annual Cost]
rows:
  - [Netflix, 120]
  - [{ text: Total, colspan: 2, style: "color: red;" }]
"#,
        )
        .unwrap();
        assert_eq!(table.rows[0][1].text, "120");
        assert_eq!(table.rows[1][0].colspan, 2);
        assert_eq!(table.rows[1][0].style.as_deref(), Some("color: red;"));
    }

    #[test]
    fn test_plain_cells_serialize_as_strings() {
        let table = RawTable::from_text_rows(["A"], [["1"]]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["rows"][0][0], serde_json::json!("1"));
    }

    #[test]
    fn test_expand_colspan() {
        let mut table = RawTable::new(vec!["A".into(), "B".into(), "C".into()]);
        table.rows.push(vec![RawCell::new("x").with_span(2, 1), RawCell::new("y")]);
        let expanded = table.expand_spans();
        assert_eq!(expanded.text_rows(), vec![vec!["x", "x", "y"]]);
        assert_eq!(expanded.rows[0][1].colspan, 1);
    }

    #[test]
    fn test_expand_rowspan() {
        let mut table = RawTable::new(vec!["Category".into(), "Item".into()]);
        table.rows.push(vec![RawCell::new("Fruit").with_span(1, 2), RawCell::new("Apple")]);
        table.rows.push(vec![RawCell::new("Banana")]);
        let expanded = table.expand_spans();
        assert_eq!(
            expanded.text_rows(),
            vec![vec!["Fruit", "Apple"], vec!["Fruit", "Banana"]]
        );
    }

    #[test]
    fn test_rowspan_past_last_row_is_dropped() {
        let mut table = RawTable::new(vec!["A".into()]);
        table.rows.push(vec![RawCell::new("x").with_span(1, 5)]);
        assert_eq!(table.expand_spans().rows.len(), 1);
    }

    #[test]
    fn test_colspan_past_last_column_is_clamped() {
        let mut table = RawTable::new(vec!["A".into(), "B".into(), "C".into()]);
        table.rows.push(vec![
            RawCell::new("x"),
            RawCell::new("wide").with_span(4_000_000_000, usize::MAX),
        ]);
        table.rows.push(vec![RawCell::new("y")]);
        let expanded = table.expand_spans();
        assert_eq!(expanded.text_rows()[0], vec!["x", "wide", "wide"]);
        assert_eq!(expanded.text_rows()[1], vec!["y", "wide", "wide"]);
    }

    #[test]
    fn test_to_html_escapes_and_styles() {
        let mut table = RawTable::new(vec!["A&B".into()]);
        table
            .rows
            .push(vec![RawCell::new("<1>").with_style("color: rgb(0, 128, 0);")]);
        assert_eq!(
            table.to_html(),
            "<table><thead><tr><th>A&amp;B</th></tr></thead><tbody><tr>\
             <td style=\"color: rgb(0, 128, 0);\">&lt;1&gt;</td></tr></tbody></table>"
        );
    }
}
