//! In-memory view of a spreadsheet.
//!
//! A [`Sheet`] is a dense grid anchored at A1, so row indices match what a
//! spreadsheet user sees (minus one). A [`Frame`] reads that grid with a
//! chosen header row and exposes named columns.

use crate::domain::lenient::parse_decimal;
use crate::utils::error::{AgroError, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Empty,
    Text,
    Number,
    Bool,
    Date,
    Error,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::Empty => "empty",
            CellKind::Text => "text",
            CellKind::Number => "number",
            CellKind::Bool => "bool",
            CellKind::Date => "date",
            CellKind::Error => "error",
        };
        f.write_str(name)
    }
}

impl CellValue {
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Empty => CellKind::Empty,
            CellValue::Text(_) => CellKind::Text,
            CellValue::Number(_) => CellKind::Number,
            CellValue::Bool(_) => CellKind::Bool,
            CellValue::Date(_) => CellKind::Date,
            CellValue::Error(_) => CellKind::Error,
        }
    }

    /// Blank strings count as empty, the way spreadsheet readers treat them.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(s) if !s.trim().is_empty())
    }

    /// Numeric content. Text is accepted when it parses as a decimal
    /// (`"1.234,50"` included).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    /// Numeric content or zero.
    pub fn number_or_zero(&self) -> f64 {
        self.as_f64().unwrap_or(0.0)
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s.trim()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) if d.time() == chrono::NaiveTime::MIN => {
                write!(f, "{}", d.format("%Y-%m-%d"))
            }
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(e) => write!(f, "#{}", e),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Sheet {
    /// Builds a sheet from ragged rows; short rows are padded with empty
    /// cells and trailing empty rows are dropped.
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        while rows
            .last()
            .is_some_and(|row| row.iter().all(CellValue::is_empty))
        {
            rows.pop();
        }

        let width = rows
            .iter()
            .map(|row| {
                row.iter()
                    .rposition(|cell| !cell.is_empty())
                    .map(|i| i + 1)
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);

        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }

        Self {
            name: name.into(),
            rows,
            width,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn frame(&self, header_row: usize) -> Frame {
        Frame::from_sheet(self, header_row)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A sheet read below a header row, with named columns.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub sheet: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Frame {
    pub fn from_sheet(sheet: &Sheet, header_row: usize) -> Self {
        let header = sheet.row(header_row).unwrap_or(&[]);
        let columns = column_names(header, sheet.width());
        let rows = sheet
            .rows()
            .iter()
            .skip(header_row + 1)
            .cloned()
            .collect();

        Self {
            sheet: sheet.name.clone(),
            columns,
            rows,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| AgroError::MissingColumnError {
                sheet: self.sheet.clone(),
                column: name.to_string(),
            })
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Value of a named column in a row; empty when the column is absent.
    pub fn get(&self, row: usize, name: &str) -> &CellValue {
        match self.column_index(name) {
            Some(column) => self.cell(row, column),
            None => &EMPTY_CELL,
        }
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&EMPTY_CELL))
    }

    /// Sum of the numeric cells of a column, ignoring everything else.
    pub fn column_sum(&self, name: &str) -> Option<f64> {
        let index = self.column_index(name)?;
        Some(self.column(index).filter_map(CellValue::as_f64).sum())
    }

    /// Most frequent kind among the non-empty cells; `Empty` for a blank
    /// column. Ties go to the kind seen first.
    pub fn column_kind(&self, index: usize) -> CellKind {
        let mut counts: Vec<(CellKind, usize)> = Vec::new();
        for cell in self.column(index).filter(|c| !c.is_empty()) {
            let kind = cell.kind();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }

        let mut best = (CellKind::Empty, 0);
        for (kind, n) in counts {
            if n > best.1 {
                best = (kind, n);
            }
        }
        best.0
    }

    /// Rows holding at least one non-empty cell.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
            .map(|(i, row)| (i, row.as_slice()))
    }
}

/// Names header cells: blanks become `Unnamed: i`, repeats get `.1`, `.2`...
fn column_names(header: &[CellValue], width: usize) -> Vec<String> {
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(width);

    for i in 0..width {
        let base = match header.get(i) {
            Some(cell) if !cell.is_empty() => cell.as_text(),
            _ => format!("Unnamed: {}", i),
        };

        let mut name = base.clone();
        // a generated `A.1` may collide with a literal `A.1` header
        while used.contains(&name) {
            let suffix = suffixes.entry(base.clone()).or_insert(0);
            *suffix += 1;
            name = format!("{}.{}", base, suffix);
        }
        used.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn sample_sheet() -> Sheet {
        Sheet::new(
            "Bancos",
            vec![
                vec![text("PLANO DE NEGÓCIOS")],
                vec![],
                vec![text("BANCO"), CellValue::Number(2025.0), CellValue::Empty, text("BANCO")],
                vec![text("Banco A"), CellValue::Number(100.0), CellValue::Number(1.0)],
                vec![text("Banco B"), text("50,5"), CellValue::Empty, text("x")],
                vec![CellValue::Empty],
            ],
        )
    }

    #[test]
    fn test_sheet_is_dense_and_trimmed() {
        let sheet = sample_sheet();
        assert_eq!(sheet.height(), 5);
        assert_eq!(sheet.width(), 4);
        assert!(sheet.rows().iter().all(|r| r.len() == 4));
    }

    #[test]
    fn test_frame_names_columns() {
        let frame = sample_sheet().frame(2);
        assert_eq!(frame.columns, vec!["BANCO", "2025", "Unnamed: 2", "BANCO.1"]);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.column_sum("2025"), Some(150.5));
        assert_eq!(frame.column_sum("2030"), None);
        assert_eq!(frame.get(0, "BANCO"), &text("Banco A"));
        assert_eq!(frame.get(0, "missing"), &CellValue::Empty);
    }

    #[test]
    fn test_duplicate_names_skip_literal_suffixes() {
        let header = vec![text("A"), text("A.1"), text("A"), text("A")];
        assert_eq!(column_names(&header, 4), vec!["A", "A.1", "A.2", "A.3"]);
    }

    #[test]
    fn test_column_kind_prefers_majority() {
        let frame = sample_sheet().frame(2);
        assert_eq!(frame.column_kind(0), CellKind::Text);
        assert_eq!(frame.column_kind(2), CellKind::Number);
        let blank = Frame {
            sheet: "x".into(),
            columns: vec!["a".into()],
            rows: vec![vec![CellValue::Empty]],
        };
        assert_eq!(blank.column_kind(0), CellKind::Empty);
    }

    #[test]
    fn test_require_column_reports_sheet() {
        let frame = sample_sheet().frame(2);
        let err = frame.require_column("CULTURA").unwrap_err();
        assert!(err.to_string().contains("CULTURA"));
        assert!(err.to_string().contains("Bancos"));
    }

    #[test]
    fn test_header_beyond_sheet_gives_unnamed_columns() {
        let frame = sample_sheet().frame(10);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.columns[0], "Unnamed: 0");
        assert_eq!(frame.height(), 0);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(2025.0).to_string(), "2025");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert!(CellValue::Text("  ".into()).is_empty());
        assert_eq!(CellKind::Number.to_string(), "number");
    }
}
