//! Raw cell grids as read from a decoded workbook.

use serde::Serialize;

/// A single cell value, reduced to the three shapes ingestion cares about.
///
/// Dates arrive as their numeric serial; booleans and formula errors are
/// folded into text and empty respectively.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum RawCell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

static EMPTY_CELL: RawCell = RawCell::Empty;

impl RawCell {
    /// The numeric value, only for cells whose type is numeric.
    ///
    /// Text that happens to look like a number is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawCell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) => false,
        }
    }

    /// Display text of the raw value: integral numbers print without a
    /// fractional part and empty cells print as "".
    pub fn to_plain_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(v) => format_number(*v),
        }
    }

    /// Trimmed text, or `None` for blank cells.
    pub fn to_trimmed(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.to_plain_text().trim().to_string())
    }
}

pub(crate) fn format_number(v: f64) -> String {
    if v == 0.0 {
        // Covers -0.0
        return "0".to_string();
    }
    v.to_string()
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

/// One worksheet as a grid of raw cells.
///
/// Positions are absolute: `rows[0][0]` is cell A1 even when the sheet's
/// used range starts further down or to the right.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Cell at a 0-based row and column; out-of-range positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Number of physical rows, counted from row 1 to the last used row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows holding at least one value.
    pub fn filled_rows(&self) -> impl Iterator<Item = &[RawCell]> {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .filter(|row| !row.iter().all(RawCell::is_blank))
    }

    /// True when no cell in the sheet holds a value.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(RawCell::is_blank))
    }
}
