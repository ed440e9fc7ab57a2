//! Untyped tabular data as it comes out of a source file.

use std::borrow::Cow;

use crate::data::format_number;

static BLANK: RawCell = RawCell::Blank;

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Blank,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn from_text(value: &str) -> Self {
        if value.is_empty() {
            RawCell::Blank
        } else {
            RawCell::Text(value.to_string())
        }
    }

    /// Textual form used before every parse.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawCell::Blank => Cow::Borrowed(""),
            RawCell::Text(s) => Cow::Borrowed(s.as_str()),
            RawCell::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with blanks and dropping cells past
    /// the header width.
    pub fn push_row(&mut self, mut cells: Vec<RawCell>) {
        cells.resize(self.headers.len(), RawCell::Blank);
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &RawCell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&BLANK)
    }
}
