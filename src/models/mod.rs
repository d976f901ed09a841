use serde::{Deserialize, Serialize};

/// Column names every scraped stats file is normalized onto, in output order
pub const CANONICAL_HEADERS: [&str; 25] = [
    "Player", "GP", "FT", "FGM", "FGA", "FG%", "3PM", "3PA", "3P%", "FTM", "FTA", "FT%", "DREB",
    "OREB", "AST", "STL", "TO", "BLK", "PTS", "RPG", "APG", "SPG", "BPG", "EFF", "PPR",
];

/// Text cells of one table row, in document order
pub type RawRow = Vec<String>;

/// Whether a raw row carries column names or player values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    HeaderRow,
    DataRow,
}

/// A scraped table reconciled onto `CANONICAL_HEADERS`
///
/// Values are stored column-major, one `Vec` per canonical column. `None` is a
/// cell the source page never provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    columns: Vec<Vec<Option<String>>>,
    row_count: usize,
}

impl NormalizedTable {
    pub fn empty() -> Self {
        Self {
            columns: vec![Vec::new(); CANONICAL_HEADERS.len()],
            row_count: 0,
        }
    }

    /// Build from canonical-ordered columns; all columns must share one length
    pub(crate) fn from_columns(columns: Vec<Vec<Option<String>>>) -> Self {
        debug_assert_eq!(columns.len(), CANONICAL_HEADERS.len());
        let row_count = columns.first().map(Vec::len).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        Self { columns, row_count }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        &CANONICAL_HEADERS
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        let idx = CANONICAL_HEADERS.iter().position(|h| *h == name)?;
        Some(&self.columns[idx])
    }

    /// Iterate rows in canonical column order
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&str>>> + '_ {
        (0..self.row_count).map(move |r| {
            self.columns
                .iter()
                .map(|col| col[r].as_deref())
                .collect()
        })
    }
}

impl Default for NormalizedTable {
    fn default() -> Self {
        Self::empty()
    }
}

/// A stats CSV loaded back from disk for cleaning and analysis
///
/// Unlike `NormalizedTable` the header set is whatever the file carries. An
/// empty field is a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StatTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Raw cell text of a column, missing cells as empty strings
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Numeric view of a column; missing or unparseable cells are `None`
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let cells = self.column(name)?;
        Some(cells.into_iter().map(parse_number).collect())
    }

    /// True when every non-missing cell in the column parses as a number
    pub fn is_numeric(&self, name: &str) -> bool {
        match self.column(name) {
            Some(cells) => cells
                .iter()
                .filter(|c| !c.trim().is_empty())
                .all(|c| parse_number(c).is_some()),
            None => false,
        }
    }

    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
        true
    }

    /// Overwrite a column, appending it when absent
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            if row.len() <= idx {
                row.resize(idx + 1, String::new());
            }
            row[idx] = value;
        }
    }

    /// Apply `f` to every non-missing numeric cell of a column
    ///
    /// Cells whose value `f` leaves unchanged keep their original text.
    pub fn map_numeric<F>(&mut self, name: &str, f: F)
    where
        F: Fn(f64) -> f64,
    {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                if let Some(value) = parse_number(cell) {
                    let mapped = f(value);
                    if mapped != value {
                        *cell = format_number(mapped);
                    }
                }
            }
        }
    }
}

/// Parse a stat cell, tolerating surrounding whitespace and a trailing `%`
///
/// Non-finite values such as `inf` or `NaN` are not numbers here.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a computed value; whole numbers drop the fractional part
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rendered = format!("{:.4}", value);
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
