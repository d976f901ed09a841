use crate::models::{NormalizedTable, RawRow, RowKind, CANONICAL_HEADERS};
use tracing::debug;

/// A row is a header row when every cell is a non-empty alphabetic word
pub fn classify_row(row: &[String]) -> RowKind {
    let all_alpha = !row.is_empty()
        && row
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(char::is_alphabetic));

    if all_alpha {
        RowKind::HeaderRow
    } else {
        RowKind::DataRow
    }
}

/// Placeholder name for a column with no known header
fn placeholder(index: usize) -> String {
    format!("Extra_{}", index)
}

/// Assign a name to every one of `width` raw columns
///
/// Wider-than-canonical grids always take the canonical names positionally,
/// even when a header row was detected.
fn align_columns(header: &[String], width: usize) -> Vec<String> {
    let canonical = CANONICAL_HEADERS.len();

    if width > canonical {
        CANONICAL_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain((0..width - canonical).map(placeholder))
            .collect()
    } else {
        (0..width)
            .map(|i| {
                header
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| placeholder(i - header.len()))
            })
            .collect()
    }
}

/// Reconcile scraped rows onto the canonical schema
///
/// Only the output schema is guaranteed. When a source orders its columns
/// differently from the canonical list and has no detectable header row, values
/// land under the wrong stat names.
pub fn normalize(mut rows: Vec<RawRow>) -> NormalizedTable {
    if rows.is_empty() {
        return NormalizedTable::empty();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    let header: Vec<String> = match classify_row(&rows[0]) {
        RowKind::HeaderRow => rows.remove(0),
        RowKind::DataRow => CANONICAL_HEADERS
            .iter()
            .take(width)
            .map(|h| h.to_string())
            .collect(),
    };

    let names = align_columns(&header, width);

    let dropped: Vec<&str> = names
        .iter()
        .filter(|n| !CANONICAL_HEADERS.contains(&n.as_str()))
        .map(String::as_str)
        .collect();
    if !dropped.is_empty() {
        debug!("Dropping non-canonical columns: {:?}", dropped);
    }

    let mut filled = Vec::new();
    let columns: Vec<Vec<Option<String>>> = CANONICAL_HEADERS
        .iter()
        .map(|canonical| {
            // First occurrence wins when a source repeats a header
            match names.iter().position(|n| n == canonical) {
                Some(idx) => rows.iter().map(|row| row.get(idx).cloned()).collect::<Vec<_>>(),
                None => {
                    filled.push(*canonical);
                    vec![None; rows.len()]
                }
            }
        })
        .collect();

    if !filled.is_empty() {
        debug!("Filling absent columns with nulls: {:?}", filled);
    }

    NormalizedTable::from_columns(columns)
}
