use crate::models::StatTable;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Values outside `[q1 - 1.5*IQR, q3 + 1.5*IQR]`
    pub outliers: usize,
}

impl ColumnStats {
    pub fn format(&self) -> String {
        let std = self
            .std
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<10} count {:>4} | mean {:>8.2} | std {:>8} | min {:>7.2} | 25% {:>7.2} | 50% {:>7.2} | 75% {:>7.2} | max {:>7.2} | outliers {}",
            self.column,
            self.count,
            self.mean,
            std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
            self.outliers
        )
    }
}

/// Overview of one stats file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    /// Missing cell count per column, in file order
    pub missing: Vec<(String, usize)>,
    pub numeric: Vec<ColumnStats>,
}

pub fn summarize(table: &StatTable) -> TableSummary {
    let missing = table
        .headers
        .iter()
        .map(|h| {
            let count = table
                .column(h)
                .map(|cells| cells.iter().filter(|c| c.trim().is_empty()).count())
                .unwrap_or(0);
            (h.clone(), count)
        })
        .collect();

    let numeric = table
        .headers
        .iter()
        .filter(|h| table.is_numeric(h))
        .filter_map(|h| {
            let values: Vec<f64> = table.numeric_column(h)?.into_iter().flatten().collect();
            describe(h, &values)
        })
        .collect();

    TableSummary {
        rows: table.rows.len(),
        columns: table.headers.len(),
        missing,
        numeric,
    }
}

/// Describe a column's values; `None` when there are none
pub fn describe(column: &str, values: &[f64]) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });

    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let (low, high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    let outliers = sorted.iter().filter(|v| **v < low || **v > high).count();

    Some(ColumnStats {
        column: column.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q1,
        median: quantile_sorted(&sorted, 0.5),
        q3,
        max: sorted[count - 1],
        outliers,
    })
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Linearly interpolated quantile, `q` in `[0, 1]`
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
