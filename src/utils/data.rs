use crate::error::SinkError;
use crate::models::{NormalizedTable, StatTable};
use crate::BatchReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Stem used when a source URL has no path segment
pub const GENERAL_STEM: &str = "peg_city_general";

/// Output file name for a source URL
/// "https://pegcityball.info/2024-summer-standings/" -> "2024_summer_standings_stats.csv"
pub fn output_file_name(url: &str) -> String {
    let stem = last_path_segment(url).unwrap_or_else(|| GENERAL_STEM.to_string());
    format!("{}_stats.csv", stem.replace('-', "_"))
}

fn last_path_segment(url: &str) -> Option<String> {
    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
        // Not absolute: fall back to splitting the text, skipping any host part
        Err(_) => url
            .split('/')
            .filter(|s| !s.is_empty())
            .skip(1)
            .last()
            .map(str::to_string),
    }
}

/// Write a normalized table as CSV, replacing any existing file
pub fn save_table_to_csv(table: &NormalizedTable, path: &Path) -> Result<(), SinkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SinkError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_err = |source: csv::Error| SinkError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    wtr.write_record(table.headers()).map_err(csv_err)?;
    for row in table.rows() {
        wtr.write_record(row.into_iter().map(|cell| cell.unwrap_or("")))
            .map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Load a stats CSV; short records are padded with empty cells
pub fn load_stat_table(path: &Path) -> Result<StatTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("Bad record in {}", path.display()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(StatTable::new(headers, rows))
}

pub fn save_stat_table(table: &StatTable, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV files directly inside `dir`, sorted by name
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    Ok(files)
}

/// Save the outcome of a scrape batch as JSON
pub fn save_batch_report(report: &BatchReport, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize batch report")?;
    fs::write(path, json).context("Failed to write batch report")?;
    Ok(())
}
