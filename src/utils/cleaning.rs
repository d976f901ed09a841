use crate::models::{format_number, StatTable};
use crate::utils::data::{list_csv_files, load_stat_table, save_stat_table};
use crate::utils::summary::median;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fill text used for missing cells in non-numeric columns
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtMost(f64),
    AtLeast(f64),
}

impl Bound {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Bound::AtMost(max) => value.min(max),
            Bound::AtLeast(min) => value.max(min),
        }
    }
}

/// Which columns get their missing values imputed
#[derive(Debug, Clone, Copy)]
pub enum FillScope {
    AllColumns,
    Only(&'static [&'static str]),
}

/// One cleaning step over a directory of stats files
#[derive(Debug, Clone, Copy)]
pub struct CleaningPass {
    /// Prepended to the input file name for the output file
    pub prefix: &'static str,
    pub drop_columns: &'static [&'static str],
    pub fill: FillScope,
    pub bounds: &'static [(&'static str, Bound)],
}

/// First pass over freshly scraped files
pub const FIRST_PASS: CleaningPass = CleaningPass {
    prefix: "cleaned_",
    drop_columns: &["Extra_0"],
    fill: FillScope::AllColumns,
    bounds: &[("FG%", Bound::AtMost(100.0)), ("PPR", Bound::AtMost(100.0))],
};

/// Final pass over the processed data directory
pub const FINAL_PASS: CleaningPass = CleaningPass {
    prefix: "final_",
    drop_columns: &[],
    fill: FillScope::Only(&[
        "PTS", "RPG", "APG", "SPG", "BPG", "EFF", "FTA", "FT%", "DREB", "OREB", "AST", "STL", "TO",
        "BLK",
    ]),
    bounds: &[("PPR", Bound::AtMost(30.0)), ("FG%", Bound::AtLeast(10.0))],
};

impl CleaningPass {
    pub fn apply(&self, table: &mut StatTable) {
        for column in self.drop_columns {
            table.drop_column(column);
        }

        let targets: Vec<String> = match self.fill {
            FillScope::AllColumns => table.headers.clone(),
            FillScope::Only(columns) => columns
                .iter()
                .filter(|c| table.has_column(c))
                .map(|c| c.to_string())
                .collect(),
        };
        for column in &targets {
            fill_missing(table, column);
        }

        for (column, bound) in self.bounds {
            if table.has_column(column) {
                table.map_numeric(column, |v| bound.apply(v));
            }
        }
    }

    /// Clean one file, writing `<prefix><name>` next to it
    pub fn clean_file(&self, path: &Path) -> Result<PathBuf> {
        let mut table = load_stat_table(path)?;
        self.apply(&mut table);

        let file_name = path
            .file_name()
            .context("Input path has no file name")?
            .to_string_lossy();
        let output = path.with_file_name(format!("{}{}", self.prefix, file_name));
        save_stat_table(&table, &output)?;
        Ok(output)
    }

    /// Clean every CSV in `dir`, skipping files this pass already produced
    ///
    /// A file that fails to load or save is logged and skipped.
    pub fn clean_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for path in list_csv_files(dir)? {
            let is_own_output = path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with(self.prefix))
                .unwrap_or(false);
            if is_own_output {
                continue;
            }

            match self.clean_file(&path) {
                Ok(output) => {
                    info!("Cleaned file saved: {}", output.display());
                    written.push(output);
                }
                Err(e) => warn!("Error processing {}: {:#}", path.display(), e),
            }
        }

        Ok(written)
    }
}

/// Impute missing cells: column median for numeric columns, `Unknown` otherwise
///
/// A numeric column with no values at all is left untouched.
pub fn fill_missing(table: &mut StatTable, column: &str) {
    let Some(idx) = table.column_index(column) else {
        return;
    };
    let has_missing = table
        .rows
        .iter()
        .any(|row| row.get(idx).map_or(true, |c| c.trim().is_empty()));
    if !has_missing {
        return;
    }

    let fill = if table.is_numeric(column) {
        let values: Vec<f64> = table
            .numeric_column(column)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();
        match median(&values) {
            Some(m) => format_number(m),
            None => return,
        }
    } else {
        UNKNOWN.to_string()
    };

    for row in &mut table.rows {
        if row.len() <= idx {
            row.resize(idx + 1, String::new());
        }
        if row[idx].trim().is_empty() {
            row[idx] = fill.clone();
        }
    }
}
