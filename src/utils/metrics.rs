use crate::models::{format_number, parse_number, StatTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Free throw attempts weighting in the true shooting denominator
const FTA_WEIGHT: f64 = 0.44;

/// True shooting percentage as a fraction in `[0, 1]`
///
/// Zero points, zero attempts and non-finite results all yield 0.
pub fn true_shooting(pts: f64, fga: f64, fta: f64) -> f64 {
    let attempts = fga + FTA_WEIGHT * fta;
    if pts == 0.0 || attempts == 0.0 {
        return 0.0;
    }
    let ts = pts / (2.0 * attempts);
    if !ts.is_finite() {
        return 0.0;
    }
    ts.min(1.0)
}

/// Share of assists among assists plus turnovers; 0 when both are zero
pub fn assist_ratio(ast: f64, to: f64) -> f64 {
    let ratio = ast / (ast + to);
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Box score line feeding the efficiency rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub pts: f64,
    /// Total rebounds, when known
    pub rebounds: Option<f64>,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub fga: f64,
    pub fgm: f64,
    pub fta: f64,
    pub ftm: f64,
    pub to: f64,
}

impl BoxScore {
    pub fn efficiency(&self) -> f64 {
        self.pts + self.rebounds.unwrap_or(0.0) + self.ast + self.stl + self.blk
            - (self.fga - self.fgm)
            - (self.fta - self.ftm)
            - self.to
    }
}

/// Where rebounds come from in a given file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReboundSource {
    Total,
    Split,
    Unavailable,
}

impl ReboundSource {
    pub fn detect(table: &StatTable) -> Self {
        if table.has_column("REB") {
            ReboundSource::Total
        } else if table.has_column("DREB") && table.has_column("OREB") {
            ReboundSource::Split
        } else {
            ReboundSource::Unavailable
        }
    }
}

fn cell(table: &StatTable, row: usize, column: &str) -> Option<f64> {
    let idx = table.column_index(column)?;
    table.rows.get(row)?.get(idx).and_then(|c| parse_number(c))
}

fn required(table: &StatTable, row: usize, column: &str) -> Option<f64> {
    if table.has_column(column) {
        cell(table, row, column)
    } else {
        Some(0.0)
    }
}

/// Box score for one row; `None` when a present column has a missing value
fn box_score(table: &StatTable, row: usize, rebounds: ReboundSource) -> Option<BoxScore> {
    let rebounds = match rebounds {
        ReboundSource::Total => Some(cell(table, row, "REB")?),
        ReboundSource::Split => Some(cell(table, row, "DREB")? + cell(table, row, "OREB")?),
        ReboundSource::Unavailable => None,
    };

    Some(BoxScore {
        pts: required(table, row, "PTS")?,
        rebounds,
        ast: required(table, row, "AST")?,
        stl: required(table, row, "STL")?,
        blk: required(table, row, "BLK")?,
        fga: required(table, row, "FGA")?,
        fgm: required(table, row, "FGM")?,
        fta: required(table, row, "FTA")?,
        ftm: required(table, row, "FTM")?,
        to: required(table, row, "TO")?,
    })
}

/// Add or overwrite the `TS%`, `AST_RATIO` and `EFF` columns
///
/// A row missing one of a metric's inputs gets an empty cell for that metric,
/// except `AST_RATIO` which defaults to 0.
pub fn enrich(table: &mut StatTable) {
    let source = ReboundSource::detect(table);
    if source == ReboundSource::Unavailable {
        warn!("Rebound columns missing, EFF computed without rebounds");
    }

    let rows = table.rows.len();
    let mut ts = Vec::with_capacity(rows);
    let mut ast_ratio = Vec::with_capacity(rows);
    let mut eff = Vec::with_capacity(rows);

    for row in 0..rows {
        let ts_value = match (
            cell(table, row, "PTS"),
            cell(table, row, "FGA"),
            cell(table, row, "FTA"),
        ) {
            (Some(pts), Some(fga), Some(fta)) => true_shooting(pts, fga, fta),
            _ => 0.0,
        };
        ts.push(format_number(ts_value));

        let ratio = match (cell(table, row, "AST"), cell(table, row, "TO")) {
            (Some(ast), Some(to)) => assist_ratio(ast, to),
            _ => 0.0,
        };
        ast_ratio.push(format_number(ratio));

        eff.push(
            box_score(table, row, source)
                .map(|b| format_number(b.efficiency()))
                .unwrap_or_default(),
        );
    }

    table.set_column("TS%", ts);
    table.set_column("AST_RATIO", ast_ratio);
    table.set_column("EFF", eff);
}

/// A player ranked on one stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub player: String,
    pub value: f64,
}

/// Top `n` players by a numeric column, highest first
///
/// Rows without a value are skipped; a blank player name reads as `Unknown`.
pub fn top_by(table: &StatTable, column: &str, n: usize) -> Result<Vec<RankedPlayer>> {
    let values = table
        .numeric_column(column)
        .with_context(|| format!("Column {} not found", column))?;
    let players = table
        .column("Player")
        .context("Column Player not found")?;

    let mut ranked: Vec<RankedPlayer> = players
        .into_iter()
        .zip(values)
        .filter_map(|(player, value)| {
            let player = if player.trim().is_empty() {
                "Unknown".to_string()
            } else {
                player.to_string()
            };
            value.map(|value| RankedPlayer { player, value })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(n);

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> StatTable {
        StatTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_true_shooting() {
        // 20 / (2 * (15 + 4.4)) = 0.5155
        assert!((true_shooting(20.0, 15.0, 10.0) - 0.5155).abs() < 1e-3);
        assert_eq!(true_shooting(0.0, 10.0, 2.0), 0.0);
        assert_eq!(true_shooting(5.0, 0.0, 0.0), 0.0);
        // More points than attempts allow is capped
        assert_eq!(true_shooting(30.0, 2.0, 0.0), 1.0);
    }

    #[test]
    fn test_assist_ratio() {
        assert_eq!(assist_ratio(3.0, 1.0), 0.75);
        assert_eq!(assist_ratio(0.0, 0.0), 0.0);
        assert_eq!(assist_ratio(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_efficiency() {
        let line = BoxScore {
            pts: 20.0,
            rebounds: Some(8.0),
            ast: 5.0,
            stl: 2.0,
            blk: 1.0,
            fga: 15.0,
            fgm: 8.0,
            fta: 4.0,
            ftm: 3.0,
            to: 3.0,
        };
        // 36 - 7 - 1 - 3
        assert_eq!(line.efficiency(), 25.0);
        assert_eq!(
            BoxScore {
                rebounds: None,
                ..line
            }
            .efficiency(),
            17.0
        );
    }

    #[test]
    fn test_rebound_source() {
        assert_eq!(
            ReboundSource::detect(&table(&["REB", "DREB", "OREB"], &[])),
            ReboundSource::Total
        );
        assert_eq!(
            ReboundSource::detect(&table(&["DREB", "OREB"], &[])),
            ReboundSource::Split
        );
        assert_eq!(
            ReboundSource::detect(&table(&["DREB"], &[])),
            ReboundSource::Unavailable
        );
    }

    #[test]
    fn test_enrich() {
        let mut t = table(
            &[
                "Player", "PTS", "FGA", "FGM", "FTA", "FTM", "DREB", "OREB", "AST", "STL", "TO",
                "BLK",
            ],
            &[
                &["Justin Duff", "20", "15", "8", "10", "3", "6", "2", "3", "2", "1", "1"],
                &["Sam Lee", "0", "0", "0", "0", "0", "", "1", "0", "0", "0", "0"],
            ],
        );
        enrich(&mut t);

        assert_eq!(t.column("AST_RATIO").unwrap(), vec!["0.75", "0"]);
        assert_eq!(t.column("TS%").unwrap(), vec!["0.5155", "0"]);
        // 20 + 8 + 3 + 2 + 1 - 7 - 7 - 1
        assert_eq!(t.column("EFF").unwrap(), vec!["19", ""]);
    }

    #[test]
    fn test_top_by() {
        let t = table(
            &["Player", "EFF"],
            &[&["A", "10"], &["", "30"], &["C", ""], &["D", "20"]],
        );
        let top = top_by(&t, "EFF", 2).unwrap();
        assert_eq!(
            top,
            vec![
                RankedPlayer {
                    player: "Unknown".into(),
                    value: 30.0
                },
                RankedPlayer {
                    player: "D".into(),
                    value: 20.0
                },
            ]
        );
        assert!(top_by(&t, "PTS", 2).is_err());
    }
}
