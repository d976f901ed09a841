pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod utils;

pub use config::*;
pub use error::*;
pub use models::*;
pub use scrapers::*;
pub use utils::*;

use anyhow::Result;
use chrono::{DateTime, Utc};
pub use scrapers::session::PageSession;
pub use scrapers::table::TableExtractor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use utils::data::{output_file_name, save_table_to_csv};
use utils::normalize::normalize;

/// What happened to one source URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Saved { path: PathBuf, rows: usize },
    Skipped { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub url: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

/// Outcome of one scrape batch, in source order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SourceOutcome>,
}

impl BatchReport {
    pub fn saved(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SourceStatus::Saved { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, SourceStatus::Skipped { .. }))
    }
}

/// Fetch, extract, normalize and write a single source
pub async fn scrape_source<S: PageSession>(
    session: &mut S,
    extractor: &TableExtractor,
    url: &str,
    output_dir: &Path,
) -> Result<(PathBuf, usize), SourceError> {
    let page = session.load(url).await?;

    let rows = extractor.extract_page(&page);
    debug!("Extracted {} raw rows from {}", rows.len(), url);

    let table = normalize(rows);
    let path = output_dir.join(output_file_name(url));
    save_table_to_csv(&table, &path)?;

    Ok((path, table.row_count()))
}

/// Scrape every source in order with one session
///
/// A failing source is logged and skipped. The session is closed once all
/// sources have been tried, whatever their outcome.
pub async fn run_batch<S: PageSession>(
    mut session: S,
    sources: &[String],
    output_dir: &Path,
) -> Result<BatchReport> {
    let extractor = match TableExtractor::new() {
        Ok(extractor) => extractor,
        Err(e) => {
            session.close().await;
            return Err(e);
        }
    };

    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(sources.len());

    for url in sources {
        let status = match scrape_source(&mut session, &extractor, url, output_dir).await {
            Ok((path, rows)) => {
                info!("Saved: {} ({} rows)", path.display(), rows);
                SourceStatus::Saved { path, rows }
            }
            Err(e) => {
                warn!("Skipping {} - Error: {}", url, e);
                SourceStatus::Skipped {
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(SourceOutcome {
            url: url.clone(),
            status,
        });
    }

    session.close().await;

    Ok(BatchReport {
        started_at,
        finished_at: Utc::now(),
        outcomes,
    })
}
