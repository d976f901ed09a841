use crate::config::ScrapingConfig;
use crate::error::FetchError;
use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// A source page known to contain at least one `<table>`
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub url: String,
    pub html: String,
}

/// One fetch session shared by every URL of a batch
///
/// Implementations only hand back pages that contain a table; anything else is
/// a `FetchError` for that URL.
pub trait PageSession {
    fn load(&mut self, url: &str) -> impl Future<Output = Result<LoadedPage, FetchError>>;

    /// Release the session. Called once after the last URL, whatever happened.
    fn close(self) -> impl Future<Output = ()>;
}

/// Session backed by a single HTTP client
pub struct HttpSession {
    client: reqwest::Client,
    table: Selector,
    page_timeout: Duration,
    pages_loaded: usize,
}

impl HttpSession {
    pub fn open(config: &ScrapingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            table: Selector::parse("table")
                .ok()
                .context("Invalid table selector")?,
            page_timeout: config.page_timeout(),
            pages_loaded: 0,
        })
    }

    /// Whether the document contains a `<table>` element
    fn has_table(&self, html: &str) -> bool {
        Html::parse_document(html)
            .select(&self.table)
            .next()
            .is_some()
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Navigation {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(|source| FetchError::Navigation {
            url: url.to_string(),
            source,
        })
    }
}

impl PageSession for HttpSession {
    async fn load(&mut self, url: &str) -> Result<LoadedPage, FetchError> {
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let html = tokio::time::timeout(self.page_timeout, self.fetch_html(url))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
                timeout: self.page_timeout,
            })??;

        if !self.has_table(&html) {
            return Err(FetchError::NoTable {
                url: url.to_string(),
            });
        }

        self.pages_loaded += 1;
        debug!("Loaded {} ({} bytes)", url, html.len());

        Ok(LoadedPage {
            url: url.to_string(),
            html,
        })
    }

    async fn close(self) {
        info!("Closing fetch session after {} page(s)", self.pages_loaded);
    }
}
