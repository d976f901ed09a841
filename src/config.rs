use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// League pages scraped when no sources are configured
pub const DEFAULT_SOURCES: [&str; 8] = [
    "https://pegcityball.info/2024-25-regular-season-statistics/",
    "https://pegcityball.info/2023-24-regular-season-statistics/",
    "https://pegcityball.info/summer-statistics/",
    "https://pegcityball.info/2024-spring-statistics/",
    "https://pegcityball.info",
    "https://pegcityball.info/standings-2024-summer-league/",
    "https://pegcityball.info/2024-spring-standings/",
    "https://pegcityball.info/2023-summer-standings/",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub page_timeout_secs: u64,
}

impl ScrapingConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            page_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub sources: Vec<String>,
    pub output_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub scraping: ScrapingConfig,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(urls) = env::var("PEGCITY_URLS") {
            let sources = parse_source_list(&urls);
            if !sources.is_empty() {
                config.sources = sources;
            }
        }
        if let Ok(dir) = env::var("PEGCITY_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PEGCITY_PROCESSED_DIR") {
            config.processed_dir = PathBuf::from(dir);
        }
        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Some(timeout) = env::var("SCRAPER_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
        {
            config.scraping.page_timeout_secs = timeout;
        }

        config
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from("."),
            processed_dir: PathBuf::from("data/processed"),
            scraping: ScrapingConfig::default(),
        }
    }
}

/// Split a comma separated URL list, ignoring blanks
pub fn parse_source_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.sources.len(), 8);
        assert_eq!(config.scraping.page_timeout(), Duration::from_secs(10));
        assert_eq!(config.processed_dir, PathBuf::from("data/processed"));
    }

    #[test]
    fn test_parse_source_list() {
        let sources = parse_source_list(" https://a.test/x/ ,, https://b.test/y/,");
        assert_eq!(sources, vec!["https://a.test/x/", "https://b.test/y/"]);
        assert!(parse_source_list(" , ").is_empty());
    }
}
