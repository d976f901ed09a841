use std::path::PathBuf;
use std::time::Duration;

/// A source page that could not be loaded into a usable table
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("timed out after {timeout:?} waiting for a table at {url}")]
    Timeout { url: String, timeout: Duration },
    #[error("failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no table found at {url}")]
    NoTable { url: String },
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url, .. }
            | FetchError::Navigation { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::NoTable { url }
            | FetchError::InvalidUrl { url, .. } => url,
        }
    }
}

/// A normalized table that could not be persisted
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Why one source URL was skipped during a batch
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_carries_url() {
        let err = FetchError::Timeout {
            url: "https://pegcityball.info/summer-statistics/".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(err.url(), "https://pegcityball.info/summer-statistics/");
        assert!(err.to_string().contains("timed out after 10s"));

        let wrapped: SourceError = err.into();
        assert!(wrapped.to_string().contains("summer-statistics"));
    }
}
