use pegcity_stats::data::load_stat_table;
use pegcity_stats::{
    run_batch, FetchError, LoadedPage, PageSession, SourceStatus, CANONICAL_HEADERS,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

const REGULAR_SEASON_URL: &str = "https://pegcityball.info/2024-25-regular-season-statistics/";
const SUMMER_URL: &str = "https://pegcityball.info/summer-statistics/";
const STANDINGS_URL: &str = "https://pegcityball.info/2024-summer-standings/";

const REGULAR_SEASON_HTML: &str = r#"
<html><body>
  <table>
    <tr><td>Justin Duff</td><td>12</td><td>4</td><td>88</td><td>170</td><td>51.8</td></tr>
    <tr><td>Sam Lee</td><td>11</td><td>2</td><td>60</td><td>140</td><td>42.9</td></tr>
  </table>
</body></html>
"#;

const STANDINGS_HTML: &str = r#"
<html><body>
  <table>
    <tr><td>Player</td><td>Team</td><td>PTS</td></tr>
    <tr><td>Justin Duff</td><td>Hawks</td><td>21</td></tr>
  </table>
</body></html>
"#;

/// Serves canned pages; any URL without a page times out
struct FakeSession {
    pages: HashMap<&'static str, &'static str>,
    requested: Vec<String>,
    closed: Rc<Cell<bool>>,
}

impl FakeSession {
    fn new(closed: Rc<Cell<bool>>) -> Self {
        let mut pages = HashMap::new();
        pages.insert(REGULAR_SEASON_URL, REGULAR_SEASON_HTML);
        pages.insert(STANDINGS_URL, STANDINGS_HTML);
        Self {
            pages,
            requested: Vec::new(),
            closed,
        }
    }
}

impl PageSession for FakeSession {
    async fn load(&mut self, url: &str) -> Result<LoadedPage, FetchError> {
        self.requested.push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(LoadedPage {
                url: url.to_string(),
                html: html.to_string(),
            }),
            None => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout: Duration::from_secs(10),
            }),
        }
    }

    async fn close(self) {
        assert_eq!(self.requested.len(), 3);
        self.closed.set(true);
    }
}

fn sources() -> Vec<String> {
    vec![
        REGULAR_SEASON_URL.to_string(),
        SUMMER_URL.to_string(),
        STANDINGS_URL.to_string(),
    ]
}

#[tokio::test]
async fn test_timeout_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let closed = Rc::new(Cell::new(false));

    let report = run_batch(FakeSession::new(closed.clone()), &sources(), dir.path())
        .await
        .unwrap();

    assert!(closed.get(), "session must be closed after the batch");
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.saved().count(), 2);
    assert_eq!(report.skipped().count(), 1);

    match &report.outcomes[1].status {
        SourceStatus::Skipped { error } => assert!(error.contains("timed out")),
        other => panic!("expected summer page to be skipped, got {:?}", other),
    }
    match &report.outcomes[2].status {
        SourceStatus::Saved { path, rows } => {
            assert!(path.ends_with("2024_summer_standings_stats.csv"));
            assert_eq!(*rows, 1);
        }
        other => panic!("expected standings page to be saved, got {:?}", other),
    }
    assert!(!dir.path().join("summer_statistics_stats.csv").exists());
}

#[tokio::test]
async fn test_written_files_have_canonical_schema() {
    let dir = tempfile::tempdir().unwrap();
    let closed = Rc::new(Cell::new(false));

    run_batch(FakeSession::new(closed), &sources(), dir.path())
        .await
        .unwrap();

    let season = load_stat_table(
        &dir.path()
            .join("2024_25_regular_season_statistics_stats.csv"),
    )
    .unwrap();
    assert_eq!(season.headers, CANONICAL_HEADERS.to_vec());
    assert_eq!(season.rows.len(), 2);
    assert_eq!(season.column("Player").unwrap(), vec!["Justin Duff", "Sam Lee"]);
    assert_eq!(season.column("FG%").unwrap(), vec!["51.8", "42.9"]);
    assert_eq!(season.column("PPR").unwrap(), vec!["", ""]);

    // Header row consumed, non-canonical Team column dropped
    let standings =
        load_stat_table(&dir.path().join("2024_summer_standings_stats.csv")).unwrap();
    assert_eq!(standings.headers, CANONICAL_HEADERS.to_vec());
    assert_eq!(standings.rows.len(), 1);
    assert_eq!(standings.column("PTS").unwrap(), vec!["21"]);
    assert!(!standings.rows[0].iter().any(|c| c == "Hawks" || c == "Player"));
}

#[tokio::test]
async fn test_empty_source_list_still_closes_session() {
    struct CountingSession(Rc<Cell<bool>>);

    impl PageSession for CountingSession {
        async fn load(&mut self, url: &str) -> Result<LoadedPage, FetchError> {
            Err(FetchError::NoTable {
                url: url.to_string(),
            })
        }

        async fn close(self) {
            self.0.set(true);
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let closed = Rc::new(Cell::new(false));
    let report = run_batch(CountingSession(closed.clone()), &[], dir.path())
        .await
        .unwrap();

    assert!(report.outcomes.is_empty());
    assert!(closed.get());
}
