use crate::models::RawRow;
use crate::scrapers::session::LoadedPage;
use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};

/// Pulls the first stats table out of a page as rows of cell text
pub struct TableExtractor {
    table: Selector,
    row: Selector,
    cell: Selector,
}

impl TableExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: Selector::parse("table")
                .ok()
                .context("Invalid table selector")?,
            row: Selector::parse("tr").ok().context("Invalid row selector")?,
            cell: Selector::parse("td").ok().context("Invalid cell selector")?,
        })
    }

    pub fn extract_page(&self, page: &LoadedPage) -> Vec<RawRow> {
        self.extract(&page.html)
    }

    /// Rows of the first `<table>` in document order
    ///
    /// Only `td` cells are read, so `th` header rows come back empty and are
    /// dropped along with spacer rows.
    pub fn extract(&self, html: &str) -> Vec<RawRow> {
        let document = Html::parse_document(html);
        let Some(table) = document.select(&self.table).next() else {
            return Vec::new();
        };

        table
            .select(&self.row)
            .map(|row| self.row_cells(row))
            .filter(|cells| !cells.is_empty())
            .collect()
    }

    fn row_cells(&self, row: ElementRef<'_>) -> RawRow {
        row.select(&self.cell)
            .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
            .collect()
    }
}

/// Trim and squash internal whitespace runs to single spaces
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS_PAGE: &str = r#"
        <html><body>
          <table class="stats">
            <thead><tr><th>Player</th><th>GP</th><th>PTS</th></tr></thead>
            <tbody>
              <tr><td> Justin
                  Duff </td><td>12</td><td>21.4</td></tr>
              <tr></tr>
              <tr><td>Sam Lee</td><td>11</td></tr>
            </tbody>
          </table>
          <table><tr><td>ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_extract_rows() {
        let extractor = TableExtractor::new().unwrap();
        let rows = extractor.extract(STATS_PAGE);

        assert_eq!(
            rows,
            vec![
                vec!["Justin Duff".to_string(), "12".to_string(), "21.4".to_string()],
                vec!["Sam Lee".to_string(), "11".to_string()],
            ]
        );
    }

    #[test]
    fn test_no_table() {
        let extractor = TableExtractor::new().unwrap();
        assert!(extractor.extract("<p>nothing here</p>").is_empty());
    }

    #[test]
    fn test_empty_cells_are_kept() {
        let extractor = TableExtractor::new().unwrap();
        let rows = extractor.extract("<table><tr><td>A</td><td> </td><td>C</td></tr></table>");
        assert_eq!(rows, vec![vec!["A".to_string(), "".to_string(), "C".to_string()]]);
    }
}
