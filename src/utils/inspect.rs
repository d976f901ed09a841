use crate::models::{StatTable, CANONICAL_HEADERS};

/// How a file's headers differ from the canonical list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReport {
    /// Canonical headers the file lacks, in canonical order
    pub missing: Vec<String>,
    /// File headers outside the canonical list, in file order
    pub extra: Vec<String>,
}

impl HeaderReport {
    pub fn is_canonical(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

pub fn check_headers(headers: &[String]) -> HeaderReport {
    let missing = CANONICAL_HEADERS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    let extra = headers
        .iter()
        .filter(|h| !CANONICAL_HEADERS.contains(&h.as_str()))
        .cloned()
        .collect();

    HeaderReport { missing, extra }
}

pub fn inspect_table(table: &StatTable) -> HeaderReport {
    check_headers(&table.headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_headers_pass() {
        let headers: Vec<String> = CANONICAL_HEADERS.iter().map(|h| h.to_string()).collect();
        assert!(check_headers(&headers).is_canonical());
    }

    #[test]
    fn test_missing_and_extra() {
        let mut headers: Vec<String> = CANONICAL_HEADERS
            .iter()
            .filter(|h| **h != "PPR" && **h != "GP")
            .map(|h| h.to_string())
            .collect();
        headers.push("Extra_0".to_string());
        headers.push("TS%".to_string());

        let report = check_headers(&headers);
        assert_eq!(report.missing, vec!["GP", "PPR"]);
        assert_eq!(report.extra, vec!["Extra_0", "TS%"]);
        assert!(!report.is_canonical());
    }
}
