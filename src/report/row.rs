// src/report/row.rs
// =============================================================================
// Rows of the final report and the report itself.
//
// Every row has the same three columns:
//   Query Domain | Domain | IP Address
//
// Kinds of row (see RowKind):
// - Root:       Domain == Query Domain, the seed's own address
// - Discovered: a third-party domain found on the seed page
// - Timeout:    Domain == "[Timeout]", the page didn't load in time
// - Error:      Domain == "[Error]", the page failed to load for another reason
// =============================================================================

use serde::Serialize;

/// Column headers, in output order.
pub const COLUMNS: [&str; 3] = ["Query Domain", "Domain", "IP Address"];

pub const TIMEOUT_DOMAIN: &str = "[Timeout]";
pub const TIMEOUT_DETAIL: &str = "Timed out";
pub const ERROR_DOMAIN: &str = "[Error]";

// Marks an IP cell holding a failed DNS lookup
pub(super) const DNS_ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Root,
    Discovered,
    Timeout,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    #[serde(rename = "Query Domain")]
    pub query_domain: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "IP Address")]
    pub ip_address: String,
}

impl Row {
    pub fn root(query_domain: &str, ip_address: String) -> Self {
        Self {
            query_domain: query_domain.to_string(),
            domain: query_domain.to_string(),
            ip_address,
        }
    }

    pub fn discovered(query_domain: &str, domain: &str, ip_address: String) -> Self {
        Self {
            query_domain: query_domain.to_string(),
            domain: domain.to_string(),
            ip_address,
        }
    }

    pub fn timeout(query_domain: &str) -> Self {
        Self {
            query_domain: query_domain.to_string(),
            domain: TIMEOUT_DOMAIN.to_string(),
            ip_address: TIMEOUT_DETAIL.to_string(),
        }
    }

    pub fn error(query_domain: &str, detail: String) -> Self {
        Self {
            query_domain: query_domain.to_string(),
            domain: ERROR_DOMAIN.to_string(),
            ip_address: detail,
        }
    }

    pub fn kind(&self) -> RowKind {
        match self.domain.as_str() {
            TIMEOUT_DOMAIN => RowKind::Timeout,
            ERROR_DOMAIN => RowKind::Error,
            d if d == self.query_domain => RowKind::Root,
            _ => RowKind::Discovered,
        }
    }

    /// True when the IP cell holds a DNS failure rather than an address.
    pub fn is_dns_failure(&self) -> bool {
        matches!(self.kind(), RowKind::Root | RowKind::Discovered)
            && self.ip_address.starts_with(DNS_ERROR_PREFIX)
    }

    /// Cell values in `COLUMNS` order.
    pub fn cells(&self) -> [&str; 3] {
        [
            self.query_domain.as_str(),
            self.domain.as_str(),
            self.ip_address.as_str(),
        ]
    }
}

// All rows of a run, seed by seed, in the order they were produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    rows: Vec<Row>,
}

/// Counts shown at the end of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub seeds: usize,
    pub discovered: usize,
    pub timeouts: usize,
    pub errors: usize,
    pub dns_failures: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();

        for row in &self.rows {
            match row.kind() {
                RowKind::Root => summary.seeds += 1,
                RowKind::Discovered => summary.discovered += 1,
                RowKind::Timeout => summary.timeouts += 1,
                RowKind::Error => summary.errors += 1,
            }
            if row.is_dns_failure() {
                summary.dns_failures += 1;
            }
        }

        summary
    }
}

impl Extend<Row> for Report {
    fn extend<I: IntoIterator<Item = Row>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl FromIterator<Row> for Report {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
