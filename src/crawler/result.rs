//! Crawl result document and run report

use super::ledger::CookieEvent;
use crate::output::CrawlStatistics;
use crate::state::{CrawlPhase, VisitStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted outcome of a crawl
///
/// Serializes to `{ "startedAt", "visited", "cookieLog" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub started_at: DateTime<Utc>,

    /// URLs in the order their visits were dispatched
    pub visited: Vec<String>,

    /// Cookie events in the order they were recorded
    pub cookie_log: Vec<CookieEvent>,
}

/// Everything known about a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub result: CrawlResult,
    pub finished_at: DateTime<Utc>,
    pub statistics: CrawlStatistics,

    /// Final status of every claimed URL
    pub visit_statuses: BTreeMap<String, VisitStatus>,

    /// Lifecycle phases in the order they were entered
    pub phases: Vec<CrawlPhase>,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.result.started_at
    }

    /// URLs that ended in the given status, sorted
    pub fn urls_with_status(&self, status: VisitStatus) -> Vec<&str> {
        self.visit_statuses
            .iter()
            .filter(|(_, s)| **s == status)
            .map(|(url, _)| url.as_str())
            .collect()
    }
}
