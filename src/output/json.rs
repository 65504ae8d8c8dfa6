//! JSON result document

use crate::crawler::CrawlReport;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the crawl result as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Creates the parent directory of `path` if it does not exist
pub(crate) fn ensure_parent_dir(path: &Path) -> OutputResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| OutputError::Write {
                path: parent.display().to_string(),
                message: format!("cannot create directory: {}", e),
            })
        }
        _ => Ok(()),
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        ensure_parent_dir(&self.path)?;

        let json = serde_json::to_string_pretty(&report.result)?;
        fs::write(&self.path, json).map_err(|e| OutputError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(
            "Wrote {} visited URL(s) and {} cookie event(s) to {}",
            report.result.visited.len(),
            report.result.cookie_log.len(),
            self.path.display()
        );
        Ok(())
    }
}
