//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl,
//! including statistics, cookies grouped by domain, and the cookie log.

use crate::crawler::CrawlReport;
use crate::output::json::ensure_parent_dir;
use crate::output::traits::{OutputHandler, OutputResult};
use crate::state::VisitStatus;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Writes a markdown summary of a finished crawl
#[derive(Debug, Clone)]
pub struct MarkdownSummaryHandler {
    path: PathBuf,
    config_hash: Option<String>,
}

impl MarkdownSummaryHandler {
    /// # Arguments
    ///
    /// * `path` - Where the markdown file is written
    /// * `config_hash` - SHA-256 of the config file, if one was used
    pub fn new(path: impl Into<PathBuf>, config_hash: Option<String>) -> Self {
        Self {
            path: path.into(),
            config_hash,
        }
    }
}

impl OutputHandler for MarkdownSummaryHandler {
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        ensure_parent_dir(&self.path)?;

        let markdown = format_markdown_summary(report, self.config_hash.as_deref());

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        tracing::info!("Wrote summary to {}", self.path.display());
        Ok(())
    }
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `config_hash` - SHA-256 of the config file, if one was used
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(report: &CrawlReport, config_hash: Option<&str>) -> String {
    let stats = &report.statistics;
    let mut md = String::new();

    md.push_str("# Cookie-Ripple Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.result.started_at));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at));
    let duration = report.duration();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration.num_seconds(),
        duration.num_seconds() as f64 / 60.0
    ));
    match config_hash {
        Some(hash) => md.push_str(&format!("- **Config Hash**: {}\n\n", hash)),
        None => md.push_str("- **Config Hash**: (no config file)\n\n"),
    }

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.visited));
    md.push_str(&format!("- **Links Discovered**: {}\n", stats.links_discovered));
    md.push_str(&format!("- **Cookie Events**: {}\n", stats.cookie_events));
    md.push_str(&format!("- **Unique Cookies**: {}\n", stats.unique_cookies));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    md.push_str("## Visit Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Succeeded | {} |\n", stats.succeeded));
    md.push_str(&format!("| Failed | {} |\n", stats.failed));
    md.push_str(&format!("| Out of Scope | {} |\n\n", stats.out_of_scope));

    // Cookies by domain
    let mut by_domain: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for event in &report.result.cookie_log {
        for cookie in &event.cookies {
            by_domain
                .entry(cookie.key().domain)
                .or_default()
                .insert(cookie.name.as_str());
        }
    }

    if !by_domain.is_empty() {
        md.push_str("## Cookies by Domain\n\n");
        md.push_str("| Domain | Cookies |\n");
        md.push_str("|--------|---------|\n");
        for (domain, names) in &by_domain {
            let names: Vec<&str> = names.iter().copied().collect();
            md.push_str(&format!("| {} | {} |\n", domain, names.join(", ")));
        }
        md.push('\n');
    }

    // Cookie log
    if !report.result.cookie_log.is_empty() {
        md.push_str("## Cookie Log\n\n");
        md.push_str("| URL | Step | New Cookies |\n");
        md.push_str("|-----|------|-------------|\n");
        for event in &report.result.cookie_log {
            let names: Vec<&str> = event.cookies.iter().map(|c| c.name.as_str()).collect();
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                event.url,
                event.step.as_str(),
                names.join(", ")
            ));
        }
        md.push('\n');
    }

    for (title, status) in [
        ("Failed Visits", VisitStatus::Failed),
        ("Out-of-Scope Redirects", VisitStatus::OutOfScope),
    ] {
        let urls = report.urls_with_status(status);
        if urls.is_empty() {
            continue;
        }
        md.push_str(&format!("## {}\n\n", title));
        for url in urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md
}
