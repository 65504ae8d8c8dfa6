//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers, which persist
//! a finished crawl.

use crate::crawler::CrawlReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// Handlers are invoked once, after the crawl has finished. A failing handler
/// is fatal for the run.
pub trait OutputHandler {
    /// Persists the report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl
    fn write_report(&self, report: &CrawlReport) -> OutputResult<()>;
}
