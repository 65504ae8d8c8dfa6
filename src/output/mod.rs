//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the JSON result document
//! - Generating markdown summaries of crawl results
//! - Recording and printing crawl statistics

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::JsonOutputHandler;
pub use markdown::{format_markdown_summary, MarkdownSummaryHandler};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
