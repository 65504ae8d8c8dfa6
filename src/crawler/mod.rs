//! Crawler module: the crawl orchestration core
//!
//! This module contains the core crawling logic, including:
//! - The frontier and visited registry (claim-before-enqueue, page budget)
//! - The cookie ledger with configurable deduplication
//! - The per-URL visit protocol
//! - Bounded-concurrency coordination of visits

mod coordinator;
mod frontier;
mod ledger;
mod result;
mod visitor;

pub use coordinator::Coordinator;
pub use frontier::{ClaimDecision, Frontier};
pub use ledger::{CookieEvent, CookieLedger, CookieStep};
pub use result::{CrawlReport, CrawlResult};
pub use visitor::{PageVisitor, VisitOutcome, VisitSettings, INTERACTIVE_SELECTOR};

use crate::browser::BrowserEngine;
use crate::config::{self, Config};
use crate::Result;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Claim and queue the seed URL
/// 3. Visit pages concurrently, feeding discovered links back
/// 4. Return the result once nothing is pending or in flight
///
/// The engine is not shut down; the caller owns its lifecycle.
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `engine` - A launched browsing engine
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (individual visits may have failed)
/// * `Err(RippleError)` - Invalid configuration
pub async fn crawl<E: BrowserEngine>(config: &Config, engine: Arc<E>) -> Result<CrawlReport> {
    config::validate(config)?;
    Coordinator::new(config, engine)?.run().await
}
