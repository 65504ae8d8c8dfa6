//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Lifecycle of a whole crawl (seeding, running, draining, done)
//! - `VisitStatus`: Tracks the state of an individual claimed URL

mod crawl_phase;
mod visit_status;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use visit_status::VisitStatus;
