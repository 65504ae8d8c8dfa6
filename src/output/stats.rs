//! Crawl statistics
//!
//! Counters collected by the coordinator while a crawl runs, and a formatter
//! that prints them at the end of a run.

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of URLs dispatched for a visit
    pub visited: u64,

    /// Visits that loaded and were fully processed
    pub succeeded: u64,

    /// Visits abandoned on a navigation, timeout or session error
    pub failed: u64,

    /// Visits whose redirect left the seed's site
    pub out_of_scope: u64,

    /// Number of cookie events recorded
    pub cookie_events: u64,

    /// Distinct (name, domain, path) cookies across all events
    pub unique_cookies: u64,

    /// Total links harvested, before dedup and scoping
    pub links_discovered: u64,

    /// Highest number of visits in flight at once
    pub peak_in_flight: u64,
}

impl CrawlStatistics {
    /// Number of visits that have finished, in any way
    pub fn completed(&self) -> u64 {
        self.succeeded + self.failed + self.out_of_scope
    }

    /// Returns the success rate as a percentage of finished visits
    pub fn success_rate(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / completed as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.visited);
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Peak concurrent visits: {}", stats.peak_in_flight);
    println!();

    println!("Visits by Outcome:");
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed);
    println!("  Out of scope: {}", stats.out_of_scope);
    println!();

    println!("Cookies:");
    println!("  Cookie events: {}", stats.cookie_events);
    println!("  Unique cookies: {}", stats.unique_cookies);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} visits completed)",
        stats.success_rate(),
        stats.succeeded,
        stats.completed()
    );
}
