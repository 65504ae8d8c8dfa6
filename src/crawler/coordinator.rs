//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator is the single owner of the frontier and the visited
//! registry, so claiming and the budget check never race. It:
//! - Seeds the frontier with the start URL
//! - Dispatches visits in FIFO order, at most `max_concurrency` at a time
//! - Feeds links discovered by finished visits back through claim-then-push
//! - Drains in-flight visits once nothing more can be dispatched
//! - Assembles the crawl result

use super::frontier::{ClaimDecision, Frontier};
use super::ledger::CookieLedger;
use super::result::{CrawlReport, CrawlResult};
use super::visitor::{PageVisitor, VisitOutcome, VisitSettings};
use crate::browser::BrowserEngine;
use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::state::{CrawlPhase, VisitStatus};
use crate::url::{parse_absolute, ScopePolicy};
use crate::{Result, RippleError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

/// Progress is logged every this many finished visits
const PROGRESS_INTERVAL: u64 = 10;

type VisitSet = JoinSet<(String, VisitOutcome)>;

/// Main crawler coordinator structure
pub struct Coordinator<E: BrowserEngine> {
    frontier: Frontier,
    visitor: PageVisitor<E>,
    ledger: Arc<CookieLedger>,
    max_concurrency: usize,
    phase: CrawlPhase,
    phases: Vec<CrawlPhase>,
    seed: String,

    /// Dispatch order
    visited: Vec<String>,
    statuses: BTreeMap<String, VisitStatus>,
    stats: CrawlStatistics,
    budget_logged: bool,
}

impl<E: BrowserEngine> Coordinator<E> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    /// * `engine` - The browsing engine shared by all visits
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(RippleError)` - The start URL is not an absolute http(s) URL
    pub fn new(config: &Config, engine: Arc<E>) -> Result<Self> {
        let seed = parse_absolute(&config.start_url)?;
        let scope = ScopePolicy::for_seed(&seed, config.crawl.domain_scoping)?;
        let ledger = Arc::new(CookieLedger::new(config.crawl.cookie_dedup));

        let visitor = PageVisitor::new(
            engine,
            Arc::clone(&ledger),
            scope.clone(),
            VisitSettings::from(&config.crawl),
        );

        Ok(Self {
            frontier: Frontier::new(config.crawl.max_pages as usize, scope),
            visitor,
            ledger,
            max_concurrency: config.crawl.max_concurrency.max(1) as usize,
            phase: CrawlPhase::Seeding,
            phases: vec![CrawlPhase::Seeding],
            seed: seed.to_string(),
            visited: Vec::new(),
            statuses: BTreeMap::new(),
            stats: CrawlStatistics::default(),
            budget_logged: false,
        })
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        self.phases.push(next);
        Ok(())
    }

    /// Runs the crawl to completion
    ///
    /// Visit failures are logged and counted, never returned. The loop ends
    /// when the frontier is empty and no visit is in flight.
    pub async fn run(mut self) -> Result<CrawlReport> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!("Starting crawl from {}", self.seed);

        let seed = self.seed.clone();
        match self.frontier.offer(&seed) {
            ClaimDecision::Claimed => {
                self.statuses.insert(seed, VisitStatus::Pending);
            }
            decision => tracing::warn!("Seed {} was not claimed: {:?}", seed, decision),
        }

        self.transition(CrawlPhase::Running)?;

        let mut in_flight = VisitSet::new();

        loop {
            self.fill(&mut in_flight);

            if self.phase == CrawlPhase::Running
                && self.frontier.is_empty()
                && self.frontier.is_budget_exhausted()
                && !in_flight.is_empty()
            {
                self.transition(CrawlPhase::Draining)?;
                tracing::info!(
                    "Page budget reached, waiting for {} in-flight visit(s)",
                    in_flight.len()
                );
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            self.handle_joined(joined);

            if self.stats.completed() % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed();
                let rate = self.stats.completed() as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} visits finished, {} in flight, {} in frontier, {:.2} pages/sec",
                    self.stats.completed(),
                    in_flight.len(),
                    self.frontier.len(),
                    rate
                );
            }
        }

        if self.phase == CrawlPhase::Running {
            // Frontier exhausted with nothing left in flight
            self.transition(CrawlPhase::Draining)?;
            tracing::info!("Frontier exhausted, no visits in flight");
        }
        self.transition(CrawlPhase::Done)?;

        // A panicked visit task never reported its URL back
        for status in self.statuses.values_mut() {
            if !status.is_terminal() {
                *status = VisitStatus::Failed;
            }
        }

        Ok(self.finish(started_at, start_time))
    }

    /// Dispatches pending URLs until the concurrency cap is reached
    fn fill(&mut self, in_flight: &mut VisitSet) {
        while in_flight.len() < self.max_concurrency {
            let Some(url) = self.frontier.pop() else {
                break;
            };
            self.dispatch(in_flight, url);
        }
    }

    fn dispatch(&mut self, in_flight: &mut VisitSet, url: String) {
        self.visited.push(url.clone());
        self.statuses.insert(url.clone(), VisitStatus::InFlight);

        let visitor = self.visitor.clone();
        let span = tracing::info_span!("visit", url = %url);
        in_flight.spawn(
            async move {
                let outcome = visitor.visit(&url).await;
                (url, outcome)
            }
            .instrument(span),
        );

        let in_flight_now = in_flight.len() as u64;
        self.stats.peak_in_flight = self.stats.peak_in_flight.max(in_flight_now);
        tracing::trace!(
            "Dispatched visit {} ({} in flight)",
            self.visited.len(),
            in_flight_now
        );
    }

    fn handle_joined(&mut self, joined: std::result::Result<(String, VisitOutcome), JoinError>) {
        let (url, outcome) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!("Visit task failed: {}", e);
                self.stats.failed += 1;
                return;
            }
        };

        match outcome {
            VisitOutcome::Completed {
                final_url,
                discovered,
                events,
            } => {
                tracing::info!(
                    "Visited {} ({} cookie event(s), {} link(s))",
                    final_url,
                    events,
                    discovered.len()
                );
                self.stats.succeeded += 1;
                self.stats.links_discovered += discovered.len() as u64;
                self.statuses.insert(url, VisitStatus::Succeeded);
                self.enqueue_discovered(discovered);
            }
            VisitOutcome::OutOfScope { final_url } => {
                tracing::info!("{} left the site (ended at {})", url, final_url);
                self.stats.out_of_scope += 1;
                self.statuses.insert(url, VisitStatus::OutOfScope);
            }
            VisitOutcome::Failed { reason } => {
                tracing::warn!("Visit to {} failed: {}", url, reason);
                self.stats.failed += 1;
                self.statuses.insert(url, VisitStatus::Failed);
            }
        }
    }

    /// Claims and queues discovered links, in discovery order
    fn enqueue_discovered(&mut self, discovered: Vec<String>) {
        for link in discovered {
            match self.frontier.offer(&link) {
                ClaimDecision::Claimed => {
                    tracing::trace!("Queued {}", link);
                    self.statuses.insert(link, VisitStatus::Pending);
                }
                ClaimDecision::BudgetExhausted => {
                    if !self.budget_logged {
                        tracing::info!(
                            "Page budget of {} reached, no further URLs will be claimed",
                            self.frontier.claimed_count()
                        );
                        self.budget_logged = true;
                    }
                }
                ClaimDecision::OutOfScope => tracing::debug!("Out of scope: {}", link),
                ClaimDecision::AlreadyClaimed | ClaimDecision::Invalid => {}
            }
        }
    }

    fn finish(self, started_at: DateTime<Utc>, start_time: Instant) -> CrawlReport {
        let mut stats = self.stats;
        stats.visited = self.visited.len() as u64;
        stats.cookie_events = self.ledger.len() as u64;
        stats.unique_cookies = self.ledger.unique_cookies() as u64;

        tracing::info!(
            "Crawl completed: {} pages visited, {} cookie event(s) in {:?}",
            stats.visited,
            stats.cookie_events,
            start_time.elapsed()
        );

        CrawlReport {
            result: CrawlResult {
                started_at,
                visited: self.visited,
                cookie_log: self.ledger.events(),
            },
            finished_at: Utc::now(),
            statistics: stats,
            visit_statuses: self.statuses,
            phases: self.phases,
        }
    }
}
