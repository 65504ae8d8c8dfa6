//! Frontier and visited registry
//!
//! The frontier is a FIFO queue of URLs waiting for a visit. Every URL is
//! claimed in the registry before it is queued, so a URL is dispatched at
//! most once per crawl. Claims are bounded by the page budget.

use crate::url::ScopePolicy;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Outcome of trying to claim a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    /// Newly claimed; the caller should queue it
    Claimed,

    /// Claimed earlier in this crawl
    AlreadyClaimed,

    /// The page budget has been spent
    BudgetExhausted,

    /// Host is outside the seed's site while domain scoping is on
    OutOfScope,

    /// Not an absolute http(s) URL
    Invalid,
}

impl ClaimDecision {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

/// FIFO work queue plus the set of URLs claimed so far
#[derive(Debug)]
pub struct Frontier {
    /// URLs claimed and waiting for dispatch, oldest first
    pending: VecDeque<String>,

    /// Every URL claimed during this crawl
    claimed: HashSet<String>,

    /// Maximum number of successful claims
    max_pages: usize,

    scope: ScopePolicy,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Upper bound on the number of URLs ever claimed
    /// * `scope` - Which hosts are eligible for claiming
    pub fn new(max_pages: usize, scope: ScopePolicy) -> Self {
        Self {
            pending: VecDeque::new(),
            claimed: HashSet::new(),
            max_pages,
            scope,
        }
    }

    /// Tries to claim `url` for a visit
    ///
    /// URLs are compared by their exact string form. The budget is checked
    /// last, so a URL that was already claimed is reported as such even once
    /// the budget is spent.
    pub fn try_claim(&mut self, url: &str) -> ClaimDecision {
        let parsed = match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
            _ => return ClaimDecision::Invalid,
        };

        if !self.scope.allows(&parsed) {
            return ClaimDecision::OutOfScope;
        }

        if self.claimed.contains(url) {
            return ClaimDecision::AlreadyClaimed;
        }

        if self.is_budget_exhausted() {
            return ClaimDecision::BudgetExhausted;
        }

        self.claimed.insert(url.to_string());
        ClaimDecision::Claimed
    }

    /// Claims `url`, returning true only if it was newly claimed
    pub fn claim(&mut self, url: &str) -> bool {
        self.try_claim(url).is_claimed()
    }

    /// Appends an already-claimed URL to the pending queue
    pub fn push(&mut self, url: String) {
        debug_assert!(self.claimed.contains(&url), "push without claim: {}", url);
        self.pending.push_back(url);
    }

    /// Removes the oldest pending URL
    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Claims `url` and queues it if the claim succeeded
    pub fn offer(&mut self, url: &str) -> ClaimDecision {
        let decision = self.try_claim(url);
        if decision.is_claimed() {
            self.pending.push_back(url.to_string());
        }
        decision
    }

    /// Returns true once no further claims can succeed
    pub fn is_budget_exhausted(&self) -> bool {
        self.claimed.len() >= self.max_pages
    }

    pub fn is_claimed(&self, url: &str) -> bool {
        self.claimed.contains(url)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// Number of URLs waiting for dispatch
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
