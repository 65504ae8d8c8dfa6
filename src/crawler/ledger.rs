//! Cookie ledger
//!
//! Shared by every concurrent visit. Each observation is compared against the
//! cookies already recorded, and only the unseen ones are appended as a new
//! [`CookieEvent`]. The dedup check and the append happen under one lock.

use crate::browser::{Cookie, CookieKey};
use crate::config::DedupPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// When during a visit the cookies were observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookieStep {
    #[serde(rename = "initial load")]
    InitialLoad,

    #[serde(rename = "after interaction")]
    AfterInteraction,
}

impl CookieStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialLoad => "initial load",
            Self::AfterInteraction => "after interaction",
        }
    }
}

/// Newly observed cookies for one step of one visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieEvent {
    pub url: String,
    pub step: CookieStep,
    pub timestamp: DateTime<Utc>,

    /// Never empty
    pub cookies: Vec<Cookie>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SeenKey {
    Full(CookieKey),
    Name(String),
}

#[derive(Debug, Default)]
struct LedgerState {
    seen: HashSet<SeenKey>,
    events: Vec<CookieEvent>,
}

/// Append-only log of cookie events with deduplication
#[derive(Debug)]
pub struct CookieLedger {
    policy: DedupPolicy,
    state: Mutex<LedgerState>,
}

impl CookieLedger {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(LedgerState::default()),
        }
    }

    // A panicking visit cannot leave the state half-written, so a poisoned
    // lock is still usable.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the cookies in `observed` that have not been seen before
    ///
    /// Under [`DedupPolicy::Snapshot`] every non-empty observation is
    /// recorded in full.
    ///
    /// # Arguments
    ///
    /// * `observed` - Cookies currently reported by the session
    /// * `url` - The URL being visited
    /// * `step` - Which step of the visit made the observation
    ///
    /// # Returns
    ///
    /// * `Some(CookieEvent)` - The appended event
    /// * `None` - Nothing new was observed
    pub fn record_if_new(
        &self,
        observed: &[Cookie],
        url: &str,
        step: CookieStep,
    ) -> Option<CookieEvent> {
        let mut state = self.lock();

        let fresh: Vec<Cookie> = match self.policy {
            DedupPolicy::Snapshot => observed.to_vec(),
            DedupPolicy::NameDomainPath => observed
                .iter()
                .filter(|c| state.seen.insert(SeenKey::Full(c.key())))
                .cloned()
                .collect(),
            DedupPolicy::Name => observed
                .iter()
                .filter(|c| state.seen.insert(SeenKey::Name(c.name.clone())))
                .cloned()
                .collect(),
        };

        if fresh.is_empty() {
            return None;
        }

        let event = CookieEvent {
            url: url.to_string(),
            step,
            timestamp: Utc::now(),
            cookies: fresh,
        };
        state.events.push(event.clone());

        tracing::debug!(
            "Recorded {} new cookie(s) for {} ({})",
            event.cookies.len(),
            url,
            step.as_str()
        );

        Some(event)
    }

    /// Returns a copy of the events recorded so far, in append order
    pub fn events(&self) -> Vec<CookieEvent> {
        self.lock().events.clone()
    }

    pub fn into_events(self) -> Vec<CookieEvent> {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .events
    }

    /// Number of events recorded
    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct (name, domain, path) cookies across all events
    pub fn unique_cookies(&self) -> usize {
        let state = self.lock();
        state
            .events
            .iter()
            .flat_map(|e| e.cookies.iter().map(Cookie::key))
            .collect::<HashSet<_>>()
            .len()
    }
}
