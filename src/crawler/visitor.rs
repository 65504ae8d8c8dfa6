//! Page visitor - the per-URL visit protocol
//!
//! One visit opens an isolated session, navigates, records cookies, optionally
//! clicks interactive elements, harvests links and always closes the session.
//! Discovered links are returned to the coordinator, never queued here.

use super::ledger::{CookieLedger, CookieStep};
use crate::browser::{BrowserEngine, BrowserSession, EngineError, EngineResult, InteractiveElement};
use crate::config::CrawlConfig;
use crate::url::{resolve_links, ScopePolicy};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Elements that look clickable without being links
pub const INTERACTIVE_SELECTOR: &str = r#"[role="button"], [tabindex]"#;

/// Per-visit timing and behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitSettings {
    pub navigation_timeout: Duration,
    pub interaction_delay: Duration,
    pub interact: bool,
}

impl From<&CrawlConfig> for VisitSettings {
    fn from(config: &CrawlConfig) -> Self {
        Self {
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            interaction_delay: Duration::from_millis(config.wait_after_interaction_ms),
            interact: config.interact,
        }
    }
}

/// Result of visiting one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Page loaded; cookies recorded and links harvested
    Completed {
        final_url: String,
        discovered: Vec<String>,
        events: usize,
    },

    /// A redirect left the seed's site
    OutOfScope { final_url: String },

    /// Session, navigation or page query failed
    Failed { reason: String },
}

/// Runs the visit protocol against a browsing engine
pub struct PageVisitor<E: BrowserEngine> {
    engine: Arc<E>,
    ledger: Arc<CookieLedger>,
    scope: ScopePolicy,
    settings: VisitSettings,
}

impl<E: BrowserEngine> Clone for PageVisitor<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            ledger: Arc::clone(&self.ledger),
            scope: self.scope.clone(),
            settings: self.settings,
        }
    }
}

impl<E: BrowserEngine> PageVisitor<E> {
    pub fn new(
        engine: Arc<E>,
        ledger: Arc<CookieLedger>,
        scope: ScopePolicy,
        settings: VisitSettings,
    ) -> Self {
        Self {
            engine,
            ledger,
            scope,
            settings,
        }
    }

    /// Visits `url` and returns what happened
    ///
    /// Never returns an error: every failure is folded into
    /// [`VisitOutcome::Failed`]. The session is closed on every path, and a
    /// failing close is logged and otherwise ignored.
    pub async fn visit(&self, url: &str) -> VisitOutcome {
        let mut session = match self.engine.new_session().await {
            Ok(session) => session,
            Err(e) => {
                return VisitOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        let outcome = self.run_protocol(&mut session, url).await;

        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close session for {}: {}", url, e);
        }

        match outcome {
            Ok(outcome) => outcome,
            Err(e) => VisitOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    async fn run_protocol(
        &self,
        session: &mut E::Session,
        url: &str,
    ) -> EngineResult<VisitOutcome> {
        let final_url = session
            .navigate(url, self.settings.navigation_timeout)
            .await?;

        if final_url != url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        if self.scope.is_restricted() && !self.scope.allows_str(&final_url) {
            return Ok(VisitOutcome::OutOfScope { final_url });
        }

        let mut events = 0;

        let cookies = session.cookies().await?;
        if self
            .ledger
            .record_if_new(&cookies, url, CookieStep::InitialLoad)
            .is_some()
        {
            events += 1;
        }

        if self.settings.interact {
            let clicked = self.interact(session).await;
            tracing::debug!("Clicked {} element(s) on {}", clicked, url);

            let cookies = session.cookies().await?;
            if self
                .ledger
                .record_if_new(&cookies, url, CookieStep::AfterInteraction)
                .is_some()
            {
                events += 1;
            }
        }

        // Clicks may have navigated, so links resolve against the current address
        let current = match session.current_url().await {
            Ok(current) => current,
            Err(_) => final_url.clone(),
        };
        let base = Url::parse(&current).map_err(|e| EngineError::Navigation {
            url: current.clone(),
            message: e.to_string(),
        })?;

        let hrefs = session.link_targets().await?;
        let discovered = resolve_links(&hrefs, &base);

        Ok(VisitOutcome::Completed {
            final_url,
            discovered,
            events,
        })
    }

    /// Clicks every eligible interactive element, returning how many clicks succeeded
    async fn interact(&self, session: &E::Session) -> usize {
        let elements = match session.query_all(INTERACTIVE_SELECTOR).await {
            Ok(elements) => elements,
            Err(e) => {
                tracing::debug!("Interactive element query failed: {}", e);
                return 0;
            }
        };

        let mut clicked = 0;
        for element in &elements {
            match is_clickable(element).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::debug!("Skipping element: {}", e);
                    continue;
                }
            }

            match element.click().await {
                Ok(()) => {
                    clicked += 1;
                    session.wait(self.settings.interaction_delay).await;
                }
                Err(e) => tracing::debug!("Click failed: {}", e),
            }
        }

        clicked
    }
}

/// Visible, non-zero-sized and not disabled
async fn is_clickable<T: InteractiveElement>(element: &T) -> EngineResult<bool> {
    if !element.is_visible().await? {
        return Ok(false);
    }

    match element.bounding_box().await? {
        Some(bounds) if !bounds.is_empty() => {}
        _ => return Ok(false),
    }

    if element.attribute("disabled").await?.is_some() {
        return Ok(false);
    }

    let aria_disabled = element.attribute("aria-disabled").await?;
    Ok(!matches!(aria_disabled.as_deref(), Some("true")))
}
