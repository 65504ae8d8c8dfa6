//! Plain-HTTP browsing engine
//!
//! This engine fetches pages with `reqwest` and never runs scripts, so it only
//! sees cookies set through `Set-Cookie` response headers and never finds
//! anything to click. It handles:
//! - Building the HTTP client with a proper user agent string
//! - Manual redirect following (cookies set on intermediate hops are kept)
//! - Per-session cookie jars
//! - Error classification into navigation failures

use super::cookie::Cookie;
use super::jar;
use super::links::extract_hrefs;
use super::{BoundingBox, BrowserEngine, BrowserSession, EngineError, EngineResult, InteractiveElement};
use crate::config::BrowserSettings;
use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirect hops followed per navigation
const MAX_REDIRECTS: usize = 10;

/// Builds the default user agent string: `cookie-ripple/<version>`
fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Browsing engine backed by a plain HTTP client
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
}

impl HttpEngine {
    /// Builds an HTTP client with proper configuration
    ///
    /// Redirects are handled manually so cookies set on every hop are
    /// captured. The `headless` and `sandbox` settings do not apply.
    ///
    /// # Example
    ///
    /// ```
    /// use cookie_ripple::browser::HttpEngine;
    /// use cookie_ripple::config::BrowserSettings;
    ///
    /// let engine = HttpEngine::new(&BrowserSettings::default()).unwrap();
    /// ```
    pub fn new(settings: &BrowserSettings) -> EngineResult<Self> {
        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BrowserEngine for HttpEngine {
    type Session = HttpSession;

    async fn new_session(&self) -> EngineResult<HttpSession> {
        Ok(HttpSession {
            client: self.client.clone(),
            jar: Vec::new(),
            current: None,
            html: None,
            closed: false,
        })
    }

    async fn shutdown(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// One HTTP "context": its own cookie jar and the last loaded document
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    jar: Vec<Cookie>,
    current: Option<Url>,
    html: Option<String>,
    closed: bool,
}

impl HttpSession {
    /// Fetches `target`, following redirects and collecting cookies
    async fn follow(&mut self, start: Url) -> EngineResult<String> {
        let mut target = start;

        for _ in 0..=MAX_REDIRECTS {
            let mut request = self.client.get(target.clone());
            if let Some(header) = jar::cookie_header(&self.jar, &target) {
                request = request.header(COOKIE, header);
            }

            let response = request.send().await.map_err(|e| EngineError::Navigation {
                url: target.to_string(),
                message: classify_request_error(&e),
            })?;

            for value in response.headers().get_all(SET_COOKIE) {
                let Ok(raw) = value.to_str() else {
                    continue;
                };
                if let Some(cookie) = jar::parse_set_cookie(raw, &target) {
                    jar::store(&mut self.jar, cookie);
                }
            }

            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| EngineError::Navigation {
                        url: target.to_string(),
                        message: format!("HTTP {} without Location header", status.as_u16()),
                    })?;

                let next = target.join(location).map_err(|e| EngineError::Navigation {
                    url: target.to_string(),
                    message: format!("Invalid redirect location '{}': {}", location, e),
                })?;

                tracing::trace!("Redirect {} -> {}", target, next);
                target = next;
                continue;
            }

            if !status.is_success() {
                return Err(EngineError::Navigation {
                    url: target.to_string(),
                    message: format!("HTTP {}", status.as_u16()),
                });
            }

            let body = response.text().await.map_err(|e| EngineError::Navigation {
                url: target.to_string(),
                message: e.to_string(),
            })?;

            let final_url = target.to_string();
            self.current = Some(target);
            self.html = Some(body);
            return Ok(final_url);
        }

        Err(EngineError::Navigation {
            url: target.to_string(),
            message: format!("Too many redirects (more than {})", MAX_REDIRECTS),
        })
    }
}

/// Maps a transport error to a short description
fn classify_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    type Element = NoElement;

    async fn navigate(&mut self, url: &str, timeout: Duration) -> EngineResult<String> {
        if self.closed {
            return Err(EngineError::Session("session already closed".to_string()));
        }

        let target = Url::parse(url).map_err(|e| EngineError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        match tokio::time::timeout(timeout, self.follow(target)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn current_url(&self) -> EngineResult<String> {
        self.current
            .as_ref()
            .map(Url::to_string)
            .ok_or(EngineError::NotLoaded)
    }

    async fn cookies(&self) -> EngineResult<Vec<Cookie>> {
        Ok(self
            .jar
            .iter()
            .filter(|c| !jar::is_expired(c))
            .cloned()
            .collect())
    }

    async fn query_all(&self, _selector: &str) -> EngineResult<Vec<NoElement>> {
        // Nothing is clickable without a script runtime
        Ok(Vec::new())
    }

    async fn link_targets(&self) -> EngineResult<Vec<String>> {
        let html = self.html.as_deref().ok_or(EngineError::NotLoaded)?;
        Ok(extract_hrefs(html))
    }

    async fn close(&mut self) -> EngineResult<()> {
        self.closed = true;
        self.html = None;
        self.jar.clear();
        Ok(())
    }
}

/// Element type of [`HttpSession`]; never instantiated
#[derive(Debug)]
pub enum NoElement {}

#[async_trait]
impl InteractiveElement for NoElement {
    async fn bounding_box(&self) -> EngineResult<Option<BoundingBox>> {
        match *self {}
    }

    async fn is_visible(&self) -> EngineResult<bool> {
        match *self {}
    }

    async fn attribute(&self, _name: &str) -> EngineResult<Option<String>> {
        match *self {}
    }

    async fn click(&self) -> EngineResult<()> {
        match *self {}
    }
}
