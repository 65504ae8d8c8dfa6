//! Browsing engine capability layer
//!
//! The crawler never talks to a browser directly. It consumes three narrow
//! traits:
//! - [`BrowserEngine`]: hands out isolated sessions and shuts down
//! - [`BrowserSession`]: one isolated context + page (navigate, cookies, DOM queries)
//! - [`InteractiveElement`]: a clickable element handle
//!
//! Two engines are provided: [`ChromiumEngine`] (headless Chromium over the
//! DevTools protocol, feature `chromium`) and [`HttpEngine`] (plain HTTP, no
//! script execution).

#[cfg(feature = "chromium")]
mod chromium;
mod cookie;
mod http;
pub mod jar;
mod links;

#[cfg(feature = "chromium")]
pub use chromium::{ChromiumElement, ChromiumEngine, ChromiumSession};
pub use cookie::{Cookie, CookieKey};
pub use http::{HttpEngine, HttpSession, NoElement};
pub use links::extract_hrefs;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a browsing engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to open browsing session: {0}")]
    Session(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("No page has been loaded in this session")]
    NotLoaded,

    #[error("Element operation failed: {0}")]
    Element(String),

    #[error("Failed to read cookies: {0}")]
    Cookie(String),

    #[error("Failed to query page: {0}")]
    Query(String),

    #[error("Failed to release browser resources: {0}")]
    Teardown(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EngineError {
    /// Returns true if this error came from a navigation timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// On-screen size of an element, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Returns true if the element occupies no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A browsing engine that can open isolated sessions
///
/// Implementations are shared between concurrent visits, so they must be
/// `Send + Sync`. Each session they hand out is owned by exactly one visit.
#[async_trait]
pub trait BrowserEngine: Send + Sync + 'static {
    type Session: BrowserSession + 'static;

    /// Opens a fresh, isolated browsing context with one page
    async fn new_session(&self) -> EngineResult<Self::Session>;

    /// Releases the engine (closes the browser process, connection pools, ...)
    async fn shutdown(&self) -> EngineResult<()>;
}

/// One isolated browsing context with a single page
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: InteractiveElement + 'static;

    /// Navigates to `url`, waiting at most `timeout` for the load to finish
    ///
    /// Returns the page's address after any redirects.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> EngineResult<String>;

    /// Returns the page's current address
    async fn current_url(&self) -> EngineResult<String>;

    /// Returns every cookie visible in this session's context
    async fn cookies(&self) -> EngineResult<Vec<Cookie>>;

    /// Returns handles to every element matching a CSS selector
    async fn query_all(&self, selector: &str) -> EngineResult<Vec<Self::Element>>;

    /// Returns the raw `href` of every anchor on the page, unresolved
    async fn link_targets(&self) -> EngineResult<Vec<String>>;

    /// Lets the page run for `duration`
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Releases the context and page
    ///
    /// Must be idempotent and safe to call after any failure.
    async fn close(&mut self) -> EngineResult<()>;
}

/// A handle to a DOM element that may be clicked
#[async_trait]
pub trait InteractiveElement: Send + Sync {
    /// Returns the element's layout box, or None if it is not rendered
    async fn bounding_box(&self) -> EngineResult<Option<BoundingBox>>;

    /// Returns true if the element is rendered and not hidden by style
    async fn is_visible(&self) -> EngineResult<bool>;

    /// Returns an attribute value, or None if the attribute is absent
    async fn attribute(&self, name: &str) -> EngineResult<Option<String>>;

    /// Clicks the element
    async fn click(&self) -> EngineResult<()>;
}
