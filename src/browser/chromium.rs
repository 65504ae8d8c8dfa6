//! Headless Chromium browsing engine
//!
//! Drives a Chrome/Chromium process over the DevTools protocol. Each session
//! gets its own browser context (separate cookie store) with one page, so
//! concurrent visits never see each other's cookies.
//!
//! chromiumoxide pages have no `Drop` cleanup, so [`ChromiumSession`] closes
//! its page and disposes its context explicitly in `close`, and falls back to a
//! spawned cleanup task if it is dropped without being closed.

use super::cookie::Cookie;
use super::links::extract_hrefs;
use super::{BoundingBox, BrowserEngine, BrowserSession, EngineError, EngineResult, InteractiveElement};
use crate::config::BrowserSettings;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::network::{
    Cookie as CdpCookie, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::storage::GetCookiesParams;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Returns true when the element is rendered and not hidden by CSS
const VISIBILITY_PROBE: &str = r#"function() {
    const style = window.getComputedStyle(this);
    return style.visibility !== 'hidden'
        && style.display !== 'none'
        && this.getClientRects().length > 0;
}"#;

/// Browsing engine backed by a headless Chromium process
pub struct ChromiumEngine {
    browser: Arc<Mutex<Browser>>,
    handler_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    user_agent: Option<String>,
}

impl ChromiumEngine {
    /// Launches the browser process
    ///
    /// The CDP handler is polled on a background task for the lifetime of
    /// the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Launch`] if the browser cannot be started. This
    /// is fatal for a crawl.
    pub async fn launch(settings: &BrowserSettings) -> EngineResult<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-first-run");

        if !settings.headless {
            builder = builder.with_head();
        }
        if !settings.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }

        let config = builder.build().map_err(EngineError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        tracing::info!(
            "Launched Chromium (headless: {}, sandbox: {})",
            settings.headless,
            settings.sandbox
        );

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            handler_task: std::sync::Mutex::new(Some(handler_task)),
            user_agent: settings.user_agent.clone(),
        })
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    type Session = ChromiumSession;

    async fn new_session(&self) -> EngineResult<ChromiumSession> {
        let mut browser = self.browser.lock().await;

        let context_id = browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
            .map_err(|e| EngineError::Session(e.to_string()))?;

        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(EngineError::Session)?;

        let page = match browser.new_page(params).await {
            Ok(page) => page,
            Err(e) => {
                if let Err(dispose_err) = browser.dispose_browser_context(context_id).await {
                    tracing::warn!("Failed to dispose browser context: {}", dispose_err);
                }
                return Err(EngineError::Session(e.to_string()));
            }
        };
        drop(browser);

        if let Some(user_agent) = &self.user_agent {
            if let Err(e) = page
                .set_user_agent(SetUserAgentOverrideParams::new(user_agent.clone()))
                .await {
                tracing::warn!("Failed to set user agent: {}", e);
            }
        }

        Ok(ChromiumSession {
            browser: Arc::clone(&self.browser),
            context_id: Some(context_id),
            page: Some(page),
        })
    }

    async fn shutdown(&self) -> EngineResult<()> {
        let result = {
            let mut browser = self.browser.lock().await;
            match browser.close().await {
                Ok(_) => {
                    if let Err(e) = browser.wait().await {
                        tracing::warn!("Failed waiting for browser exit: {}", e);
                    }
                    Ok(())
                }
                Err(e) => Err(EngineError::Teardown(e.to_string())),
            }
        };

        let handler_task = self
            .handler_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = handler_task {
            task.abort();
        }

        result
    }
}

/// One browser context with one page
pub struct ChromiumSession {
    browser: Arc<Mutex<Browser>>,
    context_id: Option<BrowserContextId>,
    page: Option<Page>,
}

impl ChromiumSession {
    fn page(&self) -> EngineResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| EngineError::Session("session already closed".to_string()))
    }
}

fn convert_cookie(cookie: CdpCookie) -> Cookie {
    Cookie {
        name: cookie.name,
        value: cookie.value,
        domain: cookie.domain,
        path: cookie.path,
        expires: cookie.expires,
        http_only: cookie.http_only,
        secure: cookie.secure,
        same_site: cookie.same_site.map(|s| format!("{:?}", s)),
        session: cookie.session,
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Element = ChromiumElement;

    async fn navigate(&mut self, url: &str, timeout: Duration) -> EngineResult<String> {
        let page = self.page()?;

        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(EngineError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(EngineError::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }

        self.current_url().await
    }

    async fn current_url(&self) -> EngineResult<String> {
        self.page()?
            .url()
            .await
            .map_err(|e| EngineError::Query(e.to_string()))?
            .ok_or(EngineError::NotLoaded)
    }

    async fn cookies(&self) -> EngineResult<Vec<Cookie>> {
        let page = self.page()?;

        let mut params = GetCookiesParams::default();
        params.browser_context_id = self.context_id.clone();

        let response = page
            .execute(params)
            .await
            .map_err(|e| EngineError::Cookie(e.to_string()))?;

        Ok(response
            .result
            .cookies
            .into_iter()
            .map(convert_cookie)
            .collect())
    }

    async fn query_all(&self, selector: &str) -> EngineResult<Vec<ChromiumElement>> {
        let elements = self
            .page()?
            .find_elements(selector)
            .await
            .map_err(|e| EngineError::Query(e.to_string()))?;

        Ok(elements.into_iter().map(ChromiumElement).collect())
    }

    async fn link_targets(&self) -> EngineResult<Vec<String>> {
        let html = self
            .page()?
            .content()
            .await
            .map_err(|e| EngineError::Query(e.to_string()))?;

        Ok(extract_hrefs(&html))
    }

    async fn close(&mut self) -> EngineResult<()> {
        let mut failures = Vec::new();

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                failures.push(format!("page: {}", e));
            }
        }

        if let Some(context_id) = self.context_id.take() {
            let browser = self.browser.lock().await;
            if let Err(e) = browser.dispose_browser_context(context_id).await {
                failures.push(format!("context: {}", e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Teardown(failures.join(", ")))
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        let page = self.page.take();
        let context_id = self.context_id.take();
        if page.is_none() && context_id.is_none() {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let browser = Arc::clone(&self.browser);
        runtime.spawn(async move {
            if let Some(page) = page {
                if let Err(e) = page.close().await {
                    tracing::warn!("Session drop cleanup failed for page: {}", e);
                }
            }
            if let Some(context_id) = context_id {
                let browser = browser.lock().await;
                if let Err(e) = browser.dispose_browser_context(context_id).await {
                    tracing::warn!("Session drop cleanup failed for context: {}", e);
                }
            }
        });
    }
}

/// Handle to a DOM element in a [`ChromiumSession`]
pub struct ChromiumElement(Element);

#[async_trait]
impl InteractiveElement for ChromiumElement {
    async fn bounding_box(&self) -> EngineResult<Option<BoundingBox>> {
        match self.0.bounding_box().await {
            Ok(b) => Ok(Some(BoundingBox {
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
            })),
            // Elements without a layout box (display: none, detached) have no box model
            Err(_) => Ok(None),
        }
    }

    async fn is_visible(&self) -> EngineResult<bool> {
        let returns = self
            .0
            .call_js_fn(VISIBILITY_PROBE, false)
            .await
            .map_err(|e| EngineError::Element(e.to_string()))?;

        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn attribute(&self, name: &str) -> EngineResult<Option<String>> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| EngineError::Element(e.to_string()))
    }

    async fn click(&self) -> EngineResult<()> {
        self.0
            .click()
            .await
            .map(|_| ())
            .map_err(|e| EngineError::Element(e.to_string()))
    }
}
