//! Scripted in-memory browsing engine
//!
//! Pages are described up front (links, cookies, clickable elements, delays,
//! failures). The engine counts sessions so tests can check concurrency and
//! cleanup.

use async_trait::async_trait;
use cookie_ripple::browser::{
    BoundingBox, BrowserEngine, BrowserSession, Cookie, EngineError, EngineResult,
    InteractiveElement,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A clickable element on a scripted page
#[derive(Debug, Clone)]
pub struct ElementScript {
    visible: bool,
    width: f64,
    height: f64,
    disabled: bool,
    fails: bool,
    sets: Vec<Cookie>,
}

impl ElementScript {
    /// A visible button that sets `cookies` when clicked
    pub fn button(cookies: Vec<Cookie>) -> Self {
        Self {
            visible: true,
            width: 80.0,
            height: 24.0,
            disabled: false,
            fails: false,
            sets: cookies,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn zero_sized(mut self) -> Self {
        self.width = 0.0;
        self.height = 0.0;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

/// What a URL does when visited
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    links: Vec<String>,
    cookies: Vec<Cookie>,
    elements: Vec<ElementScript>,
    redirect_to: Option<String>,
    fails: bool,
    delay: Duration,
}

impl PageScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(mut self, href: &str) -> Self {
        self.links.push(href.to_string());
        self
    }

    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn element(mut self, element: ElementScript) -> Self {
        self.elements.push(element);
        self
    }

    pub fn redirect(mut self, target: &str) -> Self {
        self.redirect_to = Some(target.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

type Generator = Box<dyn Fn(&str) -> Option<PageScript> + Send + Sync>;

#[derive(Default)]
struct Site {
    pages: HashMap<String, PageScript>,
    generator: Option<Generator>,
}

impl Site {
    fn lookup(&self, url: &str) -> Option<PageScript> {
        self.pages
            .get(url)
            .cloned()
            .or_else(|| self.generator.as_ref().and_then(|g| g(url)))
    }
}

/// Counters shared by the engine and all of its sessions
#[derive(Debug, Default)]
pub struct EngineStats {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    clicks: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl EngineStats {
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

/// Builder for a [`ScriptedEngine`]
#[derive(Default)]
pub struct ScriptedSite {
    site: Site,
    failing_close: bool,
}

impl ScriptedSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, script: PageScript) -> Self {
        self.site.pages.insert(url.to_string(), script);
        self
    }

    /// Serves pages not registered with [`ScriptedSite::page`]
    pub fn generated<F>(mut self, generator: F) -> Self
    where
        F: Fn(&str) -> Option<PageScript> + Send + Sync + 'static,
    {
        self.site.generator = Some(Box::new(generator));
        self
    }

    /// Makes every session close report an error
    pub fn failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    pub fn build(self) -> Arc<ScriptedEngine> {
        Arc::new(ScriptedEngine {
            site: Arc::new(self.site),
            failing_close: self.failing_close,
            stats: Arc::new(EngineStats::default()),
        })
    }
}

/// Engine that serves [`PageScript`]s instead of real pages
pub struct ScriptedEngine {
    site: Arc<Site>,
    failing_close: bool,
    stats: Arc<EngineStats>,
}

impl ScriptedEngine {
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}

#[async_trait]
impl BrowserEngine for ScriptedEngine {
    type Session = ScriptedSession;

    async fn new_session(&self) -> EngineResult<ScriptedSession> {
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(now, Ordering::SeqCst);
        self.stats.opened.fetch_add(1, Ordering::SeqCst);

        Ok(ScriptedSession {
            site: Arc::clone(&self.site),
            stats: Arc::clone(&self.stats),
            jar: Arc::new(Mutex::new(Vec::new())),
            current: None,
            page: None,
            closed: false,
            failing_close: self.failing_close,
        })
    }

    async fn shutdown(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// One scripted visit
pub struct ScriptedSession {
    site: Arc<Site>,
    stats: Arc<EngineStats>,
    jar: Arc<Mutex<Vec<Cookie>>>,
    current: Option<String>,
    page: Option<PageScript>,
    closed: bool,
    failing_close: bool,
}

fn store(jar: &Mutex<Vec<Cookie>>, cookies: &[Cookie]) {
    let mut jar = jar.lock().unwrap();
    for cookie in cookies {
        jar.retain(|c| c.key() != cookie.key());
        jar.push(cookie.clone());
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    type Element = ScriptedElement;

    async fn navigate(&mut self, url: &str, timeout: Duration) -> EngineResult<String> {
        self.stats.navigations.lock().unwrap().push(url.to_string());

        let script = self.site.lookup(url).ok_or_else(|| EngineError::Navigation {
            url: url.to_string(),
            message: "HTTP 404".to_string(),
        })?;

        if script.delay > timeout {
            tokio::time::sleep(timeout).await;
            return Err(EngineError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        tokio::time::sleep(script.delay).await;

        if script.fails {
            return Err(EngineError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        store(&self.jar, &script.cookies);

        let (final_url, page) = match &script.redirect_to {
            Some(target) => {
                let landing = self.site.lookup(target).unwrap_or_default();
                store(&self.jar, &landing.cookies);
                (target.clone(), landing)
            }
            None => (url.to_string(), script),
        };

        self.current = Some(final_url.clone());
        self.page = Some(page);
        Ok(final_url)
    }

    async fn current_url(&self) -> EngineResult<String> {
        self.current.clone().ok_or(EngineError::NotLoaded)
    }

    async fn cookies(&self) -> EngineResult<Vec<Cookie>> {
        Ok(self.jar.lock().unwrap().clone())
    }

    async fn query_all(&self, _selector: &str) -> EngineResult<Vec<ScriptedElement>> {
        let page = self.page.as_ref().ok_or(EngineError::NotLoaded)?;
        Ok(page
            .elements
            .iter()
            .cloned()
            .map(|script| ScriptedElement {
                script,
                jar: Arc::clone(&self.jar),
                stats: Arc::clone(&self.stats),
            })
            .collect())
    }

    async fn link_targets(&self) -> EngineResult<Vec<String>> {
        let page = self.page.as_ref().ok_or(EngineError::NotLoaded)?;
        Ok(page.links.clone())
    }

    async fn close(&mut self) -> EngineResult<()> {
        if !self.closed {
            self.closed = true;
            self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
        }

        if self.failing_close {
            return Err(EngineError::Teardown("context already gone".to_string()));
        }
        Ok(())
    }
}

/// Element handle on a scripted page
pub struct ScriptedElement {
    script: ElementScript,
    jar: Arc<Mutex<Vec<Cookie>>>,
    stats: Arc<EngineStats>,
}

#[async_trait]
impl InteractiveElement for ScriptedElement {
    async fn bounding_box(&self) -> EngineResult<Option<BoundingBox>> {
        Ok(Some(BoundingBox {
            x: 10.0,
            y: 10.0,
            width: self.script.width,
            height: self.script.height,
        }))
    }

    async fn is_visible(&self) -> EngineResult<bool> {
        Ok(self.script.visible)
    }

    async fn attribute(&self, name: &str) -> EngineResult<Option<String>> {
        Ok(match name {
            "disabled" if self.script.disabled => Some(String::new()),
            _ => None,
        })
    }

    async fn click(&self) -> EngineResult<()> {
        if self.script.fails {
            return Err(EngineError::Element("element is detached".to_string()));
        }
        self.stats.clicks.fetch_add(1, Ordering::SeqCst);
        store(&self.jar, &self.script.sets);
        Ok(())
    }
}
