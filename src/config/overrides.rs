use crate::config::types::{Config, DedupPolicy, EngineKind};
use std::path::PathBuf;

/// Values supplied on the command line or through environment variables
///
/// Every field is optional; `None` leaves the file/default value untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub start_url: Option<String>,
    pub max_pages: Option<u32>,
    pub max_concurrency: Option<u32>,
    pub wait_after_interaction_ms: Option<u64>,
    pub navigation_timeout_ms: Option<u64>,
    pub domain_scoping: Option<bool>,
    pub interact: Option<bool>,
    pub cookie_dedup: Option<DedupPolicy>,
    pub engine: Option<EngineKind>,
    pub headless: Option<bool>,
    pub sandbox: Option<bool>,
    pub executable: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub result_path: Option<String>,
    pub summary_path: Option<String>,
}

impl ConfigOverrides {
    /// Writes every supplied value into `config`
    pub fn apply(self, config: &mut Config) {
        if let Some(v) = self.start_url {
            config.start_url = v;
        }
        if let Some(v) = self.max_pages {
            config.crawl.max_pages = v;
        }
        if let Some(v) = self.max_concurrency {
            config.crawl.max_concurrency = v;
        }
        if let Some(v) = self.wait_after_interaction_ms {
            config.crawl.wait_after_interaction_ms = v;
        }
        if let Some(v) = self.navigation_timeout_ms {
            config.crawl.navigation_timeout_ms = v;
        }
        if let Some(v) = self.domain_scoping {
            config.crawl.domain_scoping = v;
        }
        if let Some(v) = self.interact {
            config.crawl.interact = v;
        }
        if let Some(v) = self.cookie_dedup {
            config.crawl.cookie_dedup = v;
        }
        if let Some(v) = self.engine {
            config.browser.engine = v;
        }
        if let Some(v) = self.headless {
            config.browser.headless = v;
        }
        if let Some(v) = self.sandbox {
            config.browser.sandbox = v;
        }
        if let Some(v) = self.executable {
            config.browser.executable = Some(v);
        }
        if let Some(v) = self.user_agent {
            config.browser.user_agent = Some(v);
        }
        if let Some(v) = self.result_path {
            config.output.result_path = v;
        }
        if let Some(v) = self.summary_path {
            config.output.summary_path = Some(v);
        }
    }
}
