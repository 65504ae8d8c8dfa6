use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Cookie-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seed URL the crawl starts from
    #[serde(rename = "start-url", default)]
    pub start_url: String,

    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub browser: BrowserSettings,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Creates a configuration with default settings for the given seed URL
    pub fn with_start_url(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            crawl: CrawlConfig::default(),
            browser: BrowserSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Maximum number of pages claimed for a visit in one run
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum number of page visits in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Delay after each click during interaction (milliseconds)
    #[serde(default = "default_wait_after_interaction_ms")]
    pub wait_after_interaction_ms: u64,

    /// Per-visit navigation timeout (milliseconds)
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Restrict the crawl to the seed host and its subdomains
    #[serde(default = "default_true")]
    pub domain_scoping: bool,

    /// Click interactive-looking elements on each page
    #[serde(default = "default_true")]
    pub interact: bool,

    /// How repeated cookie observations are deduplicated
    #[serde(default)]
    pub cookie_dedup: DedupPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_concurrency: default_max_concurrency(),
            wait_after_interaction_ms: default_wait_after_interaction_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            domain_scoping: true,
            interact: true,
            cookie_dedup: DedupPolicy::default(),
        }
    }
}

/// Cookie deduplication policy for the cookie ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// A cookie is new if its (name, domain, path) was never seen in this run
    #[default]
    NameDomainPath,
    /// A cookie is new if its name was never seen in this run, on any domain
    Name,
    /// No deduplication: every non-empty observation is recorded in full
    Snapshot,
}

impl DedupPolicy {
    /// Returns the configuration string for this policy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameDomainPath => "name-domain-path",
            Self::Name => "name",
            Self::Snapshot => "snapshot",
        }
    }
}

/// Which browsing engine performs page visits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// Headless Chromium driven over the DevTools protocol
    #[default]
    Chromium,
    /// Plain HTTP client; no script execution and no interaction
    Http,
}

impl EngineKind {
    /// Returns the configuration string for this engine
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Http => "http",
        }
    }
}

/// Browsing engine launch settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BrowserSettings {
    #[serde(default)]
    pub engine: EngineKind,

    /// Run the browser without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Keep the browser's process sandbox enabled
    #[serde(default = "default_true")]
    pub sandbox: bool,

    /// Explicit path to a Chrome/Chromium executable
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            headless: true,
            sandbox: true,
            executable: None,
            user_agent: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the JSON result document
    #[serde(default = "default_result_path")]
    pub result_path: String,

    /// Optional path to a markdown summary
    #[serde(default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_path: default_result_path(),
            summary_path: None,
        }
    }
}

fn default_max_pages() -> u32 {
    10
}

fn default_max_concurrency() -> u32 {
    5
}

fn default_wait_after_interaction_ms() -> u64 {
    600
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_result_path() -> String {
    "output/cookies.json".to_string()
}

fn default_true() -> bool {
    true
}
