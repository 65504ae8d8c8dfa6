//! Configuration module for Cookie-Ripple
//!
//! Configuration is layered: built-in defaults, an optional TOML file, and
//! command-line/environment overrides. The merged result is validated once.
//!
//! # Example
//!
//! ```no_run
//! use cookie_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Crawl will visit at most {} pages", config.crawl.max_pages);
//! ```

mod overrides;
mod parser;
mod types;
mod validation;

// Re-export types
pub use overrides::ConfigOverrides;
pub use types::{
    BrowserSettings, Config, CrawlConfig, DedupPolicy, EngineKind, OutputConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, parse_config_str, resolve_config,
};
pub use validation::validate;
