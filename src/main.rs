//! Cookie-Ripple main entry point
//!
//! This is the command-line interface for the Cookie-Ripple cookie harvester.

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::Parser;
use cookie_ripple::browser::{BrowserEngine, HttpEngine};
use cookie_ripple::config::{resolve_config, Config, ConfigOverrides, DedupPolicy, EngineKind};
use cookie_ripple::crawler::{crawl, CrawlReport};
use cookie_ripple::output::{
    print_statistics, JsonOutputHandler, MarkdownSummaryHandler, OutputHandler,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Cookie-Ripple: a cookie-harvesting site crawler
///
/// Cookie-Ripple visits the pages reachable from a seed URL with a real
/// browser, clicks interactive elements, and records which cookies each page
/// caused to be set.
#[derive(Parser, Debug)]
#[command(name = "cookie-ripple")]
#[command(version)]
#[command(about = "A cookie-harvesting site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL the crawl starts from
    #[arg(long, env = "START_URL")]
    start_url: Option<String>,

    /// Maximum number of pages to visit
    #[arg(long, env = "MAX_PAGES")]
    max_pages: Option<u32>,

    /// Maximum number of visits in flight at once
    #[arg(long, env = "MAX_CONCURRENCY")]
    max_concurrency: Option<u32>,

    /// Delay after each click, in milliseconds
    #[arg(long, env = "WAIT_AFTER_INTERACTION_MS")]
    wait_after_interaction_ms: Option<u64>,

    /// Per-visit navigation timeout, in milliseconds
    #[arg(long, env = "NAVIGATION_TIMEOUT_MS")]
    navigation_timeout_ms: Option<u64>,

    /// Restrict the crawl to the seed host and its subdomains
    #[arg(long, env = "DOMAIN_SCOPING", value_parser = BoolishValueParser::new())]
    domain_scoping: Option<bool>,

    /// Click interactive elements on each page
    #[arg(long, env = "INTERACT", value_parser = BoolishValueParser::new())]
    interact: Option<bool>,

    /// Cookie deduplication policy
    #[arg(long, env = "COOKIE_DEDUP", value_enum)]
    cookie_dedup: Option<DedupPolicy>,

    /// Browsing engine
    #[arg(long, env = "ENGINE", value_enum)]
    engine: Option<EngineKind>,

    /// Run the browser without a window
    #[arg(long, env = "HEADLESS", value_parser = BoolishValueParser::new())]
    headless: Option<bool>,

    /// Keep the browser sandbox enabled
    #[arg(long, env = "SANDBOX", value_parser = BoolishValueParser::new())]
    sandbox: Option<bool>,

    /// Path to a Chrome/Chromium executable
    #[arg(long, env = "CHROME_EXECUTABLE")]
    executable: Option<PathBuf>,

    /// User agent override
    #[arg(long, env = "USER_AGENT")]
    user_agent: Option<String>,

    /// Where the JSON result document is written
    #[arg(short, long, env = "OUTPUT_PATH")]
    output: Option<String>,

    /// Where the markdown summary is written (no summary if unset)
    #[arg(long, env = "SUMMARY_PATH")]
    summary_path: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            start_url: self.start_url.clone(),
            max_pages: self.max_pages,
            max_concurrency: self.max_concurrency,
            wait_after_interaction_ms: self.wait_after_interaction_ms,
            navigation_timeout_ms: self.navigation_timeout_ms,
            domain_scoping: self.domain_scoping,
            interact: self.interact,
            cookie_dedup: self.cookie_dedup,
            engine: self.engine,
            headless: self.headless,
            sandbox: self.sandbox,
            executable: self.executable.clone(),
            user_agent: self.user_agent.clone(),
            result_path: self.output.clone(),
            summary_path: self.summary_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let (config, config_hash) = match resolve_config(cli.config.as_deref(), cli.overrides()) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("invalid configuration");
        }
    };
    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = match config.browser.engine {
        EngineKind::Http => {
            let engine = HttpEngine::new(&config.browser).context("failed to build HTTP client")?;
            handle_crawl(&config, Arc::new(engine)).await?
        }
        EngineKind::Chromium => launch_chromium_and_crawl(&config).await?,
    };

    write_outputs(&config, config_hash, &report)?;

    if !cli.quiet {
        println!();
        print_statistics(&report.statistics);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        match verbose {
            0 => EnvFilter::new("cookie_ripple=info,warn"),
            1 => EnvFilter::new("cookie_ripple=debug,info"),
            2 => EnvFilter::new("cookie_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Cookie-Ripple Dry Run ===\n");

    println!("Seed: {}", config.start_url);

    println!("\nCrawl Configuration:");
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Max concurrency: {}", config.crawl.max_concurrency);
    println!("  Navigation timeout: {}ms", config.crawl.navigation_timeout_ms);
    println!(
        "  Wait after interaction: {}ms",
        config.crawl.wait_after_interaction_ms
    );
    println!("  Domain scoping: {}", config.crawl.domain_scoping);
    println!("  Interaction: {}", config.crawl.interact);
    println!("  Cookie dedup: {}", config.crawl.cookie_dedup.as_str());

    println!("\nBrowser:");
    println!("  Engine: {}", config.browser.engine.as_str());
    println!("  Headless: {}", config.browser.headless);
    println!("  Sandbox: {}", config.browser.sandbox);
    if let Some(executable) = &config.browser.executable {
        println!("  Executable: {}", executable.display());
    }
    if let Some(user_agent) = &config.browser.user_agent {
        println!("  User agent: {}", user_agent);
    }

    println!("\nOutput:");
    println!("  Result: {}", config.output.result_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would visit up to {} page(s) starting from {}",
        config.crawl.max_pages, config.start_url
    );
}

#[cfg(feature = "chromium")]
async fn launch_chromium_and_crawl(config: &Config) -> anyhow::Result<CrawlReport> {
    use cookie_ripple::browser::ChromiumEngine;

    let engine = match ChromiumEngine::launch(&config.browser).await {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e).context("could not start Chromium");
        }
    };
    handle_crawl(config, Arc::new(engine)).await
}

#[cfg(not(feature = "chromium"))]
async fn launch_chromium_and_crawl(_config: &Config) -> anyhow::Result<CrawlReport> {
    anyhow::bail!("this build has no Chromium support; rebuild with the `chromium` feature or use --engine http")
}

/// Handles the main crawl operation
///
/// The engine is shut down whether or not the crawl succeeded.
async fn handle_crawl<E: BrowserEngine>(
    config: &Config,
    engine: Arc<E>,
) -> anyhow::Result<CrawlReport> {
    tracing::info!(
        "Crawling {} (max pages: {}, max concurrency: {}, engine: {})",
        config.start_url,
        config.crawl.max_pages,
        config.crawl.max_concurrency,
        config.browser.engine.as_str()
    );

    let result = crawl(config, Arc::clone(&engine)).await;

    if let Err(e) = engine.shutdown().await {
        tracing::warn!("Engine shutdown failed: {}", e);
    }

    match result {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Writes the JSON result and, if configured, the markdown summary
fn write_outputs(
    config: &Config,
    config_hash: Option<String>,
    report: &CrawlReport,
) -> anyhow::Result<()> {
    JsonOutputHandler::new(&config.output.result_path)
        .write_report(report)
        .with_context(|| format!("failed to write {}", config.output.result_path))?;

    if let Some(summary_path) = &config.output.summary_path {
        MarkdownSummaryHandler::new(summary_path, config_hash)
            .write_report(report)
            .with_context(|| format!("failed to write {}", summary_path))?;
    }

    Ok(())
}
