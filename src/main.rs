//! Sitegrep main entry point
//!
//! This is the command-line interface for the Sitegrep same-host crawler.

use anyhow::Context;
use clap::Parser;
use sitegrep::config::{load_config_with_hash, validate, Config};
use sitegrep::crawler::run_crawl;
use sitegrep::output::{configured_writers, print_report, write_all, DEFAULT_RESULTS_FILE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitegrep: search the pages around a set of seed URLs
///
/// Sitegrep crawls outward from each seed, following only links that stay on
/// the seed's host, and reports the pages whose text matches the search
/// pattern. The crawl stops early once enough matching pages are found.
#[derive(Parser, Debug)]
#[command(name = "sitegrep")]
#[command(version)]
#[command(about = "Search the pages around a set of seed URLs", long_about = None)]
struct Cli {
    /// Seed URLs to start crawling from
    #[arg(short, long = "urls", value_name = "URL", num_args = 1.., required = true)]
    urls: Vec<String>,

    /// Text (regular expression unless --literal) to search for
    #[arg(short, long)]
    text: String,

    /// Maximum link depth from each seed [default: 2]
    #[arg(short, long)]
    depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent fetch workers
    #[arg(long)]
    crawl_workers: Option<usize>,

    /// Number of concurrent extract workers
    #[arg(long)]
    extract_workers: Option<usize>,

    /// Stop once this many matching pages are found
    #[arg(long)]
    max_matches: Option<usize>,

    /// Abandon the crawl after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Match case-insensitively
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Treat the search text as a literal string
    #[arg(long)]
    literal: bool,

    /// Write the document log as JSON (defaults to document_results.json when given without a path)
    #[arg(short, long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_RESULTS_FILE)]
    output: Option<String>,

    /// Write a markdown summary to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(depth) = self.depth {
            config.crawler.max_depth = depth;
        }
        if let Some(workers) = self.crawl_workers {
            config.crawler.crawl_workers = workers;
        }
        if let Some(workers) = self.extract_workers {
            config.crawler.extract_workers = workers;
        }
        if let Some(max) = self.max_matches {
            config.crawler.max_url_match_count = max;
        }
        if self.timeout_secs.is_some() {
            config.crawler.timeout_secs = self.timeout_secs;
        }
        if self.ignore_case {
            config.search.case_insensitive = true;
        }
        if self.literal {
            config.search.literal = true;
        }
        if self.output.is_some() {
            config.output.results_path = self.output.clone();
        }
        if self.summary.is_some() {
            config.output.summary_path = self.summary.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let report = match run_crawl(&config, &cli.urls, &cli.text).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    let writers = configured_writers(&config.output);
    write_all(&writers, &report).context("Failed to write crawl report")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegrep=info,warn"),
            1 => EnvFilter::new("sitegrep=debug,info"),
            2 => EnvFilter::new("sitegrep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_file(false)
        .init();
}
