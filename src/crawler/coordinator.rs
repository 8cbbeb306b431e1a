//! Crawler coordinator - crawl run orchestration
//!
//! The coordinator owns one crawl run from start to finish:
//! - Validating the configuration and compiling the search pattern
//! - Starting the crawl and extract worker pools
//! - Seeding the frontier queue
//! - Waiting for outstanding work to drain (or the timeout to elapse)
//! - Sending one stop marker per worker and joining every worker
//! - Collecting the final report

use crate::config::{validate, Config, CrawlerConfig, SearchConfig};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::{HtmlParser, PageParser};
use crate::crawler::pattern::SearchPattern;
use crate::crawler::report::{CrawlReport, StopReason};
use crate::crawler::task::CrawlTask;
use crate::crawler::worker::{crawl_worker, extract_worker, CrawlContext};
use crate::{SitegrepError, UrlError};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};

/// Main crawler coordinator structure
pub struct Coordinator {
    crawler: CrawlerConfig,
    search: SearchConfig,
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn PageParser>,
}

impl Coordinator {
    /// Creates a coordinator with explicit fetch and parse capabilities
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - The configuration is valid
    /// * `Err(SitegrepError)` - The configuration failed validation
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
    ) -> Result<Self, SitegrepError> {
        validate(config)?;
        Ok(Self {
            crawler: config.crawler.clone(),
            search: config.search.clone(),
            fetcher,
            parser,
        })
    }

    /// Creates a coordinator that fetches over HTTP and parses HTML
    pub fn from_config(config: &Config) -> Result<Self, SitegrepError> {
        validate(config)?;
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
        Self::new(config, Arc::new(fetcher), Arc::new(HtmlParser::new()))
    }

    /// Runs one crawl from `seeds`, searching each page for `search_text`
    ///
    /// Every seed starts at the configured maximum depth. Per-page failures
    /// are logged and skipped; only setup failures and workers that exit
    /// abnormally are returned as errors.
    pub async fn run(
        &self,
        seeds: &[String],
        search_text: &str,
    ) -> Result<CrawlReport, SitegrepError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let pattern = SearchPattern::new(search_text, &self.search)?;
        let seed_tasks = self.seed_tasks(seeds)?;

        tracing::info!(
            "Starting crawl: {} seeds, max depth {}, {} crawl workers, {} extract workers, searching for '{}'",
            seed_tasks.len(),
            self.crawler.max_depth,
            self.crawler.crawl_workers,
            self.crawler.extract_workers,
            pattern.as_str()
        );

        let ctx = Arc::new(CrawlContext::new(
            self.crawler.max_url_match_count,
            pattern,
            self.fetcher.clone(),
            self.parser.clone(),
        ));

        let mut workers = JoinSet::new();
        for id in 0..self.crawler.crawl_workers {
            workers.spawn(crawl_worker(id, ctx.clone()));
        }
        for id in 0..self.crawler.extract_workers {
            workers.spawn(extract_worker(id, ctx.clone()));
        }

        for task in seed_tasks {
            ctx.frontier.push(task);
        }

        let limit = self.crawler.timeout_secs.map(Duration::from_secs);
        let timed_out = !drain_or_fail(&ctx, &mut workers, limit).await?;

        if timed_out {
            tracing::warn!(
                "Crawl timeout reached with {} tasks outstanding, winding down",
                ctx.tracker.outstanding()
            );
            ctx.halt();
            // In-flight work still finishes, and can still fail
            drain_or_fail(&ctx, &mut workers, None).await?;
        }

        self.shutdown(&ctx, &mut workers).await?;

        let stop_reason = if timed_out {
            StopReason::TimedOut
        } else if ctx.collector.should_stop() {
            StopReason::ThresholdReached
        } else {
            StopReason::FrontierExhausted
        };

        let (matched_urls, documents) = ctx.collector.results();
        let report = CrawlReport {
            search_text: search_text.to_string(),
            seeds: seeds.to_vec(),
            max_depth: self.crawler.max_depth,
            stop_reason,
            visited_count: ctx.registry.len(),
            visited_urls: ctx.registry.urls(),
            matched_urls,
            documents,
            stats: ctx.stats.snapshot(),
            started_at,
            finished_at: Utc::now(),
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        tracing::info!(
            "Crawl finished ({}): {} urls visited, {} documents, {} matches in {:?}",
            report.stop_reason,
            report.visited_count,
            report.documents.len(),
            report.matched_urls.len(),
            start.elapsed()
        );

        Ok(report)
    }

    /// Parses every seed into a task at the maximum depth
    fn seed_tasks(&self, seeds: &[String]) -> Result<Vec<CrawlTask>, UrlError> {
        seeds
            .iter()
            .map(|seed| CrawlTask::parse(seed, self.crawler.max_depth))
            .collect()
    }

    /// Sends the stop markers and joins every worker
    ///
    /// Only called once outstanding work has reached zero, so no worker can
    /// exit while work it queued for the other pool is still pending.
    async fn shutdown(
        &self,
        ctx: &CrawlContext,
        workers: &mut JoinSet<()>,
    ) -> Result<(), SitegrepError> {
        tracing::debug!("Work drained, stopping workers");
        ctx.frontier.stop(self.crawler.crawl_workers);
        ctx.pages.stop(self.crawler.extract_workers);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                workers.shutdown().await;
                return Err(SitegrepError::WorkerFailed(e.to_string()));
            }
        }

        tracing::debug!("All workers stopped");
        Ok(())
    }
}

/// Waits until no work is outstanding
///
/// Returns `Ok(false)` if `limit` elapsed first. A worker that finishes
/// while work is outstanding can only have panicked or been aborted, so the
/// remaining workers are shut down and the run fails.
async fn drain_or_fail(
    ctx: &CrawlContext,
    workers: &mut JoinSet<()>,
    limit: Option<Duration>,
) -> Result<bool, SitegrepError> {
    let drained = async {
        match limit {
            Some(limit) => tokio::time::timeout(limit, ctx.tracker.wait_drained())
                .await
                .is_ok(),
            None => {
                ctx.tracker.wait_drained().await;
                true
            }
        }
    };

    tokio::select! {
        finished = drained => Ok(finished),
        Some(joined) = workers.join_next() => {
            ctx.halt();
            workers.shutdown().await;
            Err(worker_failure(joined))
        }
    }
}

/// Maps a worker that finished before shutdown to an error
fn worker_failure(joined: Result<(), JoinError>) -> SitegrepError {
    match joined {
        Err(e) => SitegrepError::WorkerFailed(e.to_string()),
        Ok(()) => SitegrepError::WorkerFailed("worker exited before shutdown".to_string()),
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use sitegrep::config::Config;
/// use sitegrep::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = vec!["https://example.com/".to_string()];
/// let report = run_crawl(&Config::default(), &seeds, "hello").await?;
/// println!("{} matches", report.matched_urls.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    seeds: &[String],
    search_text: &str,
) -> Result<CrawlReport, SitegrepError> {
    let coordinator = Coordinator::from_config(config)?;
    coordinator.run(seeds, search_text).await
}
