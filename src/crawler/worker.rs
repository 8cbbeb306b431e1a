//! Crawl and extract worker loops
//!
//! Crawl workers drain the frontier queue: claim, fetch, hand the page to the
//! parse queue. Extract workers drain the parse queue: search the text, record
//! the document, push same-host children back onto the frontier. Both exit on
//! the first `Stop` marker they receive.

use crate::crawler::collector::MatchCollector;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{PageParser, ParsedPage};
use crate::crawler::pattern::SearchPattern;
use crate::crawler::queue::{WorkQueue, WorkTracker};
use crate::crawler::registry::UrlRegistry;
use crate::crawler::stats::CrawlStats;
use crate::crawler::task::{CrawlTask, Document, Message, PageTask};
use crate::url::{resolve_link, same_host};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// State shared by every worker of one crawl run
pub(crate) struct CrawlContext {
    pub frontier: WorkQueue<CrawlTask>,
    pub pages: WorkQueue<PageTask>,
    pub tracker: Arc<WorkTracker>,
    pub registry: UrlRegistry,
    pub collector: MatchCollector,
    pub stats: CrawlStats,
    pub pattern: SearchPattern,
    pub fetcher: Arc<dyn PageFetcher>,
    pub parser: Arc<dyn PageParser>,
    halted: AtomicBool,
}

impl CrawlContext {
    pub fn new(
        threshold: usize,
        pattern: SearchPattern,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
    ) -> Self {
        let tracker = Arc::new(WorkTracker::new());
        Self {
            frontier: WorkQueue::new("frontier", tracker.clone()),
            pages: WorkQueue::new("parse", tracker.clone()),
            tracker,
            registry: UrlRegistry::new(),
            collector: MatchCollector::new(threshold),
            stats: CrawlStats::new(),
            pattern,
            fetcher,
            parser,
            halted: AtomicBool::new(false),
        }
    }

    /// Makes workers drop queued work without fetching or following links
    pub fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// True when no new fetch work should be dispatched
    fn winding_down(&self) -> bool {
        self.is_halted() || self.collector.should_stop()
    }
}

pub(crate) async fn crawl_worker(id: usize, ctx: Arc<CrawlContext>) {
    tracing::trace!(worker = id, "crawl worker started");

    loop {
        let task = match ctx.frontier.recv().await {
            Some(Message::Task(task)) => task,
            Some(Message::Stop) | None => break,
        };

        handle_crawl_task(id, &ctx, task).await;
        ctx.tracker.done();
    }

    tracing::trace!(worker = id, "crawl worker stopped");
}

async fn handle_crawl_task(id: usize, ctx: &CrawlContext, task: CrawlTask) {
    if ctx.winding_down() {
        tracing::debug!(worker = id, url = %task.url(), "stop requested, discarding task");
        ctx.stats.task_discarded();
        return;
    }

    if !ctx.registry.claim(task.key()) {
        tracing::trace!(worker = id, url = %task.url(), "already claimed");
        ctx.stats.duplicate_skipped();
        return;
    }

    tracing::info!(
        worker = id,
        depth = task.depth(),
        visited = ctx.registry.len(),
        "Visiting {}",
        task.url()
    );

    match ctx.fetcher.fetch(task.url()).await {
        Ok(page) => {
            ctx.stats.page_fetched();
            if page.final_url != *task.url() {
                tracing::debug!(worker = id, "{} redirected to {}", task.url(), page.final_url);
            }
            ctx.pages.push(PageTask::new(task, page.final_url, page.content));
        }
        Err(e) => {
            ctx.stats.fetch_failed();
            tracing::warn!(worker = id, depth = task.depth(), "Could not crawl: {}", e);
        }
    }
}

pub(crate) async fn extract_worker(id: usize, ctx: Arc<CrawlContext>) {
    tracing::trace!(worker = id, "extract worker started");

    loop {
        let page = match ctx.pages.recv().await {
            Some(Message::Task(page)) => page,
            Some(Message::Stop) | None => break,
        };

        // HTML parsing is CPU-bound; keep it off the async worker threads
        let blocking_ctx = ctx.clone();
        let handled =
            tokio::task::spawn_blocking(move || handle_page_task(id, &blocking_ctx, page)).await;
        if let Err(e) = handled {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
            tracing::error!(worker = id, "page handler cancelled: {}", e);
        }
        ctx.tracker.done();
    }

    tracing::trace!(worker = id, "extract worker stopped");
}

fn handle_page_task(id: usize, ctx: &CrawlContext, page: PageTask) {
    let ParsedPage { text, links } = ctx.parser.parse(&page.content);
    let matched = ctx.pattern.is_match(&text);

    let newly_matched = ctx.collector.record(Document {
        url: page.url().to_string(),
        text,
        matched,
    });
    if newly_matched {
        tracing::info!(worker = id, depth = page.depth(), "Match found at {}", page.url());
    } else {
        tracing::debug!(worker = id, depth = page.depth(), matched, "Processed {}", page.url());
    }

    if page.at_floor() {
        tracing::debug!(worker = id, url = %page.url(), "depth floor reached, not following links");
        return;
    }

    if ctx.winding_down() {
        return;
    }

    let parent = page.crawl_task();
    let mut queued: HashSet<String> = HashSet::new();

    for href in links {
        let Some(link) = same_host_link(&href, &page) else {
            continue;
        };

        let child = match parent.child(link) {
            Some(Ok(child)) => child,
            Some(Err(e)) => {
                tracing::debug!(worker = id, "Skipping link {}: {}", href, e);
                continue;
            }
            None => break,
        };

        if ctx.registry.is_claimed(child.key()) {
            continue;
        }
        if !queued.insert(child.key().to_string()) {
            continue;
        }

        if ctx.frontier.push(child) {
            ctx.stats.link_enqueued();
        }
    }

    tracing::debug!(
        worker = id,
        url = %page.url(),
        children = queued.len(),
        "links enqueued"
    );
}

/// Resolves one link found on `page` and keeps it only if it stays on the
/// page's host
///
/// Relative links resolve against the address the content was served from.
/// The host check is against the address that was requested.
fn same_host_link(href: &str, page: &PageTask) -> Option<Url> {
    let absolute = resolve_link(href, page.base_url())?;
    same_host(&absolute, page.url()).then_some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::crawler::fetcher::{FetchError, FetchedPage};
    use crate::crawler::parser::HtmlParser;
    use async_trait::async_trait;

    struct NeverFetch;

    #[async_trait]
    impl PageFetcher for NeverFetch {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            })
        }
    }

    fn context(threshold: usize) -> CrawlContext {
        CrawlContext::new(
            threshold,
            SearchPattern::new("hello", &SearchConfig::default()).unwrap(),
            Arc::new(NeverFetch),
            Arc::new(HtmlParser),
        )
    }

    fn page(url: &str, content: &str, depth: u32) -> PageTask {
        let task = CrawlTask::parse(url, depth).unwrap();
        PageTask::from_crawl(task, content.to_string())
    }

    async fn drain_frontier(ctx: &CrawlContext) -> Vec<CrawlTask> {
        let mut tasks = Vec::new();
        while ctx.tracker.outstanding() > tasks.len() {
            if let Some(Message::Task(task)) = ctx.frontier.recv().await {
                tasks.push(task);
            }
        }
        tasks
    }

    #[tokio::test]
    async fn test_children_are_same_host_and_one_level_deeper() {
        let ctx = context(5);
        let html = r#"<a href="/x">x</a>
            <a href="http://other.test/y">y</a>
            <a href="/x#again">x again</a>
            <a href="mailto:me@a.test">mail</a>"#;

        handle_page_task(0, &ctx, page("http://a.test/", html, 2));

        let children = drain_frontier(&ctx).await;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].url().as_str(), "http://a.test/x");
        assert_eq!(children[0].depth(), 1);
        assert_eq!(ctx.stats.snapshot().links_enqueued, 1);
    }

    #[tokio::test]
    async fn test_relative_links_resolve_against_directory_page() {
        let ctx = context(5);
        let html = r#"<a href="guide">guide</a> <a href="../about/">about</a>"#;

        handle_page_task(0, &ctx, page("http://a.test/docs/", html, 2));

        let children = drain_frontier(&ctx).await;
        let urls: Vec<&str> = children.iter().map(|c| c.url().as_str()).collect();
        assert_eq!(urls, vec!["http://a.test/docs/guide", "http://a.test/about/"]);
        assert_eq!(children[1].key(), "http://a.test/about");
    }

    #[tokio::test]
    async fn test_relative_links_resolve_against_redirect_target() {
        let ctx = context(5);
        let task = CrawlTask::parse("http://a.test/old", 2).unwrap();
        let redirected = PageTask::new(
            task,
            Url::parse("http://a.test/new/").unwrap(),
            r#"<a href="guide">guide</a>"#.to_string(),
        );

        handle_page_task(0, &ctx, redirected);

        let children = drain_frontier(&ctx).await;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].url().as_str(), "http://a.test/new/guide");
    }

    #[tokio::test]
    async fn test_slash_variants_are_queued_once() {
        let ctx = context(5);
        let html = r#"<a href="/docs/">a</a> <a href="/docs">b</a>"#;

        handle_page_task(0, &ctx, page("http://a.test/", html, 2));

        let children = drain_frontier(&ctx).await;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].url().as_str(), "http://a.test/docs/");
    }

    #[tokio::test]
    async fn test_floor_page_is_recorded_without_children() {
        let ctx = context(5);
        handle_page_task(0, &ctx, page("http://a.test/", r#"hello <a href="/x">x</a>"#, 0));

        assert_eq!(ctx.tracker.outstanding(), 0);
        assert_eq!(ctx.collector.matched_count(), 1);
        assert_eq!(ctx.collector.document_count(), 1);
    }

    #[tokio::test]
    async fn test_claimed_links_are_not_queued() {
        let ctx = context(5);
        ctx.registry.claim("http://a.test/x");
        handle_page_task(0, &ctx, page("http://a.test/", r#"<a href="/x">x</a>"#, 3));
        assert_eq!(ctx.tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_crawl_task_discarded_after_stop() {
        let ctx = context(1);
        ctx.collector.record(Document {
            url: "http://a.test/".to_string(),
            text: "hello".to_string(),
            matched: true,
        });

        let task = CrawlTask::new(Url::parse("http://a.test/next").unwrap(), 1).unwrap();
        handle_crawl_task(0, &ctx, task).await;

        assert!(!ctx.registry.is_claimed("http://a.test/next"));
        assert_eq!(ctx.stats.snapshot().tasks_discarded, 1);
        assert_eq!(ctx.stats.snapshot().fetch_attempts(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_claims_but_produces_no_page() {
        let ctx = context(5);
        let task = CrawlTask::new(Url::parse("http://a.test/").unwrap(), 1).unwrap();
        handle_crawl_task(0, &ctx, task).await;

        assert!(ctx.registry.is_claimed("http://a.test/"));
        assert_eq!(ctx.tracker.outstanding(), 0);
        assert_eq!(ctx.stats.snapshot().fetch_failures, 1);
    }
}
