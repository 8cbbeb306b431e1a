//! Crawler module for page fetching, searching and link following
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - HTML text and link extraction behind the [`PageParser`] seam
//! - The frontier and parse queues shared by the two worker pools
//! - URL claiming, match collection and run statistics
//! - Overall crawl coordination

mod collector;
mod coordinator;
mod fetcher;
mod parser;
mod pattern;
mod queue;
mod registry;
mod report;
mod stats;
mod task;
mod worker;

pub use collector::MatchCollector;
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{HtmlParser, PageParser, ParsedPage};
pub use pattern::SearchPattern;
pub use queue::{WorkQueue, WorkTracker};
pub use registry::UrlRegistry;
pub use report::{CrawlReport, StopReason};
pub use stats::{CrawlStats, StatsSnapshot};
pub use task::{CrawlTask, Document, Message, PageTask, DEPTH_FLOOR};
