//! Units of work passed between the two worker pools

use crate::url::{extract_domain, normalize_url};
use crate::UrlError;
use serde::Serialize;
use url::Url;

/// Depth at which a page is still fetched and searched but its links are
/// no longer followed
pub const DEPTH_FLOOR: u32 = 0;

/// A value received from a work queue
///
/// `Stop` is the poison marker: a worker that receives it exits.
#[derive(Debug)]
pub enum Message<T> {
    Task(T),
    Stop,
}

/// A URL waiting to be claimed and fetched
///
/// `url` is the address as linked (minus any fragment) and is what gets
/// fetched. `key` is its normalized form and is only used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    url: Url,
    key: String,
    depth: u32,
}

impl CrawlTask {
    /// Creates a task for an HTTP(S) URL with a host
    pub fn new(mut url: Url, depth: u32) -> Result<Self, UrlError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }
        if extract_domain(&url).is_none() {
            return Err(UrlError::MissingDomain);
        }
        url.set_fragment(None);
        let key = normalize_url(url.as_str())?.to_string();
        Ok(Self { url, key, depth })
    }

    /// Parses a seed string into a task
    pub fn parse(seed: &str, depth: u32) -> Result<Self, UrlError> {
        let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::new(url, depth)
    }

    /// Address to fetch
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Normalized registry key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remaining link hops from this page
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Builds the task for a link found on this page, one level deeper
    ///
    /// Returns None when this task is already at the depth floor.
    pub fn child(&self, url: Url) -> Option<Result<Self, UrlError>> {
        if self.depth <= DEPTH_FLOOR {
            return None;
        }
        Some(Self::new(url, self.depth - 1))
    }
}

/// A fetched page waiting for text and link extraction
#[derive(Debug, Clone)]
pub struct PageTask {
    task: CrawlTask,
    /// Address the content was finally served from, after redirects
    base_url: Url,
    pub content: String,
}

impl PageTask {
    pub fn new(task: CrawlTask, base_url: Url, content: String) -> Self {
        Self {
            task,
            base_url,
            content,
        }
    }

    /// Builds a page served from the address that was requested
    pub fn from_crawl(task: CrawlTask, content: String) -> Self {
        let base_url = task.url.clone();
        Self::new(task, base_url, content)
    }

    /// Address that was requested
    pub fn url(&self) -> &Url {
        self.task.url()
    }

    /// Base for resolving relative links found in the content
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn depth(&self) -> u32 {
        self.task.depth()
    }

    /// The task this page was fetched for, used to derive children
    pub fn crawl_task(&self) -> &CrawlTask {
        &self.task
    }

    pub fn at_floor(&self) -> bool {
        self.task.depth <= DEPTH_FLOOR
    }
}

/// The text of one processed page and whether it matched the search pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub url: String,
    pub text: String,
    pub matched: bool,
}
