//! Deduplicated registry of URLs already claimed for crawling

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe set of claimed URL keys
///
/// The set only grows for the lifetime of one crawl run. Memory grows with
/// the number of distinct URLs seen; there is no eviction.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    visited: Mutex<HashSet<String>>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically tests and inserts `url`
    ///
    /// Returns true iff the URL was not present, meaning the caller now owns
    /// crawling it.
    pub fn claim(&self, url: &str) -> bool {
        let mut visited = self.lock();
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.to_string())
    }

    /// Advisory membership check used to avoid queueing known URLs
    ///
    /// The answer can be stale by the time the caller acts on it; only
    /// [`UrlRegistry::claim`] decides ownership.
    pub fn is_claimed(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies out every claimed key, sorted
    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
