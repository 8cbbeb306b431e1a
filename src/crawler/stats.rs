use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free counters updated by the workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    duplicates_skipped: AtomicUsize,
    tasks_discarded: AtomicUsize,
    links_enqueued: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn duplicate_skipped(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_discarded(&self) {
        self.tasks_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_enqueued(&self) {
        self.links_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            tasks_discarded: self.tasks_discarded.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Successful fetches handed to the extract workers
    pub pages_fetched: usize,
    /// Fetches that failed and were dropped
    pub fetch_failures: usize,
    /// Tasks dropped because their URL was already claimed
    pub duplicates_skipped: usize,
    /// Tasks dropped without fetching because the run was winding down
    pub tasks_discarded: usize,
    /// Child tasks pushed back onto the frontier
    pub links_enqueued: usize,
}

impl StatsSnapshot {
    pub fn fetch_attempts(&self) -> usize {
        self.pages_fetched + self.fetch_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = CrawlStats::new();
        stats.page_fetched();
        stats.page_fetched();
        stats.fetch_failed();
        stats.link_enqueued();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.pages_fetched, 2);
        assert_eq!(snapshot.fetch_failures, 1);
        assert_eq!(snapshot.links_enqueued, 1);
        assert_eq!(snapshot.fetch_attempts(), 3);
        assert_eq!(snapshot.tasks_discarded, 0);
    }
}
