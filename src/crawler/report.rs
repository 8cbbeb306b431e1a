use crate::crawler::stats::StatsSnapshot;
use crate::crawler::task::Document;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The matched-URL list reached the configured threshold
    ThresholdReached,
    /// Every reachable task within the depth limit was processed
    FrontierExhausted,
    /// The wall-clock timeout elapsed before the frontier drained
    TimedOut,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ThresholdReached => "match threshold reached",
            Self::FrontierExhausted => "frontier exhausted",
            Self::TimedOut => "timed out",
        };
        f.write_str(label)
    }
}

/// Result of one crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub search_text: String,
    pub seeds: Vec<String>,
    pub max_depth: u32,
    pub stop_reason: StopReason,
    /// Number of distinct URLs claimed (fetched or attempted)
    pub visited_count: usize,
    /// Normalized keys of every claimed URL, sorted
    pub visited_urls: Vec<String>,
    /// Matched URLs in discovery order, at most the match threshold
    pub matched_urls: Vec<String>,
    /// Every processed page, matched or not
    pub documents: Vec<Document>,
    pub stats: StatsSnapshot,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl CrawlReport {
    pub fn threshold_reached(&self) -> bool {
        self.stop_reason == StopReason::ThresholdReached
    }

    pub fn has_matches(&self) -> bool {
        !self.matched_urls.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}
