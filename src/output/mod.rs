//! Output module for crawl reports
//!
//! This module handles:
//! - Printing the search summary to stdout
//! - Exporting the document log as JSON
//! - Generating markdown summaries of a run

mod console;
mod json;
mod markdown;
mod traits;

pub use console::{print_report, write_report};
pub use json::{JsonReportWriter, DEFAULT_RESULTS_FILE};
pub use markdown::{format_markdown_summary, MarkdownReportWriter};
pub use traits::{OutputError, OutputResult, ReportWriter};

use crate::config::OutputConfig;
use crate::crawler::CrawlReport;

/// Builds the writers enabled by the output configuration
pub fn configured_writers(config: &OutputConfig) -> Vec<Box<dyn ReportWriter>> {
    let mut writers: Vec<Box<dyn ReportWriter>> = Vec::new();
    if let Some(path) = &config.results_path {
        writers.push(Box::new(JsonReportWriter::new(path)));
    }
    if let Some(path) = &config.summary_path {
        writers.push(Box::new(MarkdownReportWriter::new(path)));
    }
    writers
}

/// Runs every writer, stopping at the first failure
pub fn write_all(writers: &[Box<dyn ReportWriter>], report: &CrawlReport) -> OutputResult<()> {
    for writer in writers {
        writer.write(report)?;
        tracing::info!("Wrote {} report", writer.name());
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::crawler::{Document, StatsSnapshot, StopReason};
    use chrono::{TimeZone, Utc};

    pub(crate) fn sample_report() -> CrawlReport {
        let started_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CrawlReport {
            search_text: "hello".to_string(),
            seeds: vec!["http://a.test/".to_string()],
            max_depth: 2,
            stop_reason: StopReason::FrontierExhausted,
            visited_count: 3,
            visited_urls: vec![
                "http://a.test/".to_string(),
                "http://a.test/gone".to_string(),
                "http://a.test/x".to_string(),
            ],
            matched_urls: vec!["http://a.test/".to_string()],
            documents: vec![
                Document {
                    url: "http://a.test/".to_string(),
                    text: "hello world".to_string(),
                    matched: true,
                },
                Document {
                    url: "http://a.test/x".to_string(),
                    text: "nothing here".to_string(),
                    matched: false,
                },
            ],
            stats: StatsSnapshot {
                pages_fetched: 2,
                fetch_failures: 1,
                links_enqueued: 2,
                ..StatsSnapshot::default()
            },
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(1500),
            duration_ms: 1500,
        }
    }

    #[test]
    fn test_configured_writers() {
        let none = configured_writers(&OutputConfig::default());
        assert!(none.is_empty());

        let both = configured_writers(&OutputConfig {
            results_path: Some("out.json".to_string()),
            summary_path: Some("summary.md".to_string()),
        });
        let names: Vec<_> = both.iter().map(|w| w.name()).collect();
        assert_eq!(names, vec!["json", "markdown"]);
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let writers = configured_writers(&OutputConfig {
            results_path: Some(dir.path().join("r.json").to_string_lossy().into_owned()),
            summary_path: Some(dir.path().join("s.md").to_string_lossy().into_owned()),
        });

        write_all(&writers, &sample_report()).unwrap();

        assert!(dir.path().join("r.json").exists());
        assert!(dir.path().join("s.md").exists());
    }
}
