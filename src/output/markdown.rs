//! Markdown summary generation
//!
//! Generates a human-readable markdown summary of a crawl run: run
//! information, counters and the matched URL list.

use crate::crawler::CrawlReport;
use crate::output::traits::{OutputResult, ReportWriter};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes [`format_markdown_summary`] output to a file
#[derive(Debug, Clone)]
pub struct MarkdownReportWriter {
    path: PathBuf,
}

impl MarkdownReportWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportWriter for MarkdownReportWriter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write(&self, report: &CrawlReport) -> OutputResult<()> {
        let markdown = format_markdown_summary(report);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Sitegrep Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Search**: `{}`\n", report.search_text));
    md.push_str(&format!("- **Max Depth**: {}\n", report.max_depth));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {:.2} seconds\n", report.duration_secs()));
    md.push_str(&format!("- **Stopped**: {}\n\n", report.stop_reason));

    md.push_str("### Seeds\n\n");
    for seed in &report.seeds {
        md.push_str(&format!("- {}\n", seed));
    }
    md.push('\n');

    // Counters
    md.push_str("## Statistics\n\n");
    md.push_str("| Counter | Value |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| URLs Visited | {} |\n", report.visited_count));
    md.push_str(&format!("| Pages Fetched | {} |\n", report.stats.pages_fetched));
    md.push_str(&format!("| Fetch Failures | {} |\n", report.stats.fetch_failures));
    md.push_str(&format!("| Documents | {} |\n", report.documents.len()));
    md.push_str(&format!("| Links Enqueued | {} |\n", report.stats.links_enqueued));
    md.push_str(&format!(
        "| Duplicates Skipped | {} |\n",
        report.stats.duplicates_skipped
    ));
    md.push_str(&format!(
        "| Tasks Discarded | {} |\n\n",
        report.stats.tasks_discarded
    ));

    // Matches
    md.push_str("## Matched URLs\n\n");
    if report.matched_urls.is_empty() {
        md.push_str("No matches found.\n");
    } else {
        for (i, url) in report.matched_urls.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, url));
        }
    }

    md
}
