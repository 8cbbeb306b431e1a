//! Human-readable crawl summary on stdout

use crate::crawler::CrawlReport;
use std::io::{self, Write};

/// Prints the report summary to stdout
pub fn print_report(report: &CrawlReport) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // stdout going away mid-print is not worth failing the run over
    let _ = write_report(&mut out, report);
}

/// Writes the report summary to any writer
pub fn write_report(out: &mut impl Write, report: &CrawlReport) -> io::Result<()> {
    writeln!(out, "=== Search Results ===\n")?;
    writeln!(out, "Search text: {}", report.search_text)?;

    if report.has_matches() {
        writeln!(out, "Matched URLs:")?;
        for (i, url) in report.matched_urls.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, url)?;
        }
    } else {
        writeln!(out, "No matches found for '{}'", report.search_text)?;
    }
    writeln!(out)?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Total URLs visited: {}", report.visited_count)?;
    writeln!(out, "  Documents processed: {}", report.documents.len())?;
    writeln!(out, "  Fetch failures: {}", report.stats.fetch_failures)?;
    writeln!(out, "  Stopped: {}", report.stop_reason)?;
    writeln!(out, "  Time taken: {:.2} seconds", report.duration_secs())?;

    Ok(())
}
