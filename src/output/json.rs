//! JSON export of the document log

use crate::crawler::{CrawlReport, Document};
use crate::output::traits::{OutputResult, ReportWriter};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default file name for the JSON document log
pub const DEFAULT_RESULTS_FILE: &str = "document_results.json";

/// Writes every processed document, plus the matched URLs, as pretty JSON
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    search_text: &'a str,
    stop_reason: String,
    visited_count: usize,
    visited_urls: &'a [String],
    matched_urls: &'a [String],
    documents: &'a [Document],
}

impl JsonReportWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportWriter for JsonReportWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, report: &CrawlReport) -> OutputResult<()> {
        let body = JsonReport {
            search_text: &report.search_text,
            stop_reason: report.stop_reason.to_string(),
            visited_count: report.visited_count,
            visited_urls: &report.visited_urls,
            matched_urls: &report.matched_urls,
            documents: &report.documents,
        };

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &body)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
