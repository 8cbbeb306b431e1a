//! Report writer trait and output errors

use crate::crawler::CrawlReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists a finished crawl report somewhere
///
/// Writers run once, after the crawl has fully stopped.
pub trait ReportWriter {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Writes the report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl report
    fn write(&self, report: &CrawlReport) -> OutputResult<()>;
}
