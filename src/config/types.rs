use serde::Deserialize;

/// Main configuration structure for Sitegrep
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub search: SearchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Depth given to every seed task; each link hop costs one level
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of crawl (fetch) workers
    #[serde(rename = "crawl-workers")]
    pub crawl_workers: usize,

    /// Number of extract (text + link) workers
    #[serde(rename = "extract-workers")]
    pub extract_workers: usize,

    /// Matched-URL count at which the crawl winds down
    #[serde(rename = "max-url-match-count")]
    pub max_url_match_count: usize,

    /// Optional wall-clock limit for a whole run (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Per-request timeout used by the HTTP fetcher (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            crawl_workers: 16,
            extract_workers: 16,
            max_url_match_count: 5,
            timeout_secs: None,
            request_timeout_secs: 30,
        }
    }
}

/// How the search text is interpreted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Match regardless of letter case
    #[serde(rename = "case-insensitive")]
    pub case_insensitive: bool,

    /// Treat the search text as a plain string instead of a regular expression
    pub literal: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitegrep".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/sitegrep".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the JSON report (document log + matched URLs)
    #[serde(rename = "results-path")]
    pub results_path: Option<String>,

    /// Where to write the markdown summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}
