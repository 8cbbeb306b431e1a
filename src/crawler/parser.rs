//! Page text and link extraction
//!
//! The extract workers only see the [`PageParser`] trait. [`HtmlParser`] is
//! the scraper-backed implementation.

use scraper::{ElementRef, Html, Selector};

/// Elements whose text is never part of the searchable page text
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Visible text, whitespace-joined
    pub text: String,

    /// Raw link targets in document order (not resolved)
    pub links: Vec<String>,
}

/// Capability to pull text and outbound links out of fetched content
///
/// Implementations must be pure: the same content always yields the same
/// result. Links are returned as found; resolving them is up to the caller.
pub trait PageParser: Send + Sync {
    fn extract_text(&self, content: &str) -> String;

    fn extract_links(&self, content: &str) -> Vec<String>;

    /// Extracts text and links together
    ///
    /// Override when both can come from a single parse.
    fn parse(&self, content: &str) -> ParsedPage {
        ParsedPage {
            text: self.extract_text(content),
            links: self.extract_links(content),
        }
    }
}

/// HTML parser built on `scraper`
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - stylesheets, scripts and images
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for HtmlParser {
    fn extract_text(&self, content: &str) -> String {
        let document = Html::parse_document(content);
        collect_text(&document)
    }

    fn extract_links(&self, content: &str) -> Vec<String> {
        let document = Html::parse_document(content);
        collect_links(&document)
    }

    fn parse(&self, content: &str) -> ParsedPage {
        let document = Html::parse_document(content);
        ParsedPage {
            text: collect_text(&document),
            links: collect_links(&document),
        }
    }
}

/// Joins the document's visible text nodes with single spaces
fn collect_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ElementRef::wrap(ancestor)
                .map(|el| NON_CONTENT_ELEMENTS.contains(&el.value().name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

fn collect_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}
