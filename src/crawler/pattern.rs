use crate::config::SearchConfig;
use regex::{Regex, RegexBuilder};

/// Compiled search pattern applied to every page's text
#[derive(Debug, Clone)]
pub struct SearchPattern {
    source: String,
    regex: Regex,
}

impl SearchPattern {
    /// Compiles the search text
    ///
    /// The text is a regular expression unless `literal` is set, in which case
    /// it is matched as a plain substring.
    pub fn new(text: &str, options: &SearchConfig) -> Result<Self, regex::Error> {
        let expression = if options.literal {
            regex::escape(text)
        } else {
            text.to_string()
        };

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(options.case_insensitive)
            .build()?;

        Ok(Self {
            source: text.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
