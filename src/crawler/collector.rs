//! Accumulator for processed documents and the early-stop threshold

use crate::crawler::task::Document;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct CollectorState {
    documents: Vec<Document>,
    matched_urls: Vec<String>,
}

/// Thread-safe document log plus the ordered list of matched URLs
///
/// `record` and `should_stop` share one lock, so the threshold check never
/// observes a half-applied append. The matched list is capped at the
/// threshold; matches recorded after that are kept in the document log only.
#[derive(Debug)]
pub struct MatchCollector {
    threshold: usize,
    state: Mutex<CollectorState>,
}

impl MatchCollector {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            state: Mutex::new(CollectorState::default()),
        }
    }

    /// Appends a document to the log
    ///
    /// Returns true if the document's URL was added to the matched list.
    pub fn record(&self, document: Document) -> bool {
        let mut state = self.lock();
        let added = document.matched && state.matched_urls.len() < self.threshold;
        if added {
            state.matched_urls.push(document.url.clone());
        }
        state.documents.push(document);
        added
    }

    /// True once the matched list has reached the threshold
    ///
    /// Advisory: workers check it before dispatching new fetches. Once true it
    /// stays true for the rest of the run.
    pub fn should_stop(&self) -> bool {
        self.lock().matched_urls.len() >= self.threshold
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn matched_count(&self) -> usize {
        self.lock().matched_urls.len()
    }

    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    /// Copies out `(matched_urls, documents)`
    pub fn results(&self) -> (Vec<String>, Vec<Document>) {
        let state = self.lock();
        (state.matched_urls.clone(), state.documents.clone())
    }

    fn lock(&self) -> MutexGuard<'_, CollectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
