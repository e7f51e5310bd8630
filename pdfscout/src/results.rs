//! Search result types.
use serde::Serialize;

use crate::corpus::PageNumber;

/// A document containing the search term and the pages it occurs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Root-relative path of the document
    pub path: String,
    /// Matching pages in ascending order
    pub pages: Vec<PageNumber>,
}

/// The complete result of one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// Matches in corpus order
    pub matches: Vec<SearchMatch>,
    /// Total number of matching pages
    pub total_pages: usize,
    /// Total number of documents searched
    pub documents_searched: usize,
    /// Total number of documents with at least one matching page
    pub documents_with_matches: usize,
}

impl SearchReport {
    /// Creates a new empty report
    pub fn new() -> Self {
        Default::default()
    }

    /// Counts a searched document, keeping it only if some page matched
    pub fn add_document(&mut self, search_match: SearchMatch) {
        self.documents_searched += 1;
        if !search_match.pages.is_empty() {
            self.total_pages += search_match.pages.len();
            self.documents_with_matches += 1;
            self.matches.push(search_match);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matching pages of one document, if it matched
    pub fn pages_for(&self, path: &str) -> Option<&[PageNumber]> {
        self.matches
            .iter()
            .find(|m| m.path == path)
            .map(|m| m.pages.as_slice())
    }
}
