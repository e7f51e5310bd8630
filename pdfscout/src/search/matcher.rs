use crate::corpus::{Document, PageNumber};

/// Case-insensitive substring test for one query term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatcher {
    needle: String,
}

impl TermMatcher {
    /// Creates a matcher, or `None` when the term is empty or whitespace.
    ///
    /// Surrounding whitespace is trimmed from the term.
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            needle: term.to_lowercase(),
        })
    }

    /// The normalized term
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Checks whether the text contains the term, ignoring case
    pub fn is_match(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.needle)
    }

    /// Pages of the document containing the term, in ascending order
    pub fn matching_pages(&self, document: &Document) -> Vec<PageNumber> {
        document
            .pages()
            .filter(|(_, text)| self.is_match(text))
            .map(|(page, _)| *page)
            .collect()
    }
}
