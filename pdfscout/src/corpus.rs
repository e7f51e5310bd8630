//! The corpus: every indexed document with its per-page text, persisted as a
//! single JSON object.
//!
//! ```json
//! {
//!   "a/1.pdf": { "1": "first page text", "3": "third page text" },
//!   "b/2.pdf": { "2": "..." }
//! }
//! ```
//!
//! Page numbers are written as decimal string keys (JSON objects only allow
//! string keys) and parsed back into `u32` on load.
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{IndexError, IndexResult};

/// 1-based page number within a document
pub type PageNumber = u32;

/// Extracted text of one PDF, keyed by page number.
///
/// A page is present only if extraction produced non-blank text for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pages: BTreeMap<PageNumber, String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the text of a page. Blank text is dropped so that an absent
    /// page always means "no text".
    pub fn insert_page(&mut self, page: PageNumber, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim().is_empty() {
            return false;
        }
        self.pages.insert(page, text);
        true
    }

    pub fn page(&self, page: PageNumber) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    /// Pages in ascending order
    pub fn pages(&self) -> btree_map::Iter<'_, PageNumber, String> {
        self.pages.iter()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(PageNumber, S)> for Document {
    fn from_iter<I: IntoIterator<Item = (PageNumber, S)>>(iter: I) -> Self {
        let mut document = Document::new();
        for (page, text) in iter {
            document.insert_page(page, text);
        }
        document
    }
}

/// All indexed documents keyed by their root-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    documents: BTreeMap<String, Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document unless it has no text. Returns whether it was kept.
    pub fn insert(&mut self, id: impl Into<String>, document: Document) -> bool {
        if document.is_empty() {
            return false;
        }
        self.documents.insert(id.into(), document);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Documents in identifier order
    pub fn documents(&self) -> btree_map::Iter<'_, String, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.documents.values().map(Document::page_count).sum()
    }

    /// Loads a corpus from disk
    pub fn load_from(path: &Path) -> IndexResult<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IndexError::index_not_found(path))
            }
            Err(e) => return Err(IndexError::io(path, e)),
        };

        let corpus: Corpus = serde_json::from_slice(&data)
            .map_err(|e| IndexError::corrupt_index(path, e.to_string()))?;
        debug!(
            "Loaded {} documents from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Saves the corpus to disk, replacing any previous version
    pub fn save_to(&self, path: &Path) -> IndexResult<()> {
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
                parent
            }
            None => Path::new("."),
        };

        // Write to a uniquely named file in the same directory, then rename it
        // over the target. The temporary file is removed if anything fails.
        let data = serde_json::to_vec_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| IndexError::io(parent, e))?;
        tmp.write_all(&data)
            .map_err(|e| IndexError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| IndexError::io(path, e.error))?;

        debug!("Saved {} documents to {}", self.len(), path.display());
        Ok(())
    }
}

impl FromIterator<(String, Document)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for (id, document) in iter {
            corpus.insert(id, document);
        }
        corpus
    }
}
