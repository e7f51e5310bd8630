use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::matcher::TermMatcher;
use crate::corpus::{Corpus, Document};
use crate::errors::{IndexError, IndexResult};
use crate::results::{SearchMatch, SearchReport};

/// Answers queries against a persisted corpus.
///
/// The index is read on every call, so a rebuilt corpus is picked up without
/// constructing a new searcher. Searching never fails: a missing or
/// unreadable index yields an empty report.
#[derive(Debug, Clone)]
pub struct CorpusSearcher {
    index_path: PathBuf,
}

impl CorpusSearcher {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Checks whether an index has been written
    pub fn index_exists(&self) -> bool {
        self.index_path.is_file()
    }

    /// Searches the persisted corpus for `term`
    pub fn search(&self, term: &str) -> SearchReport {
        self.search_loading(term, Corpus::load_from)
    }

    /// Searches with `load` reading the index; a blank term never calls it
    fn search_loading<L>(&self, term: &str, load: L) -> SearchReport
    where
        L: FnOnce(&Path) -> IndexResult<Corpus>,
    {
        let Some(matcher) = TermMatcher::new(term) else {
            debug!("Empty search term, returning empty result");
            return SearchReport::new();
        };

        let corpus = match load(&self.index_path) {
            Ok(corpus) => corpus,
            Err(IndexError::IndexNotFound(path)) => {
                debug!("No index at {}, returning empty result", path.display());
                return SearchReport::new();
            }
            Err(e) => {
                warn!("Ignoring unreadable index: {}", e);
                return SearchReport::new();
            }
        };

        search_with(&corpus, &matcher)
    }
}

/// Searches an in-memory corpus for `term`
pub fn search_corpus(corpus: &Corpus, term: &str) -> SearchReport {
    match TermMatcher::new(term) {
        Some(matcher) => search_with(corpus, &matcher),
        None => SearchReport::new(),
    }
}

fn search_with(corpus: &Corpus, matcher: &TermMatcher) -> SearchReport {
    info!("Searching {} documents for: {}", corpus.len(), matcher.needle());

    let documents: Vec<(&String, &Document)> = corpus.documents().collect();
    let results: Vec<SearchMatch> = documents
        .par_iter()
        .map(|(path, document)| SearchMatch {
            path: path.to_string(),
            pages: matcher.matching_pages(document),
        })
        .collect();

    let mut report = SearchReport::new();
    for search_match in results {
        report.add_document(search_match);
    }

    info!(
        "Search complete. Found {} pages in {} documents",
        report.total_pages, report.documents_with_matches
    );
    report
}
