//! Case-insensitive substring search over a persisted corpus.
//!
//! Each page is tested independently; a document matches when any of its
//! pages contains the term, and the report lists exactly those pages. Results
//! follow corpus order (document identifier order) and are not ranked.
pub mod matcher;
pub mod searcher;

pub use matcher::TermMatcher;
pub use searcher::{search_corpus, CorpusSearcher};
