pub mod config;
pub mod corpus;
pub mod errors;
pub mod filters;
pub mod index;
pub mod metrics;
pub mod results;
pub mod search;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod test_pdf;

pub use config::{ConfigOverrides, IndexConfig};
pub use corpus::{Corpus, Document, PageNumber};
pub use errors::{IndexError, IndexResult};
pub use index::{build_corpus, BuildOutcome, BuildProgress, CancelToken, CorpusBuilder};
pub use results::{SearchMatch, SearchReport};
pub use search::{search_corpus, CorpusSearcher};
