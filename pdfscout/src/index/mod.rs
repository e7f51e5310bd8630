//! Corpus construction: discover PDF files, extract their text on a bounded
//! rayon pool, and persist the result as one JSON artifact.
//!
//! ```rust,ignore
//! let outcome = build_corpus(&config, |progress| {
//!     println!("{:.0}%", progress.fraction() * 100.0);
//! })?;
//! if outcome.is_success() {
//!     println!("Indexed {} files", outcome.file_count());
//! }
//! ```
//!
//! Files that cannot be parsed, or that have no text on any page, are left
//! out of the corpus rather than failing the build.
pub mod builder;
pub mod extractor;
pub mod progress;

pub use builder::{build_corpus, BuildOutcome, BuildSummary, CorpusBuilder, Extraction, SourceFile};
pub use extractor::PdfExtractor;
pub use progress::{BuildProgress, CancelToken};
