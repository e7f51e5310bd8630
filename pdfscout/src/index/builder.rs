use ignore::WalkBuilder;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::extractor::PdfExtractor;
use super::progress::{BuildProgress, CancelToken};
use crate::config::IndexConfig;
use crate::corpus::{Corpus, Document};
use crate::errors::{IndexError, IndexResult};
use crate::filters::{normalize_path, should_include_file};
use crate::metrics::IndexMetrics;

/// A PDF found under the corpus root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Root-relative path with `/` separators, used as the document identifier
    pub id: String,
    pub path: PathBuf,
}

/// Documents gathered by a run of the worker pool
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub corpus: Corpus,
    /// Identifiers of files that produced no text
    pub skipped: Vec<String>,
    pub completed: usize,
    pub total: usize,
}

/// Counts reported after a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub files_found: usize,
    pub documents_indexed: usize,
    pub pages_indexed: usize,
    pub skipped: Vec<String>,
    pub elapsed: Duration,
}

/// How a build finished
#[derive(Debug)]
pub enum BuildOutcome {
    /// The corpus was written to the index path
    Indexed(BuildSummary),
    /// No PDF files were found; the index was left untouched
    NothingToIndex,
    /// Cancelled before every file was extracted; the index was left untouched
    Cancelled { completed: usize, total: usize },
    /// Extraction finished but the index could not be written. The corpus is
    /// handed back so the write can be retried.
    SaveFailed {
        files_found: usize,
        corpus: Corpus,
        error: IndexError,
    },
}

impl BuildOutcome {
    /// True only when a fresh corpus is on disk
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Indexed(_))
    }

    /// Number of PDF files the build processed
    pub fn file_count(&self) -> usize {
        match self {
            BuildOutcome::Indexed(summary) => summary.files_found,
            BuildOutcome::NothingToIndex => 0,
            BuildOutcome::Cancelled { completed, .. } => *completed,
            BuildOutcome::SaveFailed { files_found, .. } => *files_found,
        }
    }
}

/// Discovers PDFs under a root directory, extracts them on a bounded worker
/// pool and writes the resulting corpus.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    config: IndexConfig,
    cancel: CancelToken,
    metrics: IndexMetrics,
}

impl CorpusBuilder {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
            metrics: IndexMetrics::new(),
        }
    }

    /// Uses a caller-owned token so the build can be cancelled from elsewhere
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }

    /// Recursively finds `.pdf` files under the root, sorted by identifier
    pub fn discover(&self) -> Vec<SourceFile> {
        let root = &self.config.root_path;
        let mut walker = WalkBuilder::new(root);
        walker.standard_filters(false).hidden(true);

        let mut files: Vec<SourceFile> = walker
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| {
                let path = entry.into_path();
                SourceFile {
                    id: document_id(root, &path),
                    path,
                }
            })
            .filter(|file| should_include_file(Path::new(&file.id), &self.config.ignore_patterns))
            .collect();

        files.sort();
        debug!("Found {} PDF files under {}", files.len(), root.display());
        files
    }

    /// Extracts every file on the worker pool without touching the index.
    ///
    /// `on_progress` is called once per finished file, serialized, with a
    /// strictly increasing `completed` count.
    pub fn extract<F>(&self, files: &[SourceFile], on_progress: F) -> IndexResult<Extraction>
    where
        F: FnMut(BuildProgress) + Send,
    {
        let total = files.len();
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.thread_count.get())
            .build()
            .map_err(|e| IndexError::thread_pool(e.to_string()))?;

        let extractor = PdfExtractor::with_metrics(self.metrics.clone());
        let progress = Mutex::new((0usize, on_progress));
        let cancel = &self.cancel;

        let results: Vec<(String, Document)> = pool.install(|| {
            files
                .par_iter()
                .filter_map(|file| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    let document = extractor.extract(&file.path);
                    extractor.metrics().record_document(document.page_count());

                    let mut guard = progress.lock().unwrap_or_else(PoisonError::into_inner);
                    let (completed, report) = &mut *guard;
                    *completed += 1;
                    report(BuildProgress::new(*completed, total));

                    Some((file.id.clone(), document))
                })
                .collect()
        });

        let (completed, _) = progress.into_inner().unwrap_or_else(PoisonError::into_inner);

        let mut extraction = Extraction {
            completed,
            total,
            ..Default::default()
        };
        for (id, document) in results {
            if document.is_empty() {
                extraction.skipped.push(id);
            } else {
                extraction.corpus.insert(id, document);
            }
        }
        Ok(extraction)
    }

    /// Runs discovery, extraction and persistence.
    ///
    /// Metrics are reset first, so after a build they describe that build only.
    pub fn build<F>(&self, on_progress: F) -> IndexResult<BuildOutcome>
    where
        F: FnMut(BuildProgress) + Send,
    {
        let started = Instant::now();
        self.metrics.reset();
        info!(
            "Building index from {} with {} workers",
            self.config.root_path.display(),
            self.config.thread_count
        );

        let files = self.discover();
        if files.is_empty() {
            info!("No PDF files found under {}", self.config.root_path.display());
            return Ok(BuildOutcome::NothingToIndex);
        }

        let extraction = self.extract(&files, on_progress)?;
        self.metrics.log_stats();

        if extraction.completed < extraction.total {
            warn!(
                "Build cancelled after {} of {} files; index not written",
                extraction.completed, extraction.total
            );
            return Ok(BuildOutcome::Cancelled {
                completed: extraction.completed,
                total: extraction.total,
            });
        }

        for id in &extraction.skipped {
            debug!("No text extracted from {}", id);
        }

        if let Err(e) = extraction.corpus.save_to(&self.config.index_path) {
            error!(
                "Failed to write index {}: {}",
                self.config.index_path.display(),
                e
            );
            return Ok(BuildOutcome::SaveFailed {
                files_found: extraction.total,
                corpus: extraction.corpus,
                error: e,
            });
        }

        let summary = BuildSummary {
            files_found: extraction.total,
            documents_indexed: extraction.corpus.len(),
            pages_indexed: extraction.corpus.total_pages(),
            skipped: extraction.skipped,
            elapsed: started.elapsed(),
        };
        info!(
            "Index complete. {} of {} files have text ({} pages) in {}",
            summary.documents_indexed,
            summary.files_found,
            summary.pages_indexed,
            humantime::format_duration(Duration::from_millis(
                summary.elapsed.as_millis() as u64
            ))
        );

        Ok(BuildOutcome::Indexed(summary))
    }
}

/// Builds the corpus described by `config`, reporting progress per file
pub fn build_corpus<F>(config: &IndexConfig, on_progress: F) -> IndexResult<BuildOutcome>
where
    F: FnMut(BuildProgress) + Send,
{
    CorpusBuilder::new(config.clone()).build(on_progress)
}

fn document_id(root: &Path, path: &Path) -> String {
    normalize_path(path.strip_prefix(root).unwrap_or(path))
}
