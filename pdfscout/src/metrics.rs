use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::index::extractor::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Tracks extraction volume during a build
#[derive(Debug, Clone)]
pub struct IndexMetrics {
    bytes_read: Arc<AtomicU64>,

    // Read strategy per file
    small_files_processed: Arc<AtomicU64>,
    buffered_files_processed: Arc<AtomicU64>,
    mmap_files_processed: Arc<AtomicU64>,

    // Extraction outcome
    pages_extracted: Arc<AtomicU64>,
    documents_indexed: Arc<AtomicU64>,
    documents_skipped: Arc<AtomicU64>,
}

impl IndexMetrics {
    /// Creates a new IndexMetrics instance
    pub fn new() -> Self {
        Self {
            bytes_read: Arc::new(AtomicU64::new(0)),
            small_files_processed: Arc::new(AtomicU64::new(0)),
            buffered_files_processed: Arc::new(AtomicU64::new(0)),
            mmap_files_processed: Arc::new(AtomicU64::new(0)),
            pages_extracted: Arc::new(AtomicU64::new(0)),
            documents_indexed: Arc::new(AtomicU64::new(0)),
            documents_skipped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a file read and the strategy its size selects
    pub fn record_file_read(&self, size: u64) {
        self.bytes_read.fetch_add(size, Ordering::Relaxed);
        if size < SMALL_FILE_THRESHOLD {
            self.small_files_processed.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_files_processed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_files_processed
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records the outcome of extracting one document
    pub fn record_document(&self, pages: usize) {
        if pages == 0 {
            self.documents_skipped.fetch_add(1, Ordering::Relaxed);
        } else {
            self.documents_indexed.fetch_add(1, Ordering::Relaxed);
            self.pages_extracted
                .fetch_add(pages as u64, Ordering::Relaxed);
        }
    }

    /// Zeroes every counter
    pub fn reset(&self) {
        for counter in [
            &self.bytes_read,
            &self.small_files_processed,
            &self.buffered_files_processed,
            &self.mmap_files_processed,
            &self.pages_extracted,
            &self.documents_indexed,
            &self.documents_skipped,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> IndexStats {
        IndexStats {
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            small_files: self.small_files_processed.load(Ordering::Relaxed),
            buffered_files: self.buffered_files_processed.load(Ordering::Relaxed),
            mmap_files: self.mmap_files_processed.load(Ordering::Relaxed),
            pages_extracted: self.pages_extracted.load(Ordering::Relaxed),
            documents_indexed: self.documents_indexed.load(Ordering::Relaxed),
            documents_skipped: self.documents_skipped.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Index stats:\n\
             Bytes read: {}\n\
             Files read (small/buffered/mmap): {}/{}/{}\n\
             Documents indexed/skipped: {}/{}\n\
             Pages extracted: {}",
            stats.bytes_read,
            stats.small_files,
            stats.buffered_files,
            stats.mmap_files,
            stats.documents_indexed,
            stats.documents_skipped,
            stats.pages_extracted
        );
    }
}

impl Default for IndexMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`IndexMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub bytes_read: u64,
    pub small_files: u64,
    pub buffered_files: u64,
    pub mmap_files: u64,
    pub pages_extracted: u64,
    pub documents_indexed: u64,
    pub documents_skipped: u64,
}
