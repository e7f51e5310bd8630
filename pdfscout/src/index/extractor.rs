use lopdf::Document as PdfFile;
use memmap2::Mmap;
use std::any::Any;
use std::fs::File;
use std::io::{BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::corpus::Document;
use crate::errors::{IndexError, IndexResult};
use crate::metrics::IndexMetrics;

// Constants for file reading
const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Turns one PDF file into its per-page text
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    metrics: IndexMetrics,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor that reports into shared metrics
    pub fn with_metrics(metrics: IndexMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }

    /// Extracts the text of every page, degrading to an empty document when
    /// the file cannot be read or parsed.
    pub fn extract(&self, path: &Path) -> Document {
        match self.try_extract(path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                Document::new()
            }
        }
    }

    /// Extracts the text of every page, reporting the first failure
    pub fn try_extract(&self, path: &Path) -> IndexResult<Document> {
        trace!("Extracting text from: {}", path.display());

        let size = match path.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => return Err(IndexError::io(path, e)),
        };
        self.metrics.record_file_read(size);

        let document = if size < SMALL_FILE_THRESHOLD {
            let bytes = std::fs::read(path).map_err(|e| IndexError::io(path, e))?;
            parse_pages(&bytes, path)?
        } else if size >= LARGE_FILE_THRESHOLD {
            let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
            let mmap = unsafe { Mmap::map(&file) }.map_err(IndexError::IoError)?;
            parse_pages(&mmap, path)?
        } else {
            let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
            let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
            let mut bytes = Vec::with_capacity(size as usize);
            reader
                .read_to_end(&mut bytes)
                .map_err(IndexError::IoError)?;
            parse_pages(&bytes, path)?
        };

        debug!(
            "Extracted {} pages with text from {}",
            document.page_count(),
            path.display()
        );
        Ok(document)
    }
}

/// Parses PDF bytes, containing any panic raised by the parser
fn parse_pages(bytes: &[u8], path: &Path) -> IndexResult<Document> {
    panic::catch_unwind(AssertUnwindSafe(|| parse_pages_unguarded(bytes, path)))
        .unwrap_or_else(|payload| Err(IndexError::pdf(path, panic_message(payload.as_ref()))))
}

fn parse_pages_unguarded(bytes: &[u8], path: &Path) -> IndexResult<Document> {
    let pdf = PdfFile::load_mem(bytes).map_err(|e| IndexError::pdf(path, e.to_string()))?;

    let mut document = Document::new();
    for page_number in pdf.get_pages().into_keys() {
        let text = pdf
            .extract_text(&[page_number])
            .map_err(|e| IndexError::pdf(path, format!("page {page_number}: {e}")))?;
        if !document.insert_page(page_number, text) {
            trace!("Page {} of {} has no text", page_number, path.display());
        }
    }
    Ok(document)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("parser panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("parser panicked: {msg}")
    } else {
        "parser panicked".to_string()
    }
}
