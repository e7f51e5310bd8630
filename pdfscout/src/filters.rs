//! Path filtering used while discovering PDF files under the corpus root.
use glob::Pattern;
use std::path::Path;

const PDF_EXTENSION: &str = "pdf";

/// Checks if a file has a `.pdf` extension, ignoring case
pub fn is_pdf_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

/// Converts a path to the forward-slash form used for matching and identifiers
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Checks if a file should be ignored based on ignore patterns
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    let normalized_path = normalize_path(path);

    ignore_patterns.iter().any(|pattern| match Pattern::new(pattern) {
        Ok(p) => p.matches(&normalized_path),
        Err(_) => false,
    })
}

/// Determines if a file should be handed to the extractor
pub fn should_include_file(path: &Path, ignore_patterns: &[String]) -> bool {
    is_pdf_file(path) && !should_ignore(path, ignore_patterns)
}
