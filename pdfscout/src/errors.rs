//! Error types shared by the indexing and search halves of the crate.
//!
//! Most failures never leave the library: a PDF that cannot be parsed is
//! recorded as a textless document, and an unreadable index makes a search
//! come back empty. What remains here is what a caller can actually observe,
//! such as a failed index write, a bad configuration file, or a worker pool
//! that could not be started.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for indexing and search operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while building, persisting or reading an index
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to read PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },
    #[error("Index not found: {0}")]
    IndexNotFound(PathBuf),
    #[error("Corrupt index {path}: {message}")]
    CorruptIndex { path: PathBuf, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Worker pool error: {0}")]
    ThreadPool(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl IndexError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn pdf(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Pdf {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn index_not_found(path: impl Into<PathBuf>) -> Self {
        Self::IndexNotFound(path.into())
    }

    pub fn corrupt_index(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CorruptIndex {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn thread_pool(msg: impl Into<String>) -> Self {
        Self::ThreadPool(msg.into())
    }

    /// Maps an I/O error on `path` to the path-carrying variant when one fits
    pub fn io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
