//! Error types for ExtSort
//!
//! Per-file copy failures never surface through these types to the caller of
//! a sort run; they are logged and tallied in the summary. The variants here
//! cover fatal setup errors and the per-file causes recorded in that tally.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ExtSort operations
#[derive(Error, Debug)]
pub enum SortError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source root does not exist
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Source root exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An entry could not be enumerated or stat'd during the scan
    #[error("Traversal error at '{path}': {message}")]
    Traversal { path: PathBuf, message: String },

    /// Source and destination resolve to the same file
    #[error("Source and destination are the same file: {0}")]
    SameFile(PathBuf),

    /// Run summary could not be serialized
    #[error("Summary serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Async runtime could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A copy task panicked or was cancelled before reporting
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

impl SortError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound(path)
            | Self::NotADirectory(path)
            | Self::SameFile(path)
            | Self::Traversal { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for ExtSort operations
pub type Result<T> = std::result::Result<T, SortError>;

impl From<std::io::Error> for SortError {
    fn from(err: std::io::Error) -> Self {
        SortError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SortError {
    fn from(err: serde_json::Error) -> Self {
        SortError::Serialization(err.to_string())
    }
}

impl From<walkdir::Error> for SortError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        SortError::Traversal {
            path,
            message: err.to_string(),
        }
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SortError::io(path, e))
    }
}
