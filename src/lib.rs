//! # ExtSort - Concurrent File Organizer
//!
//! ExtSort scans a source directory tree and copies every regular file into
//! a destination tree grouped by extension:
//! `<destination>/<extension>/<file name>`. Extensions are lowercased and
//! stored without their leading dot, so `Photo.JPG` lands in `jpg/`.
//!
//! ## Features
//!
//! - **Recursive Scan**: nested files are found at any depth and flattened
//!   into their extension folder
//! - **Concurrent Copies**: one tokio task per file, bounded by a semaphore
//! - **Failure Isolation**: a failed copy is logged and tallied, never fatal
//! - **Run Summary**: counts per extension, failures, and skipped entries
//!
//! ## Quick Start
//!
//! ```no_run
//! use extsort::core::sort_tree;
//! use std::path::Path;
//!
//! let summary = sort_tree(Path::new("/downloads"), Path::new("/sorted")).unwrap();
//! println!("Copied {} of {} files", summary.files_copied, summary.files_found);
//! ```
//!
//! ## Advanced Usage
//!
//! ```no_run
//! use extsort::config::SortConfig;
//! use extsort::core::SortEngine;
//! use extsort::progress::ProgressReporter;
//! use std::path::PathBuf;
//!
//! # async fn run() -> extsort::Result<()> {
//! let config = SortConfig {
//!     source: PathBuf::from("/downloads"),
//!     destination: PathBuf::from("/sorted"),
//!     max_concurrent: 16,
//!     no_extension_dir: Some("no_ext".to_string()),
//! };
//!
//! let engine = SortEngine::new(config).with_progress(ProgressReporter::new());
//! let summary = engine.execute().await?;
//! summary.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Classification Only
//!
//! ```
//! use extsort::fs::classify;
//! use std::path::{Path, PathBuf};
//!
//! let spec = classify(Path::new("photos/Photo.JPG"), Path::new("/sorted"));
//! assert_eq!(spec.path(), PathBuf::from("/sorted/jpg/Photo.JPG"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod progress;

// Re-export commonly used types
pub use config::SortConfig;
pub use core::{SortEngine, SortSummary};
pub use error::{Result, SortError};
pub use progress::ProgressReporter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use extsort::prelude::*;
    //! ```

    pub use crate::config::SortConfig;
    pub use crate::core::{sort_tree, CopyFailure, SortEngine, SortSummary};
    pub use crate::error::{Result, SortError};
    pub use crate::fs::{classify, classify_with, extension_name, DestinationSpec, SourceEntry};
    pub use crate::progress::ProgressReporter;
}
