//! Recursive source tree scanner
//!
//! Walks the source root with walkdir and collects every regular file.
//! Directories and other entry types are skipped without comment. Entries
//! that cannot be read are recorded as scan errors and the walk continues.

use crate::error::{Result, SortError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A regular file discovered during the scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Path to the file (under the source root as given)
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl SourceEntry {
    /// Build an entry if `entry` is a regular file.
    ///
    /// Symlinks count when they resolve to a regular file. Dangling links and
    /// links to directories are skipped.
    fn from_dir_entry(entry: &DirEntry) -> Result<Option<Self>> {
        let file_type = entry.file_type();

        if file_type.is_file() {
            let metadata = entry.metadata()?;
            return Ok(Some(Self {
                path: entry.path().to_path_buf(),
                size: metadata.len(),
            }));
        }

        if file_type.is_symlink() {
            return Ok(std::fs::metadata(entry.path())
                .ok()
                .filter(|m| m.is_file())
                .map(|m| Self {
                    path: entry.path().to_path_buf(),
                    size: m.len(),
                }));
        }

        Ok(None)
    }

    /// Base name of the file
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of a source tree scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root path that was scanned
    pub root: PathBuf,
    /// Regular files found
    pub files: Vec<SourceEntry>,
    /// Total size of all files
    pub total_size: u64,
    /// Entries that could not be read
    pub errors: Vec<String>,
    /// Scan duration
    pub scan_duration: std::time::Duration,
}

impl ScanResult {
    /// Number of regular files found
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Check that `root` exists and is a directory
pub fn validate_root(root: &Path) -> Result<()> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SortError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SortError::NotFound(root.to_path_buf()))
        }
        Err(e) => Err(SortError::io(root, e)),
    }
}

/// Scan `root` recursively for regular files
pub fn scan(root: &Path) -> Result<ScanResult> {
    let start_time = std::time::Instant::now();

    validate_root(root)?;

    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let outcome = entry
            .map_err(SortError::from)
            .and_then(|e| SourceEntry::from_dir_entry(&e));

        match outcome {
            Ok(Some(file)) => files.push(file),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                errors.push(e.to_string());
            }
        }
    }

    let total_size = files.iter().map(|f| f.size).sum();

    Ok(ScanResult {
        root: root.to_path_buf(),
        files,
        total_size,
        errors,
        scan_duration: start_time.elapsed(),
    })
}
