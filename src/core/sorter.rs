//! Sort engine
//!
//! Scans the source tree, then copies every regular file into its
//! per-extension folder on its own tokio task. A semaphore caps how many
//! copies are in flight. Each task logs its own outcome and a failure in one
//! task never affects the others; the engine joins every task and returns a
//! tally of the run.

use crate::config::SortConfig;
use crate::error::{Result, SortError};
use crate::fs::{classify_with, copy_file, ensure_dir, scan, DestinationSpec, ScanResult, SourceEntry};
use crate::progress::ProgressReporter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// A file that could not be copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFailure {
    /// Source file path
    pub source: String,
    /// Destination folder the copy was aimed at
    pub destination: String,
    /// Failure cause
    pub error: String,
}

/// Tally of a sort run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortSummary {
    /// Regular files discovered
    pub files_found: u64,
    /// Files copied successfully
    pub files_copied: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Copied files per extension folder ("" is the destination root)
    pub extensions: BTreeMap<String, u64>,
    /// Files that failed to copy
    pub failures: Vec<CopyFailure>,
    /// Entries skipped because they could not be read during the scan
    pub scan_errors: Vec<String>,
    /// Total duration
    pub duration: Duration,
}

impl SortSummary {
    /// Check if every discovered file was copied and the scan was clean
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.scan_errors.is_empty()
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Sort Summary ===");
        println!("Files found:     {}", self.files_found);
        println!("Files copied:    {}", self.files_copied);
        println!("Bytes copied:    {}", humansize::format_size(self.bytes_copied, humansize::BINARY));
        println!("Duration:        {:.2?}", self.duration);

        if !self.extensions.is_empty() {
            println!("\nFolders:");
            for (ext, count) in &self.extensions {
                let label = if ext.is_empty() { "(root)" } else { ext.as_str() };
                println!("  {:<14} {}", label, count);
            }
        }

        if !self.failures.is_empty() {
            println!("\nFailures: {}", self.failures.len());
            for failure in &self.failures {
                println!("  {} -> {} - {}", failure.source, failure.destination, failure.error);
            }
        }

        if !self.scan_errors.is_empty() {
            println!("\nSkipped during scan: {}", self.scan_errors.len());
            for error in &self.scan_errors {
                println!("  {}", error);
            }
        }
    }

    /// Render the summary as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn record(&mut self, outcome: FileOutcome) {
        match outcome.result {
            Ok(bytes) => {
                self.files_copied += 1;
                self.bytes_copied += bytes;
                *self.extensions.entry(outcome.bucket).or_insert(0) += 1;
            }
            Err(error) => self.failures.push(CopyFailure {
                source: outcome.source.display().to_string(),
                destination: outcome.subdir.display().to_string(),
                error,
            }),
        }
    }
}

/// What one copy task reports back
#[derive(Debug)]
struct FileOutcome {
    source: PathBuf,
    subdir: PathBuf,
    bucket: String,
    result: std::result::Result<u64, String>,
}

/// Main sort engine
pub struct SortEngine {
    /// Configuration
    config: SortConfig,
    /// Progress reporter
    progress: Option<Arc<ProgressReporter>>,
}

impl SortEngine {
    /// Create a new sort engine
    pub fn new(config: SortConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Execute the sort
    ///
    /// Only a missing or unreadable source root is an error here. Per-file
    /// failures are reported through the returned summary.
    pub async fn execute(&self) -> Result<SortSummary> {
        let start_time = Instant::now();

        if let Some(progress) = &self.progress {
            progress.set_status("Scanning source directory...");
        }

        let scan_result = self.scan_source().await?;
        tracing::debug!(
            "Scanned {} in {:.2?}: {} files, {} skipped",
            scan_result.root.display(),
            scan_result.scan_duration,
            scan_result.file_count(),
            scan_result.errors.len()
        );

        if let Some(progress) = &self.progress {
            progress.set_total_files(scan_result.file_count() as u64);
            progress.set_status("Copying files...");
        }

        let mut summary = SortSummary {
            files_found: scan_result.file_count() as u64,
            scan_errors: scan_result.errors,
            ..Default::default()
        };

        let limit = self.config.effective_concurrency();
        tracing::debug!("Copying {} files with up to {} in flight", summary.files_found, limit);

        let semaphore = Arc::new(Semaphore::new(limit));
        let dest_root: Arc<Path> = Arc::from(self.config.destination.as_path());
        let no_ext: Option<Arc<str>> = self.config.no_extension_dir.as_deref().map(Arc::from);

        let mut handles: Vec<(PathBuf, JoinHandle<FileOutcome>)> = Vec::with_capacity(scan_result.files.len());

        for entry in scan_result.files {
            let semaphore = Arc::clone(&semaphore);
            let dest_root = Arc::clone(&dest_root);
            let no_ext = no_ext.clone();
            let progress = self.progress.clone();
            let source = entry.path.clone();

            handles.push((
                source,
                tokio::spawn(async move {
                    let outcome = copy_one(&entry, &semaphore, &dest_root, no_ext.as_deref()).await;

                    if let Some(progress) = progress {
                        progress.file_done(&entry.file_name(), outcome.result.is_ok());
                    }

                    outcome
                }),
            ));
        }

        for (source, handle) in handles {
            match handle.await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    tracing::error!("Copy task for {} did not finish: {}", source.display(), e);
                    let subdir = classify_with(&source, &self.config.destination, self.config.no_extension_dir.as_deref()).subdir;
                    summary.failures.push(CopyFailure {
                        source: source.display().to_string(),
                        destination: subdir.display().to_string(),
                        error: SortError::TaskFailed(e.to_string()).to_string(),
                    });
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        summary.duration = start_time.elapsed();
        Ok(summary)
    }

    /// Scan the source root on a blocking thread
    async fn scan_source(&self) -> Result<ScanResult> {
        let source = self.config.source.clone();
        tokio::task::spawn_blocking(move || scan(&source))
            .await
            .map_err(|e| SortError::TaskFailed(format!("scan: {}", e)))?
    }
}

/// Copy a single file into its extension folder and log the outcome.
///
/// The copy runs while holding one permit from `semaphore`.
async fn copy_one(
    entry: &SourceEntry,
    semaphore: &Semaphore,
    dest_root: &Path,
    no_ext: Option<&str>,
) -> FileOutcome {
    let spec = classify_with(&entry.path, dest_root, no_ext);
    let bucket = bucket_name(&spec, dest_root);

    let placed = match semaphore.acquire().await {
        Ok(_permit) => place(entry, &spec).await,
        Err(e) => Err(SortError::TaskFailed(format!("Semaphore error: {}", e))),
    };

    let result = match placed {
        Ok(bytes) => {
            tracing::info!("File {} copied to {}", entry.file_name(), spec.subdir.display());
            Ok(bytes)
        }
        Err(e) => {
            tracing::error!(
                "Copying error of {} to {}: {}",
                entry.path.display(),
                spec.subdir.display(),
                e
            );
            Err(e.to_string())
        }
    };

    FileOutcome {
        source: entry.path.clone(),
        subdir: spec.subdir,
        bucket,
        result,
    }
}

async fn place(entry: &SourceEntry, spec: &DestinationSpec) -> Result<u64> {
    ensure_dir(&spec.subdir).await?;
    copy_file(&entry.path, &spec.path()).await
}

/// Folder name relative to the destination root
fn bucket_name(spec: &DestinationSpec, dest_root: &Path) -> String {
    spec.subdir
        .strip_prefix(dest_root)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sort `source` into `dest` with default settings on a fresh runtime
pub fn sort_tree(source: &Path, dest: &Path) -> Result<SortSummary> {
    let config = SortConfig {
        source: source.to_path_buf(),
        destination: dest.to_path_buf(),
        ..Default::default()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| SortError::Runtime(e.to_string()))?;

    runtime.block_on(SortEngine::new(config).execute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_structure(dir: &Path) {
        std::fs::create_dir_all(dir.join("photos")).unwrap();
        std::fs::create_dir_all(dir.join("a/b/c")).unwrap();

        File::create(dir.join("notes.txt")).unwrap()
            .write_all(b"notes").unwrap();
        File::create(dir.join("photos/Photo.JPG")).unwrap()
            .write_all(b"jpeg bytes").unwrap();
        File::create(dir.join("photos/other.jpg")).unwrap()
            .write_all(b"more jpeg").unwrap();
        File::create(dir.join("a/b/c/deep.md")).unwrap()
            .write_all(b"# deep").unwrap();
        File::create(dir.join("README")).unwrap()
            .write_all(b"readme").unwrap();
    }

    fn config_for(src: &Path, dst: &Path) -> SortConfig {
        SortConfig {
            source: src.to_path_buf(),
            destination: dst.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sorts_by_extension() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let summary = SortEngine::new(config_for(src.path(), dst.path())).execute().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.files_found, 5);
        assert_eq!(summary.files_copied, 5);
        assert_eq!(summary.bytes_copied, 5 + 10 + 9 + 6 + 6);

        assert_eq!(std::fs::read(dst.path().join("txt/notes.txt")).unwrap(), b"notes");
        assert_eq!(std::fs::read(dst.path().join("jpg/Photo.JPG")).unwrap(), b"jpeg bytes");
        assert!(dst.path().join("jpg/other.jpg").is_file());
        assert_eq!(summary.extensions.get("jpg"), Some(&2));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_nested_files_flatten() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        SortEngine::new(config_for(src.path(), dst.path())).execute().await.unwrap();

        assert_eq!(std::fs::read(dst.path().join("md/deep.md")).unwrap(), b"# deep");
        assert!(!dst.path().join("a").exists());
        assert!(!dst.path().join("photos").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_no_extension_goes_to_root() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let summary = SortEngine::new(config_for(src.path(), dst.path())).execute().await.unwrap();

        assert_eq!(std::fs::read(dst.path().join("README")).unwrap(), b"readme");
        assert_eq!(summary.extensions.get(""), Some(&1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_no_extension_bucket() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let config = SortConfig {
            no_extension_dir: Some("no_ext".to_string()),
            ..config_for(src.path(), dst.path())
        };
        let summary = SortEngine::new(config).execute().await.unwrap();

        assert!(dst.path().join("no_ext/README").is_file());
        assert!(!dst.path().join("README").exists());
        assert_eq!(summary.extensions.get("no_ext"), Some(&1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failure_is_isolated() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());
        File::create(src.path().join("photos/second.txt")).unwrap()
            .write_all(b"second").unwrap();

        // A file squatting on the txt folder breaks every .txt copy
        std::fs::write(dst.path().join("txt"), b"squatter").unwrap();

        let summary = SortEngine::new(config_for(src.path(), dst.path())).execute().await.unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.files_found, 6);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.files_copied, 4);
        assert!(summary.failures.iter().all(|f| f.destination.ends_with("txt")));
        assert!(summary.failures.iter().any(|f| f.source.ends_with("notes.txt")));

        assert!(dst.path().join("jpg/Photo.JPG").is_file());
        assert!(dst.path().join("md/deep.md").is_file());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rerun_overwrites() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let engine = SortEngine::new(config_for(src.path(), dst.path()));
        engine.execute().await.unwrap();

        std::fs::write(src.path().join("notes.txt"), b"updated notes").unwrap();
        let summary = engine.execute().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(std::fs::read(dst.path().join("txt/notes.txt")).unwrap(), b"updated notes");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_single_permit() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        for i in 0..20 {
            std::fs::write(src.path().join(format!("file_{}.DAT", i)), format!("{}", i)).unwrap();
        }

        let config = SortConfig {
            max_concurrent: 1,
            ..config_for(src.path(), dst.path())
        };
        let summary = SortEngine::new(config).execute().await.unwrap();

        assert_eq!(summary.files_copied, 20);
        assert_eq!(std::fs::read_dir(dst.path().join("dat")).unwrap().count(), 20);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_source_is_fatal() {
        let dst = TempDir::new().unwrap();
        let missing = dst.path().join("does-not-exist");

        let result = SortEngine::new(config_for(&missing, dst.path())).execute().await;
        assert!(matches!(result, Err(SortError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_source() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let summary = SortEngine::new(config_for(src.path(), dst.path())).execute().await.unwrap();
        assert_eq!(summary.files_found, 0);
        assert!(summary.is_success());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_with_disabled_progress() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let engine = SortEngine::new(config_for(src.path(), dst.path()))
            .with_progress(ProgressReporter::disabled());
        let summary = engine.execute().await.unwrap();
        assert_eq!(summary.files_copied, 5);
    }

    #[test]
    fn test_sort_tree() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let summary = sort_tree(src.path(), dst.path()).unwrap();
        assert_eq!(summary.files_copied, 5);
        assert!(dst.path().join("md/deep.md").is_file());
    }

    #[test]
    fn test_summary_json() {
        let mut summary = SortSummary::default();
        summary.record(FileOutcome {
            source: PathBuf::from("/src/a.txt"),
            subdir: PathBuf::from("/out/txt"),
            bucket: "txt".to_string(),
            result: Ok(3),
        });
        summary.record(FileOutcome {
            source: PathBuf::from("/src/b.txt"),
            subdir: PathBuf::from("/out/txt"),
            bucket: "txt".to_string(),
            result: Err("denied".to_string()),
        });

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["files_copied"], 1);
        assert_eq!(json["bytes_copied"], 3);
        assert_eq!(json["extensions"]["txt"], 1);
        assert_eq!(json["failures"][0]["source"], "/src/b.txt");
        assert_eq!(json["failures"][0]["error"], "denied");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_destination_inside_source_keeps_copies() {
        let src = TempDir::new().unwrap();
        std::fs::write(src.path().join("a.txt"), b"payload").unwrap();
        let config = config_for(src.path(), &src.path().join("sorted"));

        let first = SortEngine::new(config.clone()).execute().await.unwrap();
        assert_eq!(first.files_copied, 1);

        // The second scan finds the earlier copy, which maps onto itself
        std::fs::remove_file(src.path().join("a.txt")).unwrap();
        let second = SortEngine::new(config).execute().await.unwrap();

        assert_eq!(second.files_found, 1);
        assert_eq!(second.files_copied, 0);
        assert_eq!(second.failures.len(), 1);
        assert!(second.failures[0].source.ends_with("a.txt"));
        assert_eq!(std::fs::read(src.path().join("sorted/txt/a.txt")).unwrap(), b"payload");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_huge_job_count() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_test_structure(src.path());

        let config = SortConfig {
            max_concurrent: usize::MAX,
            ..config_for(src.path(), dst.path())
        };
        let summary = SortEngine::new(config).execute().await.unwrap();
        assert_eq!(summary.files_copied, 5);
    }

    #[tokio::test]
    async fn test_closed_semaphore_is_a_file_failure() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let path = src.path().join("notes.TXT");
        std::fs::write(&path, b"notes").unwrap();
        let entry = SourceEntry { path, size: 5 };

        let semaphore = Semaphore::new(1);
        semaphore.close();

        let outcome = copy_one(&entry, &semaphore, dst.path(), None).await;
        let error = outcome.result.unwrap_err();
        assert!(error.contains("Semaphore error"));
        assert_eq!(outcome.subdir, dst.path().join("txt"));
        assert!(!dst.path().join("txt").exists());
    }
}
