//! Progress reporter implementation
//!
//! Uses indicatif for a file-count bar with throughput, plus a status line
//! showing the most recently finished file.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Progress reporter for sort runs
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// File count progress bar
    files_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
    /// Files finished so far (copied or failed)
    files_done: AtomicU64,
    /// Files that failed
    files_failed: AtomicU64,
    /// Is progress enabled
    enabled: AtomicBool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );

        let files_bar = multi.add(ProgressBar::new(0));
        files_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} files ({per_sec}, ETA {eta})")
                .expect("Invalid template")
                .progress_chars("=> "),
        );
        files_bar.set_prefix("Files");

        Self {
            multi,
            files_bar,
            status,
            files_done: AtomicU64::new(0),
            files_failed: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a disabled progress reporter (for quiet mode)
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.enabled.store(false, Ordering::SeqCst);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total files to process
    pub fn set_total_files(&self, total: u64) {
        self.files_bar.set_length(total);
    }

    /// Record a finished file
    pub fn file_done(&self, name: &str, ok: bool) {
        self.files_done.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.files_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.files_bar.inc(1);
        self.set_current_file(name);
    }

    /// Set current status message
    pub fn set_status(&self, msg: &str) {
        self.status.set_message(msg.to_string());
    }

    fn set_current_file(&self, name: &str) {
        let display = if name.chars().count() > 60 {
            let tail: String = name.chars().rev().take(57).collect::<Vec<_>>().into_iter().rev().collect();
            format!("...{}", tail)
        } else {
            name.to_string()
        };
        self.status.set_message(display);
    }

    /// Files finished so far
    pub fn files_done(&self) -> u64 {
        self.files_done.load(Ordering::Relaxed)
    }

    /// Files that failed so far
    pub fn files_failed(&self) -> u64 {
        self.files_failed.load(Ordering::Relaxed)
    }

    /// Finish progress, reporting failures if any
    pub fn finish(&self) {
        let failed = self.files_failed();
        if failed == 0 {
            self.status.finish_with_message(format!("✓ {} files sorted", self.files_done()));
            self.files_bar.finish();
        } else {
            self.status.finish_with_message(format!("✗ {} of {} files failed", failed, self.files_done()));
            self.files_bar.abandon();
        }
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
