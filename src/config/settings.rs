//! Configuration settings for ExtSort
//!
//! Defines CLI arguments, runtime configuration, and defaults
//! for a sort run.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Semaphore;

/// ExtSort - copy a directory tree into per-extension folders
#[derive(Parser, Debug, Clone)]
#[command(name = "extsort")]
#[command(author = "ExtSort Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrently copy and organise files from a source folder into per-extension folders")]
#[command(long_about = r#"
ExtSort scans SOURCE recursively and copies every regular file into
DESTINATION/<extension>/<file name>. Extensions are lowercased and stored
without the leading dot. Files are copied concurrently; a failure on one file
is logged and never stops the others.

Examples:
  extsort ~/Downloads ~/Sorted                 # Basic sort
  extsort ./src ./out --jobs 8 --progress      # Bounded concurrency with progress
  extsort ./src ./out --no-ext-dir no_ext      # Bucket files without an extension
"#)]
pub struct CliArgs {
    /// Source folder
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output folder
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Maximum number of files copied at once (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0", value_name = "NUM", env = "EXTSORT_JOBS")]
    pub jobs: usize,

    /// Folder name for files without an extension (default: destination root)
    #[arg(long, value_name = "NAME")]
    pub no_ext_dir: Option<String>,

    /// Show a progress bar
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged, no summary)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Output format for the final summary
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

impl CliArgs {
    /// Default log directive for the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Source root
    pub source: PathBuf,
    /// Destination root
    pub destination: PathBuf,
    /// Concurrency limit (0 = auto-detect)
    pub max_concurrent: usize,
    /// Bucket for files without an extension
    pub no_extension_dir: Option<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            max_concurrent: 0, // Auto-detect
            no_extension_dir: None,
        }
    }
}

impl SortConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        if let Some(name) = &args.no_ext_dir {
            validate_bucket_name(name)?;
        }

        Ok(Self {
            source: args.source.clone(),
            destination: args.destination.clone(),
            max_concurrent: args.jobs,
            no_extension_dir: args.no_ext_dir.clone(),
        })
    }

    /// Number of copy permits, resolving 0 to a CPU-derived limit.
    ///
    /// Capped at the most permits a tokio semaphore can hold.
    pub fn effective_concurrency(&self) -> usize {
        let limit = if self.max_concurrent == 0 {
            // Copies are I/O bound, so oversubscribe the cores
            (num_cpus::get() * 4).max(1)
        } else {
            self.max_concurrent
        };
        limit.min(Semaphore::MAX_PERMITS)
    }
}

/// A bucket name must be a single, non-empty path component
fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(format!("Invalid folder name for extension-less files: '{}'", name));
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(format!("Folder name must not contain a path separator: '{}'", name));
    }
    Ok(())
}
