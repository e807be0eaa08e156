//! ExtSort CLI - Concurrent File Organizer
//!
//! Copies every file under SOURCE into DESTINATION/<extension>/.

use clap::Parser;
use extsort::config::{CliArgs, OutputFormat, SortConfig};
use extsort::core::SortEngine;
use extsort::error::{Result, SortError};
use extsort::progress::ProgressReporter;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG takes precedence over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Per-file failures are reported in the summary, not the exit code
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = SortConfig::from_cli(&args).map_err(SortError::config)?;

    if args.verbose > 0 {
        print_config(&config);
    }

    let progress = if args.progress && !args.quiet {
        ProgressReporter::new()
    } else {
        ProgressReporter::disabled()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| SortError::Runtime(format!("Failed to create runtime: {}", e)))?;

    let engine = SortEngine::new(config).with_progress(progress);
    let summary = runtime.block_on(engine.execute())?;

    if !args.quiet {
        match args.output_format {
            OutputFormat::Text => summary.print_summary(),
            OutputFormat::Json => println!("{}", summary.to_json()?),
        }
    }

    Ok(())
}

fn print_config(config: &SortConfig) {
    println!("=== Configuration ===");
    println!("Source:      {:?}", config.source);
    println!("Destination: {:?}", config.destination);
    println!("Jobs:        {}", config.effective_concurrency());
    println!(
        "No-ext dir:  {}",
        config.no_extension_dir.as_deref().unwrap_or("(destination root)")
    );
    println!();
}
