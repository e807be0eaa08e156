//! Core sort engine module
//!
//! Provides the scan-then-copy orchestration and the run summary.

mod sorter;

pub use sorter::*;
