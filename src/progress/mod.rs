//! Progress reporting module
//!
//! Optional terminal progress display for sort runs.

mod reporter;

pub use reporter::*;
