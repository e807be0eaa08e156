//! File system module
//!
//! Destination classification, source tree scanning, and the async
//! primitives each copy task runs.

mod classify;
mod operations;
mod scanner;

pub use classify::*;
pub use operations::*;
pub use scanner::*;
