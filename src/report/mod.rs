//! Reporting: prediction listings and fit summaries.

pub mod format;

pub use format::*;
