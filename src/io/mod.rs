//! Input/output helpers.
//!
//! - training/query file loaders (`ingest`)
//! - predictions CSV export (`export`)
//! - weights JSON read/write (`weights`)

pub mod export;
pub mod ingest;
pub mod weights;

pub use export::*;
pub use ingest::*;
pub use weights::*;
