//! Domain types used throughout the pipeline.
//!
//! - loaded data sets (`TrainingSet`, `QuerySet`)
//! - run configuration (`EstimateConfig`, `SampleConfig`)
//! - the exported model (`WeightsFile`, `FitQuality`)

pub mod types;

pub use types::*;
