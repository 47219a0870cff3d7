//! Shared domain types.
//!
//! Loaded data sets carry their own dimensions, so nothing downstream needs
//! separate `n` / `k` / `m` counters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::math::{FitStats, Matrix, Pivoting};

/// Training data: `n x (k+1)` design matrix and `n x 1` targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    /// Number of observed features `k` (excluding the bias column).
    pub features: usize,
    pub x: Matrix,
    pub y: Matrix,
}

impl TrainingSet {
    /// Number of training examples `n`.
    pub fn rows(&self) -> usize {
        self.x.nrows()
    }
}

/// Query data: `m x (k+1)` design matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySet {
    pub features: usize,
    pub x: Matrix,
}

impl QuerySet {
    /// Number of query examples `m`.
    pub fn rows(&self) -> usize {
        self.x.nrows()
    }
}

/// Portable representation of a solved model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsFile {
    pub tool: String,
    /// Feature count `k`; `weights` has `k + 1` entries.
    pub features: usize,
    /// Number of training rows the weights were solved from.
    pub rows: usize,
    pub pivoting: Pivoting,
    /// Bias first, then one coefficient per feature.
    pub weights: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<FitQuality>,
}

/// Serializable training-set diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: Option<f64>,
    pub condition_number: Option<f64>,
}

impl From<&FitStats> for FitQuality {
    fn from(s: &FitStats) -> Self {
        Self {
            n: s.n,
            sse: s.sse,
            rmse: s.rmse,
            r_squared: s.r_squared,
            condition_number: s.condition_number,
        }
    }
}

/// Resolved settings for `predict` / `fit` runs.
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub train_path: PathBuf,
    /// Query file; `None` for `fit` (summary only).
    pub data_path: Option<PathBuf>,
    pub pivoting: Pivoting,
    /// Decimal places for printed predictions (0 rounds to the nearest integer).
    pub precision: usize,
    pub summary: bool,
    pub export: Option<PathBuf>,
    pub export_weights: Option<PathBuf>,
}

/// Resolved settings for synthetic data generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub features: usize,
    pub rows: usize,
    pub queries: usize,
    /// `features + 1` coefficients (bias first); `None` means `1, 2, ..., k+1`.
    pub coefficients: Option<Vec<f64>>,
    /// Standard deviation of the additive Gaussian noise on targets.
    pub noise: f64,
    pub seed: u64,
    pub train_path: PathBuf,
    pub data_path: PathBuf,
}
