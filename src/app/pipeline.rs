//! Shared estimation pipeline used by the `predict`, `fit` and `apply` commands.
//!
//! load training data -> solve weights -> diagnostics -> load query data -> predict
//!
//! Everything here returns data; printing and file exports live in `app`.

use std::path::Path;

use crate::domain::{EstimateConfig, QuerySet, TrainingSet, WeightsFile};
use crate::error::AppError;
use crate::io::ingest::{ensure_feature_count, load_query, load_training};
use crate::io::weights::{read_weights_json, weights_file};
use crate::math::{estimate, fit_stats, solve_weights, FitStats, Matrix, Pivoting};

/// Solved model for one training set.
#[derive(Debug, Clone)]
pub struct FitOutput {
    pub training: TrainingSet,
    pub weights: Matrix,
    pub stats: FitStats,
    pub pivoting: Pivoting,
}

impl FitOutput {
    pub fn weights_file(&self) -> WeightsFile {
        weights_file(&self.training, &self.weights, self.pivoting, Some(&self.stats))
    }
}

/// Predictions for one query set.
#[derive(Debug, Clone)]
pub struct PredictOutput {
    pub query: QuerySet,
    pub predictions: Matrix,
}

/// Load the training file and solve for the weights.
pub fn run_fit(config: &EstimateConfig) -> Result<FitOutput, AppError> {
    let training = load_training(&config.train_path)?;
    fit_training(training, config.pivoting)
}

/// Solve an already-loaded training set.
pub fn fit_training(training: TrainingSet, pivoting: Pivoting) -> Result<FitOutput, AppError> {
    let weights = solve_weights(&training.x, &training.y, pivoting)?;
    let stats = fit_stats(&training.x, &training.y, &weights)?;
    Ok(FitOutput {
        training,
        weights,
        stats,
        pivoting,
    })
}

/// Full `predict` run: fit on the training file, then score the query file.
pub fn run_predict(config: &EstimateConfig) -> Result<(FitOutput, PredictOutput), AppError> {
    let data_path = config
        .data_path
        .as_deref()
        .ok_or_else(|| AppError::input_unavailable("A query file is required."))?;

    let fit = run_fit(config)?;
    let query = load_query(data_path, fit.training.features)?;
    let prediction = predict_query(&fit.weights, query)?;
    Ok((fit, prediction))
}

/// `apply` run: score a query file with weights loaded from JSON.
pub fn run_apply(weights_path: &Path, data_path: &Path) -> Result<(WeightsFile, PredictOutput), AppError> {
    let (model, weights) = read_weights_json(weights_path)?;
    let query = load_query(data_path, model.features)?;
    let prediction = predict_query(&weights, query)?;
    Ok((model, prediction))
}

/// Multiply a query design matrix by the weight column.
pub fn predict_query(weights: &Matrix, query: QuerySet) -> Result<PredictOutput, AppError> {
    ensure_feature_count(&query, weights.nrows().saturating_sub(1), "query")?;
    let predictions = estimate(weights, &query.x)?;
    Ok(PredictOutput { query, predictions })
}
