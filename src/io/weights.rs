//! Read/write weights JSON files.
//!
//! A weights file is the portable form of a solved model: the feature count,
//! the weight column (bias first) and optional training diagnostics. `apply`
//! reloads it to score new query files without the training data.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitQuality, TrainingSet, WeightsFile};
use crate::error::AppError;
use crate::math::{FitStats, Matrix, Pivoting};

/// Tool tag stored in every weights file.
pub const TOOL: &str = "estimate";

/// Assemble the serializable model from a solve.
pub fn weights_file(
    training: &TrainingSet,
    weights: &Matrix,
    pivoting: Pivoting,
    stats: Option<&FitStats>,
) -> WeightsFile {
    WeightsFile {
        tool: TOOL.to_string(),
        features: training.features,
        rows: training.rows(),
        pivoting,
        weights: weights.column(0).collect(),
        quality: stats.map(FitQuality::from),
    }
}

/// Write a weights JSON file.
pub fn write_weights_json(path: &Path, model: &WeightsFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input_unavailable(format!("Failed to create weights JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, model)
        .map_err(|e| AppError::input_unavailable(format!("Failed to write weights JSON: {e}")))?;
    Ok(())
}

/// Read a weights JSON file and return it with its weight column.
pub fn read_weights_json(path: &Path) -> Result<(WeightsFile, Matrix), AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input_unavailable(format!("Failed to open weights JSON '{}': {e}", path.display()))
    })?;
    let model: WeightsFile = serde_json::from_reader(file)
        .map_err(|e| AppError::malformed(format!("Invalid weights JSON '{}': {e}", path.display())))?;
    let column = weights_column(&model)?;
    Ok((model, column))
}

/// Validate a deserialized model and turn it into a `(k+1) x 1` matrix.
pub fn weights_column(model: &WeightsFile) -> Result<Matrix, AppError> {
    if model.weights.len() != model.features + 1 {
        return Err(AppError::malformed(format!(
            "Weights file declares {} features but holds {} weights (expected {}).",
            model.features,
            model.weights.len(),
            model.features + 1
        )));
    }
    if let Some(bad) = model.weights.iter().find(|w| !w.is_finite()) {
        return Err(AppError::malformed(format!("Weights file holds a non-finite weight ({bad}).")));
    }
    Ok(Matrix::from_row_slice(model.weights.len(), 1, &model.weights)?)
}
