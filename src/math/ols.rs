//! Ordinary least squares via the normal equations.
//!
//! ```text
//! W = (XᵗX)⁻¹ Xᵗ Y
//! ```
//!
//! `X` is the `n x (k+1)` design matrix (column 0 fixed to 1.0), `Y` the
//! `n x 1` target column and `W` the `(k+1) x 1` weight column. The solve is
//! five chained primitive steps; each intermediate is dropped as soon as the
//! next step has consumed it.

use log::{debug, warn};
use nalgebra::DMatrix;

use crate::math::error::LinalgError;
use crate::math::inverse::Pivoting;
use crate::math::matrix::Matrix;

/// Condition numbers above this are logged as a warning.
pub const ILL_CONDITIONED: f64 = 1e10;

/// Solve the normal equations for the regression weights.
///
/// Returns a `cols x 1` matrix. When `rows < cols` the normal matrix has rank at
/// most `rows` and is reported as singular without running elimination.
pub fn solve_weights(x: &Matrix, y: &Matrix, pivoting: Pivoting) -> Result<Matrix, LinalgError> {
    let (rows, cols) = x.shape();
    if rows < cols {
        return Err(LinalgError::SingularMatrix {
            row: rows,
            pivot: 0.0,
        });
    }

    let xt = x.transpose();
    debug!("Xᵗ: {}x{}", xt.nrows(), xt.ncols());

    let xtx = xt.multiply(x)?;
    debug!("XᵗX: {}x{}", xtx.nrows(), xtx.ncols());

    // `into_inverse` consumes XᵗX; its storage becomes the elimination scratch.
    let xtx_inv = xtx.into_inverse(pivoting)?;

    let projector = xtx_inv.multiply(&xt)?;
    drop(xtx_inv);
    drop(xt);
    debug!("(XᵗX)⁻¹Xᵗ: {}x{}", projector.nrows(), projector.ncols());

    let weights = projector.multiply(y)?;
    debug!("W: {}x{}", weights.nrows(), weights.ncols());
    Ok(weights)
}

/// Predictions for a query design matrix: `queryX * W`, one row per query.
pub fn estimate(weights: &Matrix, query: &Matrix) -> Result<Matrix, LinalgError> {
    query.multiply(weights)
}

/// In-sample fit statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitStats {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    /// Coefficient of determination; `None` when the targets have zero variance.
    pub r_squared: Option<f64>,
    /// `σ_max / σ_min` of the design matrix; `None` if it is rank deficient or empty.
    pub condition_number: Option<f64>,
}

/// Evaluate a solved model on its own training data.
pub fn fit_stats(x: &Matrix, y: &Matrix, weights: &Matrix) -> Result<FitStats, LinalgError> {
    let fitted = estimate(weights, x)?;
    let n = y.nrows();

    let sse: f64 = y
        .column(0)
        .zip(fitted.column(0))
        .map(|(obs, fit)| (obs - fit).powi(2))
        .sum();
    let rmse = if n > 0 { (sse / n as f64).sqrt() } else { 0.0 };

    let mean = if n > 0 { y.column(0).sum::<f64>() / n as f64 } else { 0.0 };
    let sst: f64 = y.column(0).map(|v| (v - mean).powi(2)).sum();
    let r_squared = (sst > 0.0).then(|| 1.0 - sse / sst);

    let condition_number = condition_number(x);
    if let Some(cond) = condition_number {
        if cond > ILL_CONDITIONED {
            warn!("design matrix is ill-conditioned (condition number {cond:.3e}); weights may be inaccurate");
        }
    }

    Ok(FitStats {
        n,
        sse,
        rmse,
        r_squared,
        condition_number,
    })
}

/// 2-norm condition number of `m` from its singular values.
pub fn condition_number(m: &Matrix) -> Option<f64> {
    if m.nrows() == 0 || m.ncols() == 0 {
        return None;
    }
    let svd = DMatrix::from(m).svd(false, false);
    let max = svd.singular_values.max();
    let min = svd.singular_values.min();
    (min > 0.0 && max.is_finite()).then(|| max / min)
}
