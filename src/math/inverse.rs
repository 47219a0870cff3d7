//! Gauss-Jordan matrix inversion.
//!
//! The default strategy is the plain algorithm: eliminate every off-diagonal
//! entry column by column using the diagonal as pivot, then normalise each row
//! by its surviving diagonal value. No rows are exchanged, so a zero leading
//! pivot is fatal even for a well-conditioned matrix. `Pivoting::Partial` is an
//! opt-in variant that swaps in the row with the largest candidate pivot first.
//!
//! Every pivot is checked against `PIVOT_TOLERANCE` times the largest entry of
//! its own row in the input matrix, so columns on very different scales (a bias
//! next to a feature around 1e7) do not mask each other. A vanishing pivot is
//! reported as [`LinalgError::SingularMatrix`] instead of dividing.

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::math::error::LinalgError;
use crate::math::matrix::Matrix;

/// Threshold, relative to the largest entry of the pivot's original row, below
/// which a pivot is treated as zero.
pub const PIVOT_TOLERANCE: f64 = 16.0 * f64::EPSILON;

/// Row-exchange strategy used during elimination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pivoting {
    /// Use the diagonal as-is.
    #[default]
    None,
    /// Swap in the row with the largest `|a[p][k]|`, `p >= k`, before eliminating column `k`.
    Partial,
}

impl Matrix {
    /// Inverse of a square matrix using plain Gauss-Jordan elimination.
    ///
    /// `self` is left untouched; elimination runs on a private copy.
    pub fn invert(&self) -> Result<Matrix, LinalgError> {
        self.invert_with(Pivoting::None)
    }

    /// Inverse using the given pivoting strategy.
    pub fn invert_with(&self, pivoting: Pivoting) -> Result<Matrix, LinalgError> {
        self.clone().into_inverse(pivoting)
    }

    /// Consume the matrix and return its inverse, reusing it as the working copy.
    pub fn into_inverse(self, pivoting: Pivoting) -> Result<Matrix, LinalgError> {
        gauss_jordan(self, pivoting)
    }
}

/// Free-function form of [`Matrix::invert_with`].
pub fn invert(m: &Matrix, pivoting: Pivoting) -> Result<Matrix, LinalgError> {
    m.invert_with(pivoting)
}

fn gauss_jordan(mut work: Matrix, pivoting: Pivoting) -> Result<Matrix, LinalgError> {
    let (rows, cols) = work.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    let order = rows;
    let mut inverse = Matrix::identity(order);

    // Row scales travel with their rows when partial pivoting swaps them.
    let mut row_scale = work.row_max_abs();
    let check = |row: usize, pivot: f64, scale: f64| -> Result<(), LinalgError> {
        // NaN compares false with everything, so test for "acceptable" explicitly.
        if scale > 0.0 && pivot.abs() > PIVOT_TOLERANCE * scale {
            Ok(())
        } else {
            Err(LinalgError::SingularMatrix { row, pivot })
        }
    };

    for k in 0..order {
        if pivoting == Pivoting::Partial {
            let best = (k..order)
                .max_by(|&a, &b| work[(a, k)].abs().total_cmp(&work[(b, k)].abs()))
                .unwrap_or(k);
            if best != k {
                debug!("pivot column {k}: swapping rows {k} and {best}");
                work.swap_rows(k, best);
                inverse.swap_rows(k, best);
                row_scale.swap(k, best);
            }
        }

        let pivot = work[(k, k)];
        check(k, pivot, row_scale[k])?;

        for i in 0..order {
            if i == k {
                continue;
            }
            let factor = work[(i, k)] / pivot;
            for j in 0..order {
                work[(i, j)] -= factor * work[(k, j)];
                inverse[(i, j)] -= factor * inverse[(k, j)];
            }
        }
    }

    for i in 0..order {
        let divisor = work[(i, i)];
        check(i, divisor, row_scale[i])?;
        for j in 0..order {
            work[(i, j)] /= divisor;
            inverse[(i, j)] /= divisor;
        }
    }

    Ok(inverse)
}
