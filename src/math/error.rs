//! Errors raised by the dense linear-algebra primitives.

use thiserror::Error;

/// Failure modes of the matrix primitives and the normal-equation solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    /// `A * B` was requested with `A.cols != B.rows`.
    #[error(
        "matrix dimensions are not compatible for multiplication: {lhs_rows}x{lhs_cols} * {rhs_rows}x{rhs_cols}"
    )]
    DimensionMismatch {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    /// Inversion was requested for a non-square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Backing data does not match the declared shape (or rows are ragged).
    #[error("matrix data does not match its shape: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A pivot vanished during Gauss-Jordan elimination.
    #[error("matrix is singular: pivot {pivot:e} in row {row} is below tolerance")]
    SingularMatrix { row: usize, pivot: f64 },
}
