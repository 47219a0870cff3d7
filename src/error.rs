//! Application-level error carrying the process exit code.
//!
//! Exit codes:
//! - `2`: input unavailable (missing argument, file cannot be opened or created)
//! - `3`: malformed input (bad header, missing/non-numeric field, feature-count mismatch)
//! - `4`: singular normal matrix
//! - `5`: internal shape invariant violated

use crate::math::LinalgError;

pub const EXIT_INPUT_UNAVAILABLE: u8 = 2;
pub const EXIT_MALFORMED_INPUT: u8 = 3;
pub const EXIT_SINGULAR: u8 = 4;
pub const EXIT_INTERNAL: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input_unavailable(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT_UNAVAILABLE, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(EXIT_MALFORMED_INPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<LinalgError> for AppError {
    fn from(err: LinalgError) -> Self {
        match err {
            LinalgError::SingularMatrix { .. } => Self::new(
                EXIT_SINGULAR,
                format!("Cannot solve the normal equations: {err}. Check for duplicated or constant feature columns, or too few training rows."),
            ),
            LinalgError::DimensionMismatch { .. }
            | LinalgError::NotSquare { .. }
            | LinalgError::ShapeMismatch { .. } => {
                Self::new(EXIT_INTERNAL, format!("Internal error: {err}"))
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linalg_errors_map_to_exit_codes() {
        let singular: AppError = LinalgError::SingularMatrix { row: 1, pivot: 0.0 }.into();
        assert_eq!(singular.exit_code(), EXIT_SINGULAR);
        assert!(singular.message().contains("singular"));

        let shape: AppError = LinalgError::DimensionMismatch {
            lhs_rows: 1,
            lhs_cols: 2,
            rhs_rows: 3,
            rhs_cols: 1,
        }
        .into();
        assert_eq!(shape.exit_code(), EXIT_INTERNAL);
    }
}
