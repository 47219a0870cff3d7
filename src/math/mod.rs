//! Dense linear algebra: matrix primitives, Gauss-Jordan inversion and the
//! normal-equation least squares solver.

pub mod error;
pub mod inverse;
pub mod matrix;
pub mod ols;

pub use error::*;
pub use inverse::*;
pub use matrix::*;
pub use ols::*;
