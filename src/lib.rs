//! `ols-estimate` library crate.
//!
//! The binary (`estimate`) is a thin wrapper around this library so that:
//!
//! - the linear-algebra core is testable without spawning processes
//! - loaders, reports and exports can be reused independently
//!
//! The numeric core lives in [`math`]: a dense [`math::Matrix`], Gauss-Jordan
//! inversion and the normal-equation solver `W = (XᵗX)⁻¹XᵗY`.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
