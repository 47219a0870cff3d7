//! Command-line parsing for the least-squares estimator.
//!
//! Argument parsing and command dispatch stay separate from the numeric code;
//! `app` turns these structs into domain configs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::math::Pivoting;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "estimate", version, about = "Ordinary least-squares estimator (normal equations)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit on a training file and print one prediction per query row.
    ///
    /// `estimate TRAIN DATA` is shorthand for `estimate predict TRAIN DATA`.
    Predict(PredictArgs),
    /// Fit on a training file and print the weights and diagnostics.
    Fit(FitArgs),
    /// Predict from a previously exported weights JSON.
    Apply(ApplyArgs),
    /// Write synthetic training/query files from a known linear model.
    Sample(SampleArgs),
}

/// Options shared by every command that solves the normal equations.
#[derive(Debug, Args, Clone)]
pub struct SolveArgs {
    /// Row-exchange strategy for Gauss-Jordan inversion.
    #[arg(long, value_enum, env = "ESTIMATE_PIVOTING", default_value_t = Pivoting::None)]
    pub pivoting: Pivoting,

    /// Export the solved weights to JSON.
    #[arg(long = "export-weights", value_name = "JSON")]
    pub export_weights: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Training file (`train`, k, n, then n rows of k features and a target).
    #[arg(value_name = "TRAIN")]
    pub train: PathBuf,

    /// Query file (`data`, k, m, then m rows of k features).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    #[command(flatten)]
    pub solve: SolveArgs,

    /// Decimal places for printed predictions (0 rounds to the nearest integer).
    #[arg(long, env = "ESTIMATE_PRECISION", default_value_t = 0)]
    pub precision: usize,

    /// Also print the fit summary (to stderr, keeping stdout scriptable).
    #[arg(long)]
    pub summary: bool,

    /// Export query rows and unrounded predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Training file.
    #[arg(value_name = "TRAIN")]
    pub train: PathBuf,

    #[command(flatten)]
    pub solve: SolveArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ApplyArgs {
    /// Weights JSON produced by `--export-weights`.
    #[arg(long, value_name = "JSON")]
    pub weights: PathBuf,

    /// Query file.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Decimal places for printed predictions.
    #[arg(long, env = "ESTIMATE_PRECISION", default_value_t = 0)]
    pub precision: usize,

    /// Export query rows and unrounded predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of features `k`.
    #[arg(short = 'k', long, default_value_t = 1)]
    pub features: usize,

    /// Number of training rows `n`.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub rows: usize,

    /// Number of query rows `m`.
    #[arg(short = 'm', long, default_value_t = 10)]
    pub queries: usize,

    /// Comma-separated coefficients, bias first (default: 1,2,...,k+1).
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub coef: Option<Vec<f64>>,

    /// Standard deviation of Gaussian noise added to targets.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output path for the training file.
    #[arg(long, value_name = "PATH")]
    pub train: PathBuf,

    /// Output path for the query file.
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,
}
