//! Synthetic training/query files from a known linear model.
//!
//! Features are drawn uniformly from `[-FEATURE_RANGE, FEATURE_RANGE]` and
//! targets follow `y = b0 + Σ bj·xj + ε` with `ε ~ Normal(0, noise)`. With
//! `noise == 0` the generated training set is an exact fit, which makes the
//! output handy for checking that a solve recovers the coefficients.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SampleConfig;
use crate::error::AppError;
use crate::io::ingest::{DATA_KEYWORD, TRAIN_KEYWORD};

/// Half-width of the uniform feature range.
pub const FEATURE_RANGE: f64 = 10.0;

/// Generated file contents plus the coefficients that produced them.
#[derive(Debug, Clone)]
pub struct SampleData {
    pub coefficients: Vec<f64>,
    pub train: String,
    pub data: String,
}

/// Generate both files in memory.
pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.rows == 0 {
        return Err(AppError::malformed("Sample row count must be > 0."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::malformed("Noise standard deviation must be finite and >= 0."));
    }

    let coefficients = match &config.coefficients {
        Some(c) if c.len() != config.features + 1 => {
            return Err(AppError::malformed(format!(
                "Expected {} coefficients (bias + {} features), got {}.",
                config.features + 1,
                config.features,
                c.len()
            )));
        }
        Some(c) if c.iter().any(|v| !v.is_finite()) => {
            return Err(AppError::malformed("Coefficients must be finite."));
        }
        Some(c) => c.clone(),
        None => (1..=config.features + 1).map(|v| v as f64).collect(),
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::malformed(format!("Noise distribution error: {e}")))?;

    let mut train = format!("{TRAIN_KEYWORD}\n{}\n{}\n", config.features, config.rows);
    for _ in 0..config.rows {
        let xs = draw_features(&mut rng, config.features);
        let y = coefficients[0]
            + coefficients[1..].iter().zip(&xs).map(|(b, x)| b * x).sum::<f64>()
            + normal.sample(&mut rng);
        push_row(&mut train, &xs, Some(y));
    }

    let mut data = format!("{DATA_KEYWORD}\n{}\n{}\n", config.features, config.queries);
    for _ in 0..config.queries {
        let xs = draw_features(&mut rng, config.features);
        push_row(&mut data, &xs, None);
    }

    Ok(SampleData {
        coefficients,
        train,
        data,
    })
}

/// Generate and write both files.
pub fn write_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    let sample = generate_sample(config)?;
    write_file(&config.train_path, &sample.train)?;
    write_file(&config.data_path, &sample.data)?;
    info!(
        "wrote {} training rows to '{}' and {} query rows to '{}'",
        config.rows,
        config.train_path.display(),
        config.queries,
        config.data_path.display()
    );
    Ok(sample)
}

fn draw_features(rng: &mut StdRng, k: usize) -> Vec<f64> {
    (0..k).map(|_| rng.gen_range(-FEATURE_RANGE..=FEATURE_RANGE)).collect()
}

fn push_row(out: &mut String, xs: &[f64], y: Option<f64>) {
    let mut fields: Vec<String> = xs.iter().map(|v| v.to_string()).collect();
    if let Some(y) = y {
        fields.push(y.to_string());
    }
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", fields.join(" "));
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    fs::write(path, contents).map_err(|e| {
        AppError::input_unavailable(format!("Failed to write sample file '{}': {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::io::ingest::{parse_query, parse_training};
    use crate::math::{solve_weights, Pivoting};

    fn config(features: usize, rows: usize, noise: f64) -> SampleConfig {
        SampleConfig {
            features,
            rows,
            queries: 5,
            coefficients: None,
            noise,
            seed: 42,
            train_path: PathBuf::from("train.txt"),
            data_path: PathBuf::from("data.txt"),
        }
    }

    #[test]
    fn noiseless_sample_is_recovered_exactly() {
        let sample = generate_sample(&config(3, 30, 0.0)).unwrap();
        assert_eq!(sample.coefficients, vec![1.0, 2.0, 3.0, 4.0]);

        let training = parse_training(&sample.train, "sample").unwrap();
        assert_eq!((training.rows(), training.features), (30, 3));
        let query = parse_query(&sample.data, "sample").unwrap();
        assert_eq!((query.rows(), query.features), (5, 3));

        let w = solve_weights(&training.x, &training.y, Pivoting::None).unwrap();
        for (j, expected) in sample.coefficients.iter().enumerate() {
            assert!((w[(j, 0)] - expected).abs() < 1e-8, "w[{j}] = {}", w[(j, 0)]);
        }
    }

    #[test]
    fn same_seed_same_output() {
        let a = generate_sample(&config(2, 10, 0.5)).unwrap();
        let b = generate_sample(&config(2, 10, 0.5)).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(generate_sample(&config(2, 0, 0.0)).is_err());
        assert!(generate_sample(&config(2, 10, -1.0)).is_err());

        let mut cfg = config(2, 10, 0.0);
        cfg.coefficients = Some(vec![1.0, 2.0]);
        assert!(generate_sample(&cfg).is_err());
    }

    #[test]
    fn explicit_coefficients_are_used() {
        let mut cfg = config(1, 4, 0.0);
        cfg.coefficients = Some(vec![1.0, 2.0]);
        let sample = generate_sample(&cfg).unwrap();
        let training = parse_training(&sample.train, "sample").unwrap();
        for (row, y) in training.x.rows().zip(training.y.column(0)) {
            assert!((y - (1.0 + 2.0 * row[1])).abs() < 1e-9);
        }
    }
}
