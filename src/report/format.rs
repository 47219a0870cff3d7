//! Formatted terminal output.
//!
//! Predictions go to stdout one per line so the output stays scriptable; the
//! fit summary is a human-readable block.

use crate::domain::TrainingSet;
use crate::math::{FitStats, Matrix, Pivoting};

/// Format predictions one per line with `precision` decimals.
///
/// `precision == 0` rounds to the nearest integer (ties to even, like C's
/// `printf("%.0f")`).
pub fn format_predictions(predictions: &Matrix, precision: usize) -> String {
    let mut out = String::new();
    for value in predictions.column(0) {
        out.push_str(&format!("{value:.precision$}\n"));
    }
    out
}

/// Format the fit summary (dimensions, weights, training diagnostics).
pub fn format_fit_summary(
    training: &TrainingSet,
    weights: &Matrix,
    stats: &FitStats,
    pivoting: Pivoting,
) -> String {
    let mut out = String::new();

    out.push_str("=== estimate - OLS fit (normal equations) ===\n");
    out.push_str(&format!(
        "Training: n={} | k={} | pivoting={}\n",
        training.rows(),
        training.features,
        pivoting_label(pivoting)
    ));

    out.push_str("\nWeights:\n");
    for (j, w) in weights.column(0).enumerate() {
        let name = if j == 0 { "bias".to_string() } else { format!("x{j}") };
        out.push_str(&format!("  {name:<8} {w:>16.6}\n"));
    }

    out.push_str("\nDiagnostics:\n");
    out.push_str(&format!("  SSE      {:>16.6}\n", stats.sse));
    out.push_str(&format!("  RMSE     {:>16.6}\n", stats.rmse));
    out.push_str(&format!("  R^2      {:>16}\n", fmt_opt(stats.r_squared, |v| format!("{v:.6}"))));
    out.push_str(&format!(
        "  cond(X)  {:>16}\n",
        fmt_opt(stats.condition_number, |v| format!("{v:.3e}"))
    ));

    out
}

fn pivoting_label(pivoting: Pivoting) -> &'static str {
    match pivoting {
        Pivoting::None => "none",
        Pivoting::Partial => "partial",
    }
}

fn fmt_opt(v: Option<f64>, f: impl Fn(f64) -> String) -> String {
    v.map(f).unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predictions_round_to_integers_by_default() {
        let p = Matrix::from_row_slice(4, 1, &[21.000000001, 2.4, -0.4, 1234.6]).unwrap();
        assert_eq!(format_predictions(&p, 0), "21\n2\n-0\n1235\n");
    }

    #[test]
    fn predictions_honour_precision() {
        let p = Matrix::from_row_slice(2, 1, &[1.23456, -7.0]).unwrap();
        assert_eq!(format_predictions(&p, 2), "1.23\n-7.00\n");
    }

    #[test]
    fn empty_predictions_print_nothing() {
        assert_eq!(format_predictions(&Matrix::zeros(0, 1), 0), "");
    }

    #[test]
    fn summary_lists_every_weight() {
        let training = TrainingSet {
            features: 2,
            x: Matrix::zeros(5, 3),
            y: Matrix::zeros(5, 1),
        };
        let weights = Matrix::from_row_slice(3, 1, &[1.0, 2.0, -3.0]).unwrap();
        let stats = FitStats {
            n: 5,
            sse: 0.5,
            rmse: 0.1,
            r_squared: None,
            condition_number: Some(12.5),
        };
        let text = format_fit_summary(&training, &weights, &stats, Pivoting::Partial);
        assert!(text.contains("n=5 | k=2 | pivoting=partial"));
        assert!(text.contains("bias"));
        assert!(text.contains("x2"));
        assert!(text.contains("-3.000000"));
        assert!(text.contains("n/a"));
        assert!(text.contains("1.250e1"));
    }
}
