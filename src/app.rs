//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - runs the estimation pipeline
//! - prints predictions / summaries
//! - writes optional exports

use std::io::Write;

use clap::Parser;
use log::debug;

use crate::cli::{ApplyArgs, Command, FitArgs, PredictArgs, SampleArgs};
use crate::domain::{EstimateConfig, SampleConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `estimate` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry RUST_LOG / ESTIMATE_* defaults; a missing file is fine.
    dotenvy::dotenv().ok();
    let _ = pretty_env_logger::try_init();

    let cli = match parse_cli(rewrite_args(std::env::args().collect()))? {
        Parsed::Run(cli) => cli,
        Parsed::Display(text) => return print_stdout(&text),
    };

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Fit(args) => handle_fit(args),
        Command::Apply(args) => handle_apply(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Outcome of argument parsing.
enum Parsed {
    Run(crate::cli::Cli),
    /// Help or version text; printed to stdout and the run succeeds.
    Display(String),
}

fn parse_cli(argv: Vec<String>) -> Result<Parsed, AppError> {
    match crate::cli::Cli::try_parse_from(argv) {
        Ok(cli) => Ok(Parsed::Run(cli)),
        Err(err) if !err.use_stderr() => Ok(Parsed::Display(err.render().to_string())),
        Err(err) => Err(clap_error(err)),
    }
}

/// Usage errors exit with code 2.
fn clap_error(err: clap::Error) -> AppError {
    AppError::input_unavailable(err.render().to_string().trim_end())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = predict_config_from_args(&args);
    let (fit, prediction) = pipeline::run_predict(&config)?;

    if config.summary {
        eprint!(
            "{}",
            crate::report::format_fit_summary(&fit.training, &fit.weights, &fit.stats, fit.pivoting)
        );
    }

    print_stdout(&crate::report::format_predictions(
        &prediction.predictions,
        config.precision,
    ))?;

    if let Some(path) = &config.export {
        crate::io::export::write_predictions_csv(path, &prediction.query, &prediction.predictions)?;
    }
    if let Some(path) = &config.export_weights {
        crate::io::weights::write_weights_json(path, &fit.weights_file())?;
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let fit = pipeline::run_fit(&config)?;

    print_stdout(&crate::report::format_fit_summary(
        &fit.training,
        &fit.weights,
        &fit.stats,
        fit.pivoting,
    ))?;

    if let Some(path) = &config.export_weights {
        crate::io::weights::write_weights_json(path, &fit.weights_file())?;
    }
    Ok(())
}

fn handle_apply(args: ApplyArgs) -> Result<(), AppError> {
    let (model, prediction) = pipeline::run_apply(&args.weights, &args.data)?;
    debug!(
        "applied weights from '{}' (k={}, trained on n={})",
        args.weights.display(),
        model.features,
        model.rows
    );

    print_stdout(&crate::report::format_predictions(
        &prediction.predictions,
        args.precision,
    ))?;

    if let Some(path) = &args.export {
        crate::io::export::write_predictions_csv(path, &prediction.query, &prediction.predictions)?;
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let sample = crate::data::write_sample(&config)?;
    debug!("sample coefficients: {:?}", sample.coefficients);
    Ok(())
}

fn print_stdout(text: &str) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| AppError::new(crate::error::EXIT_INTERNAL, format!("Failed to write output: {e}")))
}

pub fn predict_config_from_args(args: &PredictArgs) -> EstimateConfig {
    EstimateConfig {
        train_path: args.train.clone(),
        data_path: Some(args.data.clone()),
        pivoting: args.solve.pivoting,
        precision: args.precision,
        summary: args.summary,
        export: args.export.clone(),
        export_weights: args.solve.export_weights.clone(),
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> EstimateConfig {
    EstimateConfig {
        train_path: args.train.clone(),
        data_path: None,
        pivoting: args.solve.pivoting,
        precision: 0,
        summary: true,
        export: None,
        export_weights: args.solve.export_weights.clone(),
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        features: args.features,
        rows: args.rows,
        queries: args.queries,
        coefficients: args.coef.clone(),
        noise: args.noise,
        seed: args.seed,
        train_path: args.train.clone(),
        data_path: args.data.clone(),
    }
}

/// Rewrite argv so `estimate TRAIN DATA` means `estimate predict TRAIN DATA`.
///
/// Rules:
/// - `estimate`                         -> `estimate predict` (clap reports the missing files)
/// - `estimate TRAIN DATA ...`          -> `estimate predict TRAIN DATA ...`
/// - `estimate --help/--version/-h`     -> unchanged
/// - `estimate <subcommand> ...`        -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("predict".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "predict" | "fit" | "apply" | "sample");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "predict".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_files_become_predict() {
        assert_eq!(
            rewrite_args(argv(&["estimate", "train.txt", "data.txt"])),
            argv(&["estimate", "predict", "train.txt", "data.txt"])
        );
        assert_eq!(
            rewrite_args(argv(&["estimate", "--pivoting", "partial", "t", "d"])),
            argv(&["estimate", "predict", "--pivoting", "partial", "t", "d"])
        );
    }

    #[test]
    fn no_arguments_reports_missing_files() {
        let argv = rewrite_args(argv(&["estimate"]));
        assert_eq!(argv, vec!["estimate".to_string(), "predict".to_string()]);
        let err = parse_cli(argv).err().unwrap();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT_UNAVAILABLE);
    }

    #[test]
    fn help_and_version_are_displayed_not_errors() {
        for (args, needle) in [
            (argv(&["estimate", "--help"]), "Usage"),
            (argv(&["estimate", "predict", "--help"]), "--pivoting"),
            (argv(&["estimate", "--version"]), env!("CARGO_PKG_VERSION")),
        ] {
            match parse_cli(rewrite_args(args.clone())) {
                Ok(Parsed::Display(text)) => assert!(text.contains(needle), "{args:?}: {text}"),
                Ok(Parsed::Run(_)) => panic!("{args:?} parsed as a command"),
                Err(err) => panic!("{args:?} failed: {err}"),
            }
        }
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["estimate", "fit", "t"]),
            argv(&["estimate", "sample", "--train", "t", "--data", "d"]),
            argv(&["estimate", "--help"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn fit_config_never_has_query_file() {
        let args = FitArgs {
            train: "t".into(),
            solve: crate::cli::SolveArgs {
                pivoting: crate::math::Pivoting::Partial,
                export_weights: None,
            },
        };
        let config = fit_config_from_args(&args);
        assert!(config.data_path.is_none());
        assert_eq!(config.pivoting, crate::math::Pivoting::Partial);
    }
}
