//! Training and query file loaders.
//!
//! Both formats are whitespace-separated token streams; line breaks carry no
//! meaning beyond error reporting.
//!
//! ```text
//! train               data
//! <k>                 <k>
//! <n>                 <m>
//! x1 ... xk y         x1 ... xk      (one example per row)
//! ```
//!
//! The loaders prepend the constant bias column (1.0) to every design row and
//! verify that invariant on the finished matrix. Anything that does not match
//! the layout is rejected with exit code 3 before the solver runs.

use std::fs;
use std::io::ErrorKind;
use std::iter::Peekable;
use std::path::Path;

use log::{info, warn};

use crate::domain::{QuerySet, TrainingSet};
use crate::error::AppError;
use crate::math::Matrix;

/// Header keyword of a training file.
pub const TRAIN_KEYWORD: &str = "train";
/// Largest `m` accepted for a query file with `k = 0`. Such rows read no
/// tokens, so the file length cannot bound them.
pub const MAX_FEATURELESS_QUERY_ROWS: usize = 1_000_000;
/// Header keyword of a query file.
pub const DATA_KEYWORD: &str = "data";

/// Load a training file from disk.
pub fn load_training(path: &Path) -> Result<TrainingSet, AppError> {
    let text = read_input(path, "training")?;
    let set = parse_training(&text, &path.display().to_string())?;
    info!(
        "loaded training set '{}': n={} k={}",
        path.display(),
        set.rows(),
        set.features
    );
    Ok(set)
}

/// Load a query file from disk, requiring the training feature count `k`.
pub fn load_query(path: &Path, features: usize) -> Result<QuerySet, AppError> {
    let text = read_input(path, "query")?;
    let set = parse_query(&text, &path.display().to_string())?;
    ensure_feature_count(&set, features, &path.display().to_string())?;
    info!("loaded query set '{}': m={} k={}", path.display(), set.rows(), set.features);
    Ok(set)
}

/// Reject a query set whose `k` differs from the model's.
pub fn ensure_feature_count(set: &QuerySet, features: usize, source: &str) -> Result<(), AppError> {
    if set.features != features {
        return Err(AppError::malformed(format!(
            "{source}: query data has {} features but the model was trained on {features}.",
            set.features
        )));
    }
    Ok(())
}

/// Parse training file contents. `source` names the input in diagnostics.
pub fn parse_training(text: &str, source: &str) -> Result<TrainingSet, AppError> {
    let mut tokens = Tokens::new(text, source);
    tokens.expect_keyword(TRAIN_KEYWORD)?;
    let features = tokens.count("feature count k")?;
    let rows = tokens.count("example count n")?;
    if rows == 0 {
        return Err(AppError::malformed(format!(
            "{source}: training set must contain at least one example."
        )));
    }
    let cols = design_width(features, rows, source)?;

    let mut x = Vec::with_capacity(bounded_capacity(rows * cols, text));
    let mut y = Vec::with_capacity(bounded_capacity(rows, text));
    for row in 1..=rows {
        x.push(1.0);
        for feature in 1..=features {
            x.push(tokens.value(&format!("feature x{feature} of example {row}"))?);
        }
        y.push(tokens.value(&format!("target y of example {row}"))?);
    }
    tokens.finish();

    let x = Matrix::from_vec(rows, cols, x)?;
    let y = Matrix::from_vec(rows, 1, y)?;
    check_bias_column(&x, source)?;
    Ok(TrainingSet { features, x, y })
}

/// Parse query file contents. `source` names the input in diagnostics.
pub fn parse_query(text: &str, source: &str) -> Result<QuerySet, AppError> {
    let mut tokens = Tokens::new(text, source);
    tokens.expect_keyword(DATA_KEYWORD)?;
    let features = tokens.count("feature count k")?;
    let rows = tokens.count("example count m")?;
    if features == 0 && rows > MAX_FEATURELESS_QUERY_ROWS {
        return Err(AppError::malformed(format!(
            "{source}: {rows} query rows with no features exceeds the limit of {MAX_FEATURELESS_QUERY_ROWS}."
        )));
    }
    let cols = design_width(features, rows, source)?;

    let mut x = Vec::with_capacity(bounded_capacity(rows * cols, text));
    for row in 1..=rows {
        x.push(1.0);
        for feature in 1..=features {
            x.push(tokens.value(&format!("feature x{feature} of example {row}"))?);
        }
    }
    tokens.finish();

    let x = Matrix::from_vec(rows, cols, x)?;
    check_bias_column(&x, source)?;
    Ok(QuerySet { features, x })
}

/// Verify that column 0 of a design matrix is 1.0 in every row.
pub fn check_bias_column(x: &Matrix, source: &str) -> Result<(), AppError> {
    if x.ncols() == 0 {
        return Err(AppError::malformed(format!("{source}: design matrix has no bias column.")));
    }
    match x.column(0).position(|v| v != 1.0) {
        Some(row) => Err(AppError::malformed(format!(
            "{source}: bias column must be 1.0 but row {} holds {}.",
            row + 1,
            x[(row, 0)]
        ))),
        None => Ok(()),
    }
}

fn read_input(path: &Path, what: &str) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => {
            AppError::malformed(format!("{what} file '{}' is not valid UTF-8 text.", path.display()))
        }
        _ => AppError::input_unavailable(format!(
            "Failed to open {what} file '{}': {e}",
            path.display()
        )),
    })
}

/// `k + 1`, guarding against counts that cannot be addressed.
fn design_width(features: usize, rows: usize, source: &str) -> Result<usize, AppError> {
    features
        .checked_add(1)
        .and_then(|cols| rows.checked_mul(cols).map(|_| cols))
        .ok_or_else(|| AppError::malformed(format!("{source}: declared dimensions are too large.")))
}

/// Declared counts come from the file, so never reserve more slots than it has tokens.
fn bounded_capacity(declared: usize, text: &str) -> usize {
    declared.min(text.len() / 2 + 1)
}

type TokenIter<'a> = Box<dyn Iterator<Item = (usize, &'a str)> + 'a>;

/// Token cursor that remembers line numbers for diagnostics.
struct Tokens<'a> {
    iter: Peekable<TokenIter<'a>>,
    source: &'a str,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str, source: &'a str) -> Self {
        let iter: TokenIter<'a> = Box::new(
            text.lines()
                .enumerate()
                .flat_map(|(idx, line)| line.split_whitespace().map(move |tok| (idx + 1, tok))),
        );
        Self {
            iter: iter.peekable(),
            source,
            last_line: 1,
        }
    }

    fn next(&mut self, what: &str) -> Result<(usize, &'a str), AppError> {
        match self.iter.next() {
            Some((line, tok)) => {
                self.last_line = line;
                Ok((line, tok))
            }
            None => Err(AppError::malformed(format!(
                "{}: unexpected end of input after line {} (missing {what}).",
                self.source, self.last_line
            ))),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), AppError> {
        let (line, tok) = self.next(&format!("'{keyword}' header"))?;
        if tok != keyword {
            return Err(AppError::malformed(format!(
                "{}:{line}: expected '{keyword}' header, found '{tok}'.",
                self.source
            )));
        }
        Ok(())
    }

    fn count(&mut self, what: &str) -> Result<usize, AppError> {
        let (line, tok) = self.next(what)?;
        tok.parse::<usize>().map_err(|_| {
            AppError::malformed(format!(
                "{}:{line}: {what} must be a non-negative integer, found '{tok}'.",
                self.source
            ))
        })
    }

    fn value(&mut self, what: &str) -> Result<f64, AppError> {
        let (line, tok) = self.next(what)?;
        match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(AppError::malformed(format!(
                "{}:{line}: {what} must be a finite number, found '{tok}'.",
                self.source
            ))),
        }
    }

    /// Log (but accept) anything after the declared rows.
    fn finish(mut self) {
        if let Some((line, _)) = self.iter.peek().copied() {
            let extra = self.iter.count();
            warn!(
                "{}: ignoring {extra} trailing token(s) starting at line {line}",
                self.source
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EXIT_INPUT_UNAVAILABLE, EXIT_MALFORMED_INPUT};

    const TRAIN: &str = "train\n1\n3\n1 3\n2 5\n3 7\n";

    #[test]
    fn parses_training_file() {
        let set = parse_training(TRAIN, "train.txt").unwrap();
        assert_eq!(set.features, 1);
        assert_eq!(set.rows(), 3);
        assert_eq!(set.x.as_slice(), &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        assert_eq!(set.y.as_slice(), &[3.0, 5.0, 7.0]);
    }

    #[test]
    fn layout_is_whitespace_insensitive() {
        let set = parse_training("train 2 2 1.5 -2 10\n\n  0 4e1   -3.25", "t").unwrap();
        assert_eq!(set.x.shape(), (2, 3));
        assert_eq!(set.x.row(1), &[1.0, 0.0, 40.0]);
        assert_eq!(set.y.as_slice(), &[10.0, -3.25]);
    }

    #[test]
    fn bias_column_is_always_one() {
        let set = parse_training("train 2 4  9 9 9  0 0 0  -1 -1 -1  5 6 7", "t").unwrap();
        assert!(set.x.column(0).all(|v| v == 1.0));
        let query = parse_query("data 2 2  3 4  5 6", "d").unwrap();
        assert!(query.x.column(0).all(|v| v == 1.0));
        assert!(check_bias_column(&query.x, "d").is_ok());
    }

    #[test]
    fn bias_check_rejects_broken_matrix() {
        let x = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 0.5, 3.0]).unwrap();
        let err = check_bias_column(&x, "x").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MALFORMED_INPUT);
        assert!(err.message().contains("row 2"), "{err}");
    }

    #[test]
    fn parses_query_file() {
        let set = parse_query("data\n1\n1\n10\n", "data.txt").unwrap();
        assert_eq!(set.features, 1);
        assert_eq!(set.x.as_slice(), &[1.0, 10.0]);
    }

    #[test]
    fn empty_query_set_is_allowed() {
        let set = parse_query("data 3 0", "d").unwrap();
        assert_eq!(set.x.shape(), (0, 4));
    }

    #[test]
    fn featureless_query_row_count_is_capped() {
        let set = parse_query("data 0 3", "d").unwrap();
        assert_eq!(set.x.shape(), (3, 1));

        let err = parse_query("data 0 99999999999", "d").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MALFORMED_INPUT);
        assert!(err.message().contains("no features"), "{err}");
    }

    #[test]
    fn wrong_header_is_rejected() {
        let err = parse_training("data\n1\n3\n1 3\n2 5\n3 7\n", "t").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MALFORMED_INPUT);
        assert!(err.message().contains("expected 'train'"), "{err}");

        let err = parse_query(TRAIN, "d").unwrap_err();
        assert!(err.message().contains("expected 'data'"), "{err}");
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = parse_training("train\n1\n3\n1 3\n2 5\n3\n", "t").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MALFORMED_INPUT);
        assert!(err.message().contains("target y of example 3"), "{err}");

        let err = parse_query("data\n2", "d").unwrap_err();
        assert!(err.message().contains("example count m"), "{err}");

        assert!(parse_training("", "t").is_err());
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        let err = parse_training("train\n1\n2\n1 3\nabc 5\n", "t").unwrap_err();
        assert!(err.message().contains("t:5"), "{err}");
        assert!(parse_training("train\n1\n2\n1 nan\n2 5\n", "t").is_err());
        assert!(parse_training("train\n-1\n2\n", "t").is_err());
        assert!(parse_training("train\n1.5\n2\n", "t").is_err());
    }

    #[test]
    fn zero_training_rows_are_rejected() {
        assert!(parse_training("train 1 0", "t").is_err());
    }

    #[test]
    fn trailing_tokens_are_ignored() {
        let set = parse_training("train 1 1  2 3  99 100", "t").unwrap();
        assert_eq!(set.rows(), 1);
    }

    #[test]
    fn feature_count_mismatch_is_rejected() {
        let query = parse_query("data 2 1  1 2", "d").unwrap();
        let err = ensure_feature_count(&query, 1, "d").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MALFORMED_INPUT);
    }

    #[test]
    fn missing_file_is_input_unavailable() {
        let path = std::env::temp_dir().join("ols-estimate-definitely-missing.txt");
        let err = load_training(&path).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT_UNAVAILABLE);
    }

    #[test]
    fn loads_from_disk() {
        let dir = std::env::temp_dir().join(format!("ols-estimate-ingest-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let train = dir.join("train.txt");
        let data = dir.join("data.txt");
        std::fs::write(&train, TRAIN).unwrap();
        std::fs::write(&data, "data\n2\n1\n1 2\n").unwrap();

        let set = load_training(&train).unwrap();
        assert_eq!(set.rows(), 3);
        let err = load_query(&data, set.features).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MALFORMED_INPUT);

        std::fs::remove_dir_all(&dir).ok();
    }
}
