//! Export predictions to CSV.
//!
//! One row per query example: its 1-based index, the raw feature values (bias
//! column omitted) and the unrounded prediction.

use std::fs::File;
use std::path::Path;

use crate::domain::QuerySet;
use crate::error::AppError;
use crate::math::Matrix;

/// Write query features and predictions to a CSV file.
pub fn write_predictions_csv(path: &Path, query: &QuerySet, predictions: &Matrix) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input_unavailable(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_predictions(file, query, predictions)
}

/// Write the predictions CSV to any writer.
pub fn write_predictions<W: std::io::Write>(
    writer: W,
    query: &QuerySet,
    predictions: &Matrix,
) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["row".to_string()];
    header.extend((1..=query.features).map(|j| format!("x{j}")));
    header.push("prediction".to_string());
    out.write_record(&header)
        .map_err(|e| AppError::input_unavailable(format!("Failed to write export CSV header: {e}")))?;

    for (i, (features, prediction)) in query.x.rows().zip(predictions.column(0)).enumerate() {
        let mut record = Vec::with_capacity(features.len() + 1);
        record.push((i + 1).to_string());
        record.extend(features.iter().skip(1).map(|v| v.to_string()));
        record.push(prediction.to_string());
        out.write_record(&record)
            .map_err(|e| AppError::input_unavailable(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::input_unavailable(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let query = QuerySet {
            features: 2,
            x: Matrix::from_row_slice(2, 3, &[1.0, 0.5, 2.0, 1.0, -1.0, 3.0]).unwrap(),
        };
        let predictions = Matrix::from_row_slice(2, 1, &[10.25, -4.0]).unwrap();

        let mut buf = Vec::new();
        write_predictions(&mut buf, &query, &predictions).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "row,x1,x2,prediction\n1,0.5,2,10.25\n2,-1,3,-4\n");
    }
}
