//! Column standardization with missing-value tolerance.
//!
//! Both the embedding and the clustering operate on z-scored features, and
//! both must survive the degenerate inputs exploratory sessions produce:
//! columns that are entirely missing, columns with zero variance, rows with
//! scattered `NaN` gaps. The contract here is simple — the output matrix is
//! always fully finite:
//!
//! - per-column mean and standard deviation ignore `NaN` entries,
//! - the standard deviation is the population form (divisor = count of
//!   non-missing values),
//! - any `NaN` or non-finite z-score (missing input, zero variance, empty
//!   column) is replaced by `0.0`.

use crate::table::FeatureMatrix;

/// Per-column mean and population standard deviation, ignoring `NaN`.
///
/// A column with no finite entries reports `NaN` for both, which the caller
/// flushes to zero.
fn column_stats(matrix: &FeatureMatrix, col: usize) -> (f64, f64) {
    let mut count = 0usize;
    let mut sum = 0.0;
    for row in 0..matrix.rows {
        let v = matrix.get(row, col);
        if !v.is_nan() {
            count += 1;
            sum += v;
        }
    }
    if count == 0 {
        return (f64::NAN, f64::NAN);
    }

    let mean = sum / count as f64;
    let mut sq_sum = 0.0;
    for row in 0..matrix.rows {
        let v = matrix.get(row, col);
        if !v.is_nan() {
            let d = v - mean;
            sq_sum += d * d;
        }
    }
    (mean, (sq_sum / count as f64).sqrt())
}

/// Standardize a matrix to z-scores, guaranteeing a fully finite result.
///
/// The input is left untouched; a newly allocated matrix is returned.
pub fn standardize(matrix: &FeatureMatrix) -> FeatureMatrix {
    let mut scaled = matrix.clone();
    for col in 0..matrix.cols {
        let (mean, std) = column_stats(matrix, col);
        for row in 0..matrix.rows {
            let z = (matrix.get(row, col) - mean) / std;
            scaled.data[row * matrix.cols + col] = if z.is_finite() { z } else { 0.0 };
        }
    }
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, FeatureTable};
    use approx::assert_relative_eq;

    fn matrix_of(columns: Vec<Column>) -> FeatureMatrix {
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        FeatureTable::from_columns(columns).unwrap().select_numeric(&refs)
    }

    #[test]
    fn test_zscore_values() {
        let matrix = matrix_of(vec![Column::numeric("x", vec![1.0, 2.0, 3.0])]);
        let scaled = standardize(&matrix);
        // Population std of {1,2,3} is sqrt(2/3).
        let std = (2.0f64 / 3.0).sqrt();
        assert_relative_eq!(scaled.get(0, 0), -1.0 / std, epsilon = 1e-12);
        assert_relative_eq!(scaled.get(1, 0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(scaled.get(2, 0), 1.0 / std, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_entries_ignored_and_flushed() {
        let matrix = matrix_of(vec![Column::numeric(
            "x",
            vec![1.0, f64::NAN, 3.0],
        )]);
        let scaled = standardize(&matrix);
        // Stats come from {1, 3}: mean 2, std 1.
        assert_relative_eq!(scaled.get(0, 0), -1.0, epsilon = 1e-12);
        assert_eq!(scaled.get(1, 0), 0.0);
        assert_relative_eq!(scaled.get(2, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_column_flushes_to_zero() {
        let matrix = matrix_of(vec![Column::numeric("x", vec![5.0, 5.0, 5.0])]);
        let scaled = standardize(&matrix);
        for row in 0..3 {
            assert_eq!(scaled.get(row, 0), 0.0);
        }
    }

    #[test]
    fn test_all_missing_column_flushes_to_zero() {
        let matrix = matrix_of(vec![Column::numeric(
            "x",
            vec![f64::NAN, f64::NAN],
        )]);
        let scaled = standardize(&matrix);
        assert_eq!(scaled.get(0, 0), 0.0);
        assert_eq!(scaled.get(1, 0), 0.0);
    }

    #[test]
    fn test_output_always_finite() {
        let matrix = matrix_of(vec![
            Column::numeric("a", vec![1.0, f64::NAN, f64::INFINITY, 4.0]),
            Column::numeric("b", vec![2.0, 2.0, 2.0, 2.0]),
            Column::numeric("c", vec![f64::NAN, f64::NAN, f64::NAN, f64::NAN]),
        ]);
        let scaled = standardize(&matrix);
        assert!(scaled.data.iter().all(|v| v.is_finite()));
    }
}
