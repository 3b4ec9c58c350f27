//! Sinkhorn–Knopp balancing with an asymmetric row/column exclusion.

use super::{BeliefError, BeliefMatrix};
use std::env;
use tracing::trace;

pub const DEFAULT_EPSILON: f64 = 0.01;
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Convergence tolerance and safety cap for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    /// Iteration stops once the squared row error drops below this value.
    pub epsilon: f64,
    /// Upper bound on full row+column passes before `NonConvergence` is raised.
    pub max_iterations: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl NormalizerConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base = Self::default();
        let epsilon = read("MASC_NORMALIZER_EPSILON")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(base.epsilon);
        let max_iterations = read("MASC_NORMALIZER_MAX_ITERATIONS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(base.max_iterations);

        Self {
            epsilon: epsilon.min(1.0),
            max_iterations,
        }
    }
}

/// Returns a balanced copy of `matrix`; the input is left untouched.
pub fn normalize(
    matrix: &BeliefMatrix,
    excluded_row: Option<usize>,
    excluded_column: Option<usize>,
    config: &NormalizerConfig,
) -> Result<BeliefMatrix, BeliefError> {
    let mut balanced = matrix.clone();
    balance_in_place(&mut balanced, excluded_row, excluded_column, config)?;
    Ok(balanced)
}

/// Balances `matrix` in place and returns the number of passes performed.
///
/// The excluded row is skipped by the row pass only and the excluded column by the
/// column pass only. The error is accumulated inside the column pass: right after
/// column `j` is rescaled, `(row_sum(j) - 1)^2` is added, so the row sharing its
/// index with the excluded column is never measured.
pub fn balance_in_place(
    matrix: &mut BeliefMatrix,
    excluded_row: Option<usize>,
    excluded_column: Option<usize>,
    config: &NormalizerConfig,
) -> Result<usize, BeliefError> {
    if let Some(row) = excluded_row {
        matrix.check_index(row)?;
    }
    if let Some(column) = excluded_column {
        matrix.check_index(column)?;
    }
    matrix.check_entries()?;

    let size = matrix.size();
    let mut error = f64::INFINITY;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        for row in (0..size).filter(|row| Some(*row) != excluded_row) {
            let sum = matrix.row_sum(row);
            if sum <= 0.0 {
                return Err(BeliefError::DegenerateRow { row });
            }
            matrix.divide_row(row, sum);
        }

        error = 0.0;
        for column in (0..size).filter(|column| Some(*column) != excluded_column) {
            let sum = matrix.column_sum(column);
            if sum <= 0.0 {
                return Err(BeliefError::DegenerateColumn { column });
            }
            matrix.divide_column(column, sum);
            error += (matrix.row_sum(column) - 1.0).powi(2);
        }

        if error < config.epsilon {
            trace!(
                target: "mascarade_core::belief",
                iterations,
                error,
                size,
                "belief matrix balanced"
            );
            return Ok(iterations);
        }
    }

    Err(BeliefError::NonConvergence { iterations, error })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> BeliefMatrix {
        BeliefMatrix::from_rows(rows.iter().map(|row| row.to_vec()).collect()).unwrap()
    }

    #[test]
    fn balances_positive_matrix() {
        let input = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let output = normalize(&input, None, None, &NormalizerConfig::default()).unwrap();

        for column in 0..3 {
            assert!((output.column_sum(column) - 1.0).abs() < 1e-9);
        }
        for row in 0..3 {
            assert!((output.row_sum(row) - 1.0).abs() < 0.1);
        }
        assert_eq!(input.get(2, 2), 10.0, "input must not be mutated");
    }

    #[test]
    fn tighter_epsilon_tightens_rows() {
        let input = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let config = NormalizerConfig {
            epsilon: 1e-12,
            ..NormalizerConfig::default()
        };
        let output = normalize(&input, None, None, &config).unwrap();
        assert!(output.is_doubly_stochastic(1e-5));
    }

    #[test]
    fn zero_row_is_degenerate() {
        let input = matrix(&[&[0.5, 0.5, 0.0], &[0.0, 0.0, 0.0], &[0.5, 0.5, 1.0]]);
        let err = normalize(&input, None, None, &NormalizerConfig::default()).unwrap_err();
        assert_eq!(err, BeliefError::DegenerateRow { row: 1 });
    }

    #[test]
    fn zero_column_is_degenerate() {
        let input = matrix(&[&[1.0, 0.0], &[1.0, 0.0]]);
        let err = normalize(&input, None, None, &NormalizerConfig::default()).unwrap_err();
        assert_eq!(err, BeliefError::DegenerateColumn { column: 1 });
    }

    #[test]
    fn excluded_row_is_not_rescaled_by_row_pass() {
        // Row 0 sums to 4 and stays unscaled; column 0 is skipped by the column pass.
        let input = matrix(&[&[2.0, 1.0, 1.0], &[0.0, 0.5, 0.5], &[0.0, 0.5, 0.5]]);
        let config = NormalizerConfig::default();
        let output = normalize(&input, Some(0), Some(0), &config).unwrap();
        assert_eq!(output.get(0, 0), 2.0);
        assert_margins_within_bound(&output, 0, 0, &config);
    }

    #[test]
    fn exclusions_on_different_indices_balance_the_rest() {
        let input = matrix(&[
            &[0.4, 0.3, 0.2, 0.1],
            &[0.1, 0.2, 0.3, 0.4],
            &[0.25, 0.25, 0.25, 0.25],
            &[0.3, 0.1, 0.5, 0.1],
        ]);
        let config = NormalizerConfig::default();
        let output = normalize(&input, Some(1), Some(2), &config).unwrap();
        assert_margins_within_bound(&output, 1, 2, &config);
        // Column 2 only moves through the row pass.
        assert!((output.column_sum(2) - 1.0).abs() > 0.1);
    }

    /// Balanced columns sum to 1; balanced rows stay within the error bound.
    fn assert_margins_within_bound(
        output: &BeliefMatrix,
        excluded_row: usize,
        excluded_column: usize,
        config: &NormalizerConfig,
    ) {
        let size = output.size();
        for column in (0..size).filter(|column| *column != excluded_column) {
            assert!(
                (output.column_sum(column) - 1.0).abs() < 1e-9,
                "column {column} sums to {}",
                output.column_sum(column)
            );
        }
        let bound = config.epsilon.sqrt();
        for row in (0..size).filter(|row| *row != excluded_row) {
            assert!(
                (output.row_sum(row) - 1.0).abs() < bound,
                "row {row} sums to {}",
                output.row_sum(row)
            );
        }
    }

    #[test]
    fn support_without_permutation_hits_iteration_cap() {
        // No doubly stochastic matrix shares this support, so the error never vanishes.
        let input = matrix(&[&[1.0, 1.0], &[0.0, 1.0]]);
        let config = NormalizerConfig {
            epsilon: 1e-300,
            max_iterations: 50,
        };
        let err = normalize(&input, None, None, &config).unwrap_err();
        assert!(matches!(
            err,
            BeliefError::NonConvergence { iterations: 50, .. }
        ));
    }

    #[test]
    fn rejects_out_of_range_exclusion() {
        let input = BeliefMatrix::identity(3);
        let err = normalize(&input, Some(3), None, &NormalizerConfig::default()).unwrap_err();
        assert_eq!(err, BeliefError::IndexOutOfRange { index: 3, size: 3 });
    }

    #[test]
    fn rejects_negative_entries() {
        let input = matrix(&[&[1.0, -1.0], &[0.0, 1.0]]);
        let err = normalize(&input, None, None, &NormalizerConfig::default()).unwrap_err();
        assert!(matches!(err, BeliefError::InvalidEntry { row: 0, column: 1, .. }));
    }

    #[test]
    fn empty_matrix_is_trivially_balanced() {
        let input = BeliefMatrix::identity(0);
        let output = normalize(&input, None, None, &NormalizerConfig::default()).unwrap();
        assert_eq!(output.size(), 0);
    }

    #[test]
    fn config_reader_applies_overrides_and_ignores_garbage() {
        let config = NormalizerConfig::from_reader(|key| match key {
            "MASC_NORMALIZER_EPSILON" => Some("0.001".to_string()),
            "MASC_NORMALIZER_MAX_ITERATIONS" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(config.epsilon, 0.001);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }
}
