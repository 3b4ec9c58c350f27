use thiserror::Error;

/// Failures raised by the belief engine. None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeliefError {
    #[error("row {row} sums to zero; beliefs are contradictory")]
    DegenerateRow { row: usize },
    #[error("column {column} sums to zero; beliefs are contradictory")]
    DegenerateColumn { column: usize },
    #[error("role '{role}' is not part of the starting assignment")]
    UnknownRole { role: String },
    #[error("normalization did not converge within {iterations} iterations (error {error:.6})")]
    NonConvergence { iterations: usize, error: f64 },
    #[error("index {index} is out of range for a {size}x{size} belief matrix")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("swap probability {value} must be a finite value in [0, 1]")]
    InvalidProbability { value: f64 },
    #[error("cell ({row}, {column}) holds {value}; entries must be finite and non-negative")]
    InvalidEntry { row: usize, column: usize, value: f64 },
    #[error("expected dimension {expected} but found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("belief owned by seat {owner} was already discarded")]
    Discarded { owner: usize },
}
