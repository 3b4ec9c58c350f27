//! Dense square matrix of subjective (player, role slot) probabilities.

use super::BeliefError;
use serde::{Deserialize, Serialize};

/// `get(i, j)` is the probability that player `i` holds the role dealt to slot `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl BeliefMatrix {
    /// Certainty that every player still holds the card dealt to them.
    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zeros(size);
        for index in 0..size {
            matrix.cells[index * size + index] = 1.0;
        }
        matrix
    }

    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    /// Builds a matrix from explicit rows; every row must have `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, BeliefError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(BeliefError::DimensionMismatch {
                    expected: size,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Panics when either index is outside the matrix; use [`Self::check_index`] first
    /// for untrusted input.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[self.offset(row, column)]
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        let offset = self.offset(row, column);
        self.cells[offset] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.size).map(move |row| self.get(row, column))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size.max(1)).take(self.size)
    }

    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).iter().sum()
    }

    pub fn column_sum(&self, column: usize) -> f64 {
        self.column(column).sum()
    }

    /// Column slot this player most likely holds (lowest index on ties).
    pub fn most_likely_column(&self, row: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (column, value) in self.row(row).iter().copied().enumerate() {
            match best {
                Some((_, current)) if current >= value => {}
                _ => best = Some((column, value)),
            }
        }
        best.map(|(column, _)| column)
    }

    /// Largest deviation of any row or column sum from 1.
    pub fn max_margin_error(&self) -> f64 {
        let rows = (0..self.size).map(|row| (self.row_sum(row) - 1.0).abs());
        let columns = (0..self.size).map(|column| (self.column_sum(column) - 1.0).abs());
        rows.chain(columns).fold(0.0, f64::max)
    }

    pub fn is_doubly_stochastic(&self, tolerance: f64) -> bool {
        self.max_margin_error() <= tolerance
    }

    pub fn check_index(&self, index: usize) -> Result<(), BeliefError> {
        if index < self.size {
            Ok(())
        } else {
            Err(BeliefError::IndexOutOfRange {
                index,
                size: self.size,
            })
        }
    }

    /// Rejects negative, NaN and infinite cells.
    pub fn check_entries(&self) -> Result<(), BeliefError> {
        match self
            .cells
            .iter()
            .position(|value| !value.is_finite() || *value < 0.0)
        {
            Some(offset) => Err(BeliefError::InvalidEntry {
                row: offset / self.size,
                column: offset % self.size,
                value: self.cells[offset],
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn divide_row(&mut self, row: usize, divisor: f64) {
        let start = row * self.size;
        for value in &mut self.cells[start..start + self.size] {
            *value /= divisor;
        }
    }

    pub(crate) fn divide_column(&mut self, column: usize, divisor: f64) {
        for row in 0..self.size {
            let offset = self.offset(row, column);
            self.cells[offset] /= divisor;
        }
    }

    pub(crate) fn zero_row(&mut self, row: usize) {
        let start = row * self.size;
        self.cells[start..start + self.size].fill(0.0);
    }

    pub(crate) fn zero_column(&mut self, column: usize) {
        for row in 0..self.size {
            let offset = self.offset(row, column);
            self.cells[offset] = 0.0;
        }
    }

    pub(crate) fn replace_row(&mut self, row: usize, values: &[f64]) {
        let start = row * self.size;
        self.cells[start..start + self.size].copy_from_slice(values);
    }

    fn offset(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.size && column < self.size,
            "cell ({row}, {column}) outside {0}x{0} matrix",
            self.size
        );
        row * self.size + column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_doubly_stochastic() {
        for size in 1..=13 {
            let matrix = BeliefMatrix::identity(size);
            assert!(matrix.is_doubly_stochastic(0.0));
            for index in 0..size {
                assert_eq!(matrix.get(index, index), 1.0);
            }
        }
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = BeliefMatrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            BeliefError::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn check_entries_reports_first_bad_cell() {
        let matrix =
            BeliefMatrix::from_rows(vec![vec![0.5, 0.5], vec![-0.1, f64::NAN]]).unwrap();
        let err = matrix.check_entries().unwrap_err();
        assert!(matches!(
            err,
            BeliefError::InvalidEntry {
                row: 1,
                column: 0,
                ..
            }
        ));
    }

    #[test]
    fn most_likely_column_prefers_lowest_index_on_ties() {
        let matrix = BeliefMatrix::from_rows(vec![
            vec![0.4, 0.4, 0.2],
            vec![0.3, 0.3, 0.4],
            vec![0.3, 0.3, 0.4],
        ])
        .unwrap();
        assert_eq!(matrix.most_likely_column(0), Some(0));
        assert_eq!(matrix.most_likely_column(1), Some(2));
    }

    #[test]
    fn rows_iterates_in_order() {
        let matrix = BeliefMatrix::identity(3);
        let collected: Vec<Vec<f64>> = matrix.rows().map(|row| row.to_vec()).collect();
        assert_eq!(collected[1], vec![0.0, 1.0, 0.0]);
        assert_eq!(BeliefMatrix::identity(0).rows().count(), 0);
    }
}
