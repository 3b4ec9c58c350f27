use super::{AgentBelief, BeliefMatrix};

#[derive(Debug, Clone)]
pub struct BeliefMetrics {
    pub revisions: u32,
    pub entropy_per_player: Vec<f64>,
    pub total_entropy: f64,
    pub margin_error: f64,
}

impl BeliefMetrics {
    pub fn from_belief(belief: &AgentBelief) -> Self {
        let matrix = belief.matrix();
        let entropy_per_player: Vec<f64> = matrix.rows().map(row_entropy).collect();
        let total_entropy = entropy_per_player.iter().sum();

        Self {
            revisions: belief.revisions(),
            entropy_per_player,
            total_entropy,
            margin_error: matrix.max_margin_error(),
        }
    }
}

fn row_entropy(row: &[f64]) -> f64 {
    row.iter()
        .filter(|prob| **prob > 0.0)
        .map(|prob| -prob * prob.ln())
        .sum()
}

/// Mean probability the matrix puts on the true card of each seat.
///
/// `true_columns[i]` is the starting slot of the card seat `i` holds now.
pub fn assignment_accuracy(matrix: &BeliefMatrix, true_columns: &[usize]) -> f64 {
    if true_columns.is_empty() || true_columns.len() != matrix.size() {
        return 0.0;
    }
    let total: f64 = true_columns
        .iter()
        .enumerate()
        .filter(|(_, column)| **column < matrix.size())
        .map(|(row, column)| matrix.get(row, *column))
        .sum();
    total / true_columns.len() as f64
}
