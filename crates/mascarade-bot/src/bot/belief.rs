use mascarade_core::belief::BeliefMatrix;
use mascarade_core::model::character::Character;
use mascarade_core::model::lineup::StartingAssignment;

/// Character-level view over a slot-indexed [`BeliefMatrix`].
///
/// Columns that share a character (two Peasants) are summed.
#[derive(Debug, Clone, Copy)]
pub struct BeliefView<'a> {
    matrix: &'a BeliefMatrix,
    starting: &'a StartingAssignment,
}

impl<'a> BeliefView<'a> {
    pub fn new(matrix: &'a BeliefMatrix, starting: &'a StartingAssignment) -> Self {
        Self { matrix, starting }
    }

    pub fn matrix(&self) -> &'a BeliefMatrix {
        self.matrix
    }

    pub fn probability(&self, seat: usize, character: Character) -> f64 {
        if seat >= self.matrix.size() {
            return 0.0;
        }
        self.starting
            .roles()
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == character)
            .map(|(column, _)| self.matrix.get(seat, column))
            .sum()
    }

    /// Likeliest character for `seat` with its probability; ties favour the earlier slot.
    pub fn most_likely(&self, seat: usize) -> Option<(Character, f64)> {
        let mut best: Option<(Character, f64)> = None;
        for &character in self.starting.roles() {
            let probability = self.probability(seat, character);
            match best {
                Some((_, current)) if current >= probability => {}
                _ => best = Some((character, probability)),
            }
        }
        best
    }

    pub fn certainty(&self, seat: usize) -> f64 {
        self.most_likely(seat)
            .map(|(_, probability)| probability)
            .unwrap_or(0.0)
    }

    /// Seat other than `seat` most likely to hold `character`.
    pub fn likeliest_holder(&self, character: Character, exclude: usize) -> Option<usize> {
        (0..self.matrix.size())
            .filter(|candidate| *candidate != exclude)
            .map(|candidate| (candidate, self.probability(candidate, character)))
            .fold(None, |best: Option<(usize, f64)>, (candidate, probability)| {
                match best {
                    Some((_, current)) if current >= probability => best,
                    _ => Some((candidate, probability)),
                }
            })
            .map(|(candidate, _)| candidate)
    }
}
