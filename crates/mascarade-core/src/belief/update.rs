//! Copy-on-write belief updates: every operator reads the prior and returns a posterior.

use super::normalize::balance_in_place;
use super::{BeliefError, BeliefMatrix, NormalizerConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prior every agent starts from: the dealt assignment is known with certainty.
pub fn initial_belief(players: usize) -> BeliefMatrix {
    BeliefMatrix::identity(players)
}

/// Who observed a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    Everyone,
    Only(usize),
}

impl Audience {
    pub fn includes(self, seat: usize) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::Only(observer) => observer == seat,
        }
    }
}

/// Observation fed to the engine, generic over the role type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BeliefEvent<R> {
    /// `player` is known to hold `role`.
    Reveal {
        observer: Audience,
        player: usize,
        role: R,
    },
    /// `player_a` and `player_b` exchanged cards with subjective `probability`.
    SwapAttempt {
        player_a: usize,
        player_b: usize,
        probability: f64,
    },
}

/// Column of the starting assignment that `role` refers to for `player`.
///
/// When the role appears more than once (two Peasants), the matching column the
/// player is most likely to hold wins; ties go to the lowest index.
pub fn resolve_role_column<R>(
    belief: &BeliefMatrix,
    player: usize,
    role: &R,
    starting_assignment: &[R],
) -> Result<usize, BeliefError>
where
    R: PartialEq + fmt::Display,
{
    belief.check_index(player)?;
    if starting_assignment.len() != belief.size() {
        return Err(BeliefError::DimensionMismatch {
            expected: belief.size(),
            found: starting_assignment.len(),
        });
    }

    let mut best: Option<(usize, f64)> = None;
    for (column, candidate) in starting_assignment.iter().enumerate() {
        if candidate != role {
            continue;
        }
        let weight = belief.get(player, column);
        match best {
            Some((_, current)) if current >= weight => {}
            _ => best = Some((column, weight)),
        }
    }

    best.map(|(column, _)| column)
        .ok_or_else(|| BeliefError::UnknownRole {
            role: role.to_string(),
        })
}

/// Pins `player` to `role` and rebalances everything else.
pub fn apply_reveal<R>(
    belief: &BeliefMatrix,
    player: usize,
    role: &R,
    starting_assignment: &[R],
    config: &NormalizerConfig,
) -> Result<BeliefMatrix, BeliefError>
where
    R: PartialEq + fmt::Display,
{
    let column = resolve_role_column(belief, player, role, starting_assignment)?;
    apply_reveal_at(belief, player, column, config)
}

/// Reveal addressed by column index instead of role.
pub fn apply_reveal_at(
    belief: &BeliefMatrix,
    player: usize,
    column: usize,
    config: &NormalizerConfig,
) -> Result<BeliefMatrix, BeliefError> {
    belief.check_index(player)?;
    belief.check_index(column)?;

    let mut posterior = belief.clone();
    posterior.zero_row(player);
    posterior.zero_column(column);
    posterior.set(player, column, 1.0);
    balance_in_place(&mut posterior, Some(player), Some(column), config)?;
    Ok(posterior)
}

/// Blends rows `player_a` and `player_b` by the probability that the swap was real.
///
/// Row sums survive the convex blend. No renormalization follows, so column margins
/// are whatever the prior had until the next reveal rebalances the matrix.
pub fn apply_swap(
    belief: &BeliefMatrix,
    player_a: usize,
    player_b: usize,
    probability: f64,
) -> Result<BeliefMatrix, BeliefError> {
    belief.check_index(player_a)?;
    belief.check_index(player_b)?;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(BeliefError::InvalidProbability { value: probability });
    }

    let mut posterior = belief.clone();
    if player_a == player_b {
        return Ok(posterior);
    }

    let keep = 1.0 - probability;
    let row_a = belief.row(player_a);
    let row_b = belief.row(player_b);
    let blended_a: Vec<f64> = row_a
        .iter()
        .zip(row_b)
        .map(|(a, b)| keep * a + probability * b)
        .collect();
    let blended_b: Vec<f64> = row_b
        .iter()
        .zip(row_a)
        .map(|(b, a)| keep * b + probability * a)
        .collect();
    posterior.replace_row(player_a, &blended_a);
    posterior.replace_row(player_b, &blended_b);
    Ok(posterior)
}

/// Dispatches an event to the matching operator. The audience is not consulted here;
/// routing is the caller's concern.
pub fn apply_event<R>(
    belief: &BeliefMatrix,
    event: &BeliefEvent<R>,
    starting_assignment: &[R],
    config: &NormalizerConfig,
) -> Result<BeliefMatrix, BeliefError>
where
    R: PartialEq + fmt::Display,
{
    match event {
        BeliefEvent::Reveal { player, role, .. } => {
            apply_reveal(belief, *player, role, starting_assignment, config)
        }
        BeliefEvent::SwapAttempt {
            player_a,
            player_b,
            probability,
        } => apply_swap(belief, *player_a, *player_b, *probability),
    }
}
