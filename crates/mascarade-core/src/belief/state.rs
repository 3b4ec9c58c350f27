//! Lifecycle of one agent's belief across a game.

use super::update::{Audience, BeliefEvent, apply_event, initial_belief};
use super::{BeliefError, BeliefMatrix, NormalizerConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeliefPhase {
    /// Identity prior, nothing observed yet.
    Fresh,
    /// At least one reveal or swap has been applied.
    Updated,
    /// Game over; no further updates are accepted.
    Discarded,
}

/// Belief held by the agent seated at `owner`.
///
/// Transitions never mutate `self`; they return the successor state and the caller
/// replaces its stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBelief {
    owner: usize,
    matrix: BeliefMatrix,
    phase: BeliefPhase,
    revisions: u32,
}

impl AgentBelief {
    pub fn new(owner: usize, players: usize) -> Self {
        Self {
            owner,
            matrix: initial_belief(players),
            phase: BeliefPhase::Fresh,
            revisions: 0,
        }
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    pub fn matrix(&self) -> &BeliefMatrix {
        &self.matrix
    }

    pub fn phase(&self) -> BeliefPhase {
        self.phase
    }

    /// Number of events applied since the prior.
    pub fn revisions(&self) -> u32 {
        self.revisions
    }

    pub fn probability(&self, player: usize, column: usize) -> f64 {
        self.matrix.get(player, column)
    }

    /// Applies `event` if this agent is part of its audience.
    pub fn observe<R>(
        &self,
        event: &BeliefEvent<R>,
        starting_assignment: &[R],
        config: &NormalizerConfig,
    ) -> Result<Self, BeliefError>
    where
        R: PartialEq + fmt::Display,
    {
        if self.phase == BeliefPhase::Discarded {
            return Err(BeliefError::Discarded { owner: self.owner });
        }
        if let BeliefEvent::Reveal { observer, .. } = event
            && !observer.includes(self.owner)
        {
            return Ok(self.clone());
        }

        let matrix = apply_event(&self.matrix, event, starting_assignment, config)?;
        Ok(Self {
            owner: self.owner,
            matrix,
            phase: BeliefPhase::Updated,
            revisions: self.revisions + 1,
        })
    }

    /// Private reveal of the owner's own card.
    pub fn observe_own_card<R>(
        &self,
        role: R,
        starting_assignment: &[R],
        config: &NormalizerConfig,
    ) -> Result<Self, BeliefError>
    where
        R: PartialEq + fmt::Display,
    {
        let event = BeliefEvent::Reveal {
            observer: Audience::Only(self.owner),
            player: self.owner,
            role,
        };
        self.observe(&event, starting_assignment, config)
    }

    /// Terminal transition at game end.
    pub fn discard(self) -> Self {
        Self {
            phase: BeliefPhase::Discarded,
            ..self
        }
    }
}
