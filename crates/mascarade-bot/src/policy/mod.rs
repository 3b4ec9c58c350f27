mod heuristic;
mod random;
mod registry;

pub use heuristic::HeuristicPolicy;
pub use random::RandomPolicy;
pub use registry::{PolicyFactory, PolicyRegistry, RegistryError};

use crate::bot::BeliefView;
use mascarade_core::belief::BeliefMatrix;
use mascarade_core::game::action::{Action, ActionMode, Decision, Response};
use mascarade_core::game::history::History;
use mascarade_core::model::lineup::StartingAssignment;
use mascarade_core::model::player::Seating;

/// Everything a bot may look at when asked for a decision.
pub struct PolicyContext<'a> {
    pub seat: usize,
    pub turn: u32,
    pub mode: ActionMode,
    pub seating: &'a Seating,
    pub starting: &'a StartingAssignment,
    pub belief: &'a BeliefMatrix,
    pub coins: &'a [u32],
    pub public_history: &'a History,
    pub private_history: &'a History,
}

impl<'a> PolicyContext<'a> {
    pub fn belief_view(&self) -> BeliefView<'a> {
        BeliefView::new(self.belief, self.starting)
    }

    /// Every seat this bot may swap with, center cards included.
    pub fn swap_targets(&self) -> Vec<usize> {
        (0..self.seating.len())
            .filter(|seat| *seat != self.seat)
            .collect()
    }

    pub fn own_coins(&self) -> u32 {
        self.coins.get(self.seat).copied().unwrap_or(0)
    }
}

/// Decision interface implemented by every bot.
///
/// Bots keep any private state on `self`; the orchestrator owns beliefs and histories.
pub trait Policy: Send {
    fn name(&self) -> &'static str;

    fn decide(&mut self, ctx: &PolicyContext) -> Decision;

    /// Probability used for swaps this bot only watched.
    fn swap_confidence(&self) -> f64 {
        0.5
    }

    /// Called once when the game ends.
    fn observe_outcome(&mut self, _final_coins: &[u32], _won: bool) {}
}

/// Always-legal answer for `ctx.mode`: a fake swap with the next seat, or a pass.
pub fn fallback_decision(ctx: &PolicyContext) -> Decision {
    match ctx.mode {
        ActionMode::ChallengeTheAnnouncer { .. } => Decision::Respond(Response::Pass),
        ActionMode::Regular | ActionMode::SwapOnly => Decision::Act(Action::SwapMyCard {
            target: ctx.seating.left_of(ctx.seat),
            genuine: false,
        }),
    }
}
