use super::{Policy, PolicyContext};
use crate::bot::BotParams;
use mascarade_core::game::action::{Action, ActionMode, Decision, Response};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Uniform choice among the moves the current mode allows. Used as a baseline.
pub struct RandomPolicy {
    rng: SmallRng,
    swap_confidence: f64,
}

impl RandomPolicy {
    pub fn new(params: BotParams) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(params.seed),
            swap_confidence: params.swap_confidence,
        }
    }

    fn random_swap(&mut self, ctx: &PolicyContext) -> Action {
        let target = ctx
            .swap_targets()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| ctx.seating.left_of(ctx.seat));
        Action::SwapMyCard {
            target,
            genuine: self.rng.gen_bool(0.5),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&mut self, ctx: &PolicyContext) -> Decision {
        match ctx.mode {
            ActionMode::ChallengeTheAnnouncer { .. } => {
                if self.rng.gen_bool(0.5) {
                    Decision::Respond(Response::Challenge)
                } else {
                    Decision::Respond(Response::Pass)
                }
            }
            ActionMode::SwapOnly => Decision::Act(self.random_swap(ctx)),
            ActionMode::Regular => match self.rng.gen_range(0..3) {
                0 => Decision::Act(self.random_swap(ctx)),
                1 => Decision::Act(Action::LookAtMyCard),
                _ => match ctx.starting.roles().choose(&mut self.rng) {
                    Some(character) => Decision::Act(Action::AnnounceCharacter(*character)),
                    None => Decision::Act(Action::LookAtMyCard),
                },
            },
        }
    }

    fn swap_confidence(&self) -> f64 {
        self.swap_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascarade_core::belief::BeliefMatrix;
    use mascarade_core::game::history::History;
    use mascarade_core::model::character::Character;
    use mascarade_core::model::lineup::StartingAssignment;
    use mascarade_core::model::player::{SeatKind, Seating};
    use mascarade_core::model::registry::PlayerRegistry;

    fn decisions(seed: u64, mode: ActionMode, rounds: usize) -> Vec<Decision> {
        let mut registry = PlayerRegistry::new();
        let mut seats: Vec<SeatKind> = (0..4)
            .map(|index| SeatKind::Player(registry.register(format!("p{index}")).unwrap()))
            .collect();
        seats.extend([SeatKind::Table, SeatKind::Table]);
        let seating = Seating::from_seats(seats);
        let starting = StartingAssignment::new(vec![
            Character::Judge,
            Character::Bishop,
            Character::Fool,
            Character::Queen,
            Character::Thief,
            Character::Cheat,
        ]);
        let belief = BeliefMatrix::identity(6);
        let coins = vec![6, 6, 6, 6, 0, 0];
        let history = History::new();
        let ctx = PolicyContext {
            seat: 1,
            turn: 8,
            mode,
            seating: &seating,
            starting: &starting,
            belief: &belief,
            coins: &coins,
            public_history: &history,
            private_history: &history,
        };
        let mut policy = RandomPolicy::new(BotParams::default().with_seed(seed));
        (0..rounds).map(|_| policy.decide(&ctx)).collect()
    }

    #[test]
    fn same_seed_same_choices() {
        assert_eq!(
            decisions(7, ActionMode::Regular, 32),
            decisions(7, ActionMode::Regular, 32)
        );
    }

    #[test]
    fn choices_respect_the_mode() {
        for decision in decisions(3, ActionMode::SwapOnly, 64) {
            match decision {
                Decision::Act(Action::SwapMyCard { target, .. }) => {
                    assert!(target < 6);
                    assert_ne!(target, 1);
                }
                other => panic!("swap-only produced {other:?}"),
            }
        }
        let mode = ActionMode::ChallengeTheAnnouncer {
            announcer: 0,
            character: Character::Judge,
        };
        assert!(
            decisions(3, mode, 16)
                .iter()
                .all(|decision| matches!(decision, Decision::Respond(_)))
        );
    }
}
