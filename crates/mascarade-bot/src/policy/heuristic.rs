use super::{Policy, PolicyContext};
use crate::bot::{BeliefView, BotParams};
use mascarade_core::game::action::{Action, ActionMode, Decision, Response};
use mascarade_core::model::character::{Character, Power};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// Belief-driven bot: announces what it is sure of, looks when unsure,
/// and challenges announcements it believes false.
pub struct HeuristicPolicy {
    params: BotParams,
    rng: SmallRng,
}

impl HeuristicPolicy {
    pub fn new(params: BotParams) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(params.seed),
            params,
        }
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    fn respond(&self, ctx: &PolicyContext, announcer: usize, character: Character) -> Decision {
        let view = ctx.belief_view();
        let own = view.probability(ctx.seat, character);
        let claim = view.probability(announcer, character);
        let (response, reason) = if own >= self.params.announce_threshold {
            (Response::Challenge, "holds_claimed")
        } else if claim < self.params.challenge_threshold {
            (Response::Challenge, "claim_unlikely")
        } else {
            (Response::Pass, "claim_plausible")
        };
        let decision = Decision::Respond(response);
        log_decision(ctx, &decision, own.max(claim), reason);
        decision
    }

    fn swap(&mut self, ctx: &PolicyContext, reason: &str) -> Decision {
        let targets = ctx.swap_targets();
        let target = if targets.is_empty() {
            ctx.seating.left_of(ctx.seat)
        } else {
            targets[self.rng.gen_range(0..targets.len())]
        };
        let genuine = !self.rng.gen_bool(self.params.bluff_rate);
        let decision = Decision::Act(Action::SwapMyCard { target, genuine });
        log_decision(ctx, &decision, ctx.belief_view().certainty(ctx.seat), reason);
        decision
    }

    fn act(&mut self, ctx: &PolicyContext) -> Decision {
        let view = ctx.belief_view();
        let (guess, certainty) = view
            .most_likely(ctx.seat)
            .unwrap_or((Character::Fool, 0.0));

        if certainty >= self.params.announce_threshold {
            let decision = Decision::Act(Action::AnnounceCharacter(guess));
            log_decision(ctx, &decision, certainty, "confident");
            return decision;
        }
        if self.rng.gen_bool(self.params.bluff_rate) {
            let Some(character) = best_bluff(ctx, &view) else {
                return self.swap(ctx, "no_bluff_target");
            };
            let decision = Decision::Act(Action::AnnounceCharacter(character));
            log_decision(ctx, &decision, certainty, "bluff");
            return decision;
        }
        let decision = Decision::Act(Action::LookAtMyCard);
        log_decision(ctx, &decision, certainty, "uncertain");
        decision
    }
}

impl Policy for HeuristicPolicy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn decide(&mut self, ctx: &PolicyContext) -> Decision {
        match ctx.mode {
            ActionMode::ChallengeTheAnnouncer {
                announcer,
                character,
            } => self.respond(ctx, announcer, character),
            ActionMode::SwapOnly => self.swap(ctx, "swap_only"),
            ActionMode::Regular => self.act(ctx),
        }
    }

    fn swap_confidence(&self) -> f64 {
        self.params.swap_confidence
    }
}

/// Most lucrative income character in play that this bot is not already known to hold.
fn best_bluff(ctx: &PolicyContext, view: &BeliefView) -> Option<Character> {
    ctx.starting
        .roles()
        .iter()
        .copied()
        .filter_map(|character| match character.power() {
            Power::Income(amount) => Some((character, amount)),
            _ => None,
        })
        .filter(|(character, _)| view.probability(ctx.seat, *character) < 1.0)
        .max_by_key(|(_, amount)| *amount)
        .map(|(character, _)| character)
}

fn log_decision(ctx: &PolicyContext, decision: &Decision, certainty: f64, reason: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let detail = match decision {
        Decision::Act(Action::SwapMyCard { target, genuine }) => {
            format!("target={target} genuine={genuine}")
        }
        Decision::Act(Action::AnnounceCharacter(character)) => character.to_string(),
        _ => String::new(),
    };
    event!(
        target: "mascarade_bot::decide",
        Level::DEBUG,
        seat = ctx.seat,
        turn = ctx.turn,
        mode = %ctx.mode,
        decision = decision.label(),
        detail = %detail,
        certainty,
        coins = ctx.own_coins(),
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascarade_core::belief::{BeliefMatrix, apply_swap};
    use mascarade_core::game::history::History;
    use mascarade_core::model::lineup::StartingAssignment;
    use mascarade_core::model::player::{SeatKind, Seating};
    use mascarade_core::model::registry::PlayerRegistry;

    struct Table {
        seating: Seating,
        starting: StartingAssignment,
        coins: Vec<u32>,
        history: History,
    }

    fn table() -> Table {
        let mut registry = PlayerRegistry::new();
        let seats = (0..6)
            .map(|index| SeatKind::Player(registry.register(format!("p{index}")).unwrap()))
            .collect();
        Table {
            seating: Seating::from_seats(seats),
            starting: StartingAssignment::new(vec![
                Character::Judge,
                Character::King,
                Character::Queen,
                Character::Witch,
                Character::Thief,
                Character::Fool,
            ]),
            coins: vec![6; 6],
            history: History::new(),
        }
    }

    fn ctx<'a>(table: &'a Table, belief: &'a BeliefMatrix, mode: ActionMode) -> PolicyContext<'a> {
        PolicyContext {
            seat: 0,
            turn: 6,
            mode,
            seating: &table.seating,
            starting: &table.starting,
            belief,
            coins: &table.coins,
            public_history: &table.history,
            private_history: &table.history,
        }
    }

    #[test]
    fn announces_a_known_card() {
        let table = table();
        let belief = BeliefMatrix::identity(6);
        let mut policy = HeuristicPolicy::new(BotParams::default());
        let decision = policy.decide(&ctx(&table, &belief, ActionMode::Regular));
        assert_eq!(
            decision,
            Decision::Act(Action::AnnounceCharacter(Character::Judge))
        );
    }

    #[test]
    fn looks_when_unsure_and_never_bluffing() {
        let table = table();
        let belief = apply_swap(&BeliefMatrix::identity(6), 0, 3, 0.5).unwrap();
        let params = BotParams {
            bluff_rate: 0.0,
            ..BotParams::default()
        };
        let mut policy = HeuristicPolicy::new(params);
        let decision = policy.decide(&ctx(&table, &belief, ActionMode::Regular));
        assert_eq!(decision, Decision::Act(Action::LookAtMyCard));
    }

    #[test]
    fn always_bluffing_claims_the_richest_income() {
        let table = table();
        let belief = apply_swap(&BeliefMatrix::identity(6), 0, 3, 0.5).unwrap();
        let params = BotParams {
            bluff_rate: 1.0,
            ..BotParams::default()
        };
        let mut policy = HeuristicPolicy::new(params);
        let decision = policy.decide(&ctx(&table, &belief, ActionMode::Regular));
        assert_eq!(
            decision,
            Decision::Act(Action::AnnounceCharacter(Character::King))
        );
    }

    #[test]
    fn swap_only_mode_swaps_with_someone_else() {
        let table = table();
        let belief = BeliefMatrix::identity(6);
        let mut policy = HeuristicPolicy::new(BotParams::default().with_seed(11));
        for _ in 0..20 {
            match policy.decide(&ctx(&table, &belief, ActionMode::SwapOnly)) {
                Decision::Act(Action::SwapMyCard { target, .. }) => assert_ne!(target, 0),
                other => panic!("unexpected decision {other:?}"),
            }
        }
    }

    #[test]
    fn challenges_an_announcement_it_believes_false() {
        let table = table();
        let belief = BeliefMatrix::identity(6);
        let mut policy = HeuristicPolicy::new(BotParams::default());

        let false_claim = ActionMode::ChallengeTheAnnouncer {
            announcer: 2,
            character: Character::King,
        };
        assert_eq!(
            policy.decide(&ctx(&table, &belief, false_claim)),
            Decision::Respond(Response::Challenge)
        );

        let honest_claim = ActionMode::ChallengeTheAnnouncer {
            announcer: 1,
            character: Character::King,
        };
        assert_eq!(
            policy.decide(&ctx(&table, &belief, honest_claim)),
            Decision::Respond(Response::Pass)
        );
    }

    #[test]
    fn challenges_when_holding_the_claimed_card() {
        let table = table();
        let belief = BeliefMatrix::identity(6);
        let mut policy = HeuristicPolicy::new(BotParams::default());
        let mode = ActionMode::ChallengeTheAnnouncer {
            announcer: 3,
            character: Character::Judge,
        };
        assert_eq!(
            policy.decide(&ctx(&table, &belief, mode)),
            Decision::Respond(Response::Challenge)
        );
    }
}
