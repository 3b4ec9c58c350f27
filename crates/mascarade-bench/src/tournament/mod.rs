mod seating;

use std::time::{Duration, Instant};

use mascarade_bot::bot::BotParams;
use mascarade_bot::policy::{Policy, PolicyContext, PolicyRegistry, RegistryError, fallback_decision};
use mascarade_core::belief::telemetry::{BeliefMetrics, assignment_accuracy};
use mascarade_core::belief::{AgentBelief, Audience, BeliefEvent, NormalizerConfig};
use mascarade_core::game::GameError;
use mascarade_core::game::action::{Action, ActionMode, Decision, Response};
use mascarade_core::game::history::History;
use mascarade_core::game::state::GameState;
use mascarade_core::model::character::Character;
use mascarade_core::model::deck::{MAX_PLAYERS, MIN_PLAYERS};
use mascarade_core::model::registry::PlayerRegistry;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event, warn};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary};
use crate::config::{AgentConfig, TournamentConfig};

pub use seating::{bot_seed, shuffled_order};

/// Primary entry point for orchestrating tournaments.
///
/// The runner is the only owner of game state and agent beliefs; bots only ever see
/// a read-only [`PolicyContext`].
pub struct TournamentRunner {
    config: TournamentConfig,
    registry: PolicyRegistry,
    normalizer: NormalizerConfig,
    agents: Vec<AgentBlueprint>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub run_id: String,
    pub games_played: usize,
    pub outcomes: Vec<GameOutcome>,
    pub analytics: AnalyticsSummary,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration using the built-in policies.
    pub fn new(config: TournamentConfig) -> Result<Self, RunnerError> {
        Self::with_registry(config, PolicyRegistry::with_builtin())
    }

    pub fn with_registry(
        config: TournamentConfig,
        registry: PolicyRegistry,
    ) -> Result<Self, RunnerError> {
        let found = config.agents.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&found) {
            return Err(RunnerError::SeatCount {
                found,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }

        let agents = config
            .agents
            .iter()
            .map(|agent| AgentBlueprint::new(agent, &registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            normalizer: config.beliefs.normalizer(),
            config,
            registry,
            agents,
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Normalizer settings every agent's belief is balanced with.
    pub fn normalizer(&self) -> &NormalizerConfig {
        &self.normalizer
    }

    /// Resolved parameters for `agent`, before the per-seat seed is mixed in.
    pub fn agent_params(&self, agent: &str) -> Option<BotParams> {
        self.agents
            .iter()
            .find(|blueprint| blueprint.name == agent)
            .map(|blueprint| blueprint.params)
    }

    /// Play every configured game and aggregate the results.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config)?;
        let mut outcomes = Vec::with_capacity(self.config.games.count);

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_index, game_seed)?;
            analytics.record_game(&outcome)?;
            outcomes.push(outcome);
        }

        Ok(RunSummary {
            run_id: self.config.run_id.clone(),
            games_played: outcomes.len(),
            outcomes,
            analytics: analytics.finalize()?,
        })
    }

    /// Seat the agents, deal and play one game to completion.
    pub fn play_game(&self, game_index: usize, game_seed: u64) -> Result<GameOutcome, RunnerError> {
        let order = shuffled_order(self.agents.len(), game_seed);
        let mut players = PlayerRegistry::new();
        let ids = order
            .iter()
            .map(|&agent| players.register(self.agents[agent].name.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = GameState::deal(&ids, game_seed)?;
        let roles: Vec<Character> = state.starting().roles().to_vec();
        let seat_count = state.seating().len();

        let mut seats = Vec::with_capacity(order.len());
        for (seat, &agent_index) in order.iter().enumerate() {
            let blueprint = &self.agents[agent_index];
            let seed = bot_seed(blueprint.params.seed, game_seed, seat);
            seats.push(SeatAgent {
                agent_name: blueprint.name.clone(),
                seat,
                policy: self
                    .registry
                    .spawn(&blueprint.kind, blueprint.params.with_seed(seed))?,
                belief: AgentBelief::new(seat, seat_count),
                metrics: DecisionMetrics::default(),
                belief_failures: 0,
                illegal_decisions: 0,
            });
        }

        let max_turns = self.config.games.max_turns;
        while !state.is_over(max_turns) {
            let seat = state.current_seat();
            let action = self.choose_action(&state, &mut seats[seat], game_index);
            self.apply_action(&mut state, &mut seats, &roles, seat, action, game_index)?;
            state.end_turn();
        }

        let result = state.finish();
        let true_columns = state.true_columns();
        let winner = result
            .winner
            .and_then(|seat| seats.get(seat))
            .map(|agent| agent.agent_name.clone());

        let mut seat_results = Vec::with_capacity(seats.len());
        for agent in seats {
            let SeatAgent {
                agent_name,
                seat,
                mut policy,
                belief,
                metrics,
                belief_failures,
                illegal_decisions,
            } = agent;
            let won = result.winner == Some(seat);
            policy.observe_outcome(&result.coins, won);

            let belief = belief.discard();
            let belief_metrics = BeliefMetrics::from_belief(&belief);
            seat_results.push(SeatResult {
                agent_name,
                seat,
                coins: result.coins.get(seat).copied().unwrap_or(0),
                won,
                belief_accuracy: assignment_accuracy(belief.matrix(), &true_columns),
                belief_entropy: belief_metrics.total_entropy,
                belief_revisions: belief_metrics.revisions,
                belief_failures,
                illegal_decisions,
                metrics: metrics.finalize(),
            });
        }

        event!(
            target: "mascarade_bench::game",
            Level::INFO,
            run_id = %self.config.run_id,
            game_index = game_index as u32,
            game_seed,
            turns = result.turns,
            winner = winner.as_deref().unwrap_or("-"),
        );

        Ok(GameOutcome {
            game_index,
            seed: game_seed,
            turns: result.turns,
            winner,
            seats: seat_results,
        })
    }

    fn ask<F>(
        &self,
        state: &GameState,
        agent: &mut SeatAgent,
        mode: ActionMode,
        game_index: usize,
        legal: F,
    ) -> Decision
    where
        F: Fn(&Decision) -> bool,
    {
        let empty = History::new();
        let ctx = PolicyContext {
            seat: agent.seat,
            turn: state.turn(),
            mode,
            seating: state.seating(),
            starting: state.starting(),
            belief: agent.belief.matrix(),
            coins: state.treasury().all(),
            public_history: state.log().public(),
            private_history: state.log().private(agent.seat).unwrap_or(&empty),
        };

        let start = Instant::now();
        let decision = agent.policy.decide(&ctx);
        agent.metrics.record(start.elapsed());

        if legal(&decision) {
            return decision;
        }
        agent.illegal_decisions += 1;
        warn!(
            target: "mascarade_bench::turn",
            game_index = game_index as u32,
            turn = state.turn(),
            seat = agent.seat,
            mode = %mode,
            decision = decision.label(),
            "illegal decision replaced by fallback"
        );
        fallback_decision(&ctx)
    }

    fn choose_action(&self, state: &GameState, agent: &mut SeatAgent, game_index: usize) -> Action {
        let seat = agent.seat;
        let mode = state.action_mode(seat);
        let legal = |decision: &Decision| {
            matches!(decision, Decision::Act(action) if state.validate_action(seat, action).is_ok())
        };
        match self.ask(state, agent, mode, game_index, legal) {
            Decision::Act(action) => action,
            Decision::Respond(_) => Action::SwapMyCard {
                target: state.seating().left_of(seat),
                genuine: false,
            },
        }
    }

    fn choose_response(
        &self,
        state: &GameState,
        agent: &mut SeatAgent,
        announcer: usize,
        character: Character,
        game_index: usize,
    ) -> Response {
        let mode = ActionMode::ChallengeTheAnnouncer {
            announcer,
            character,
        };
        let legal = |decision: &Decision| matches!(decision, Decision::Respond(_));
        match self.ask(state, agent, mode, game_index, legal) {
            Decision::Respond(response) => response,
            Decision::Act(_) => Response::Pass,
        }
    }

    /// Applies a legal action to the game and routes the resulting observations to beliefs.
    fn apply_action(
        &self,
        state: &mut GameState,
        seats: &mut [SeatAgent],
        roles: &[Character],
        seat: usize,
        action: Action,
        game_index: usize,
    ) -> Result<(), RunnerError> {
        let turn = state.turn();
        match action {
            Action::SwapMyCard { target, genuine } => {
                state.swap(seat, target, genuine)?;
                for agent in seats.iter_mut() {
                    let probability = if agent.seat == seat {
                        if genuine { 1.0 } else { 0.0 }
                    } else {
                        agent.policy.swap_confidence()
                    };
                    let swap = BeliefEvent::SwapAttempt {
                        player_a: seat,
                        player_b: target,
                        probability,
                    };
                    self.observe(agent, &swap, roles, game_index, turn);
                }
            }
            Action::LookAtMyCard => {
                let character = state.look(seat)?;
                let reveal = BeliefEvent::Reveal {
                    observer: Audience::Only(seat),
                    player: seat,
                    role: character,
                };
                self.observe(&mut seats[seat], &reveal, roles, game_index, turn);
            }
            Action::AnnounceCharacter(character) => {
                let mut challengers = Vec::new();
                for other in state.seating().others_in_order(seat) {
                    let response =
                        self.choose_response(state, &mut seats[other], seat, character, game_index);
                    if response == Response::Challenge {
                        challengers.push(other);
                    }
                }
                let outcome = state.announce(seat, character, &challengers)?;
                for (player, shown) in outcome.revealed {
                    let reveal = BeliefEvent::Reveal {
                        observer: Audience::Everyone,
                        player,
                        role: shown,
                    };
                    for agent in seats.iter_mut() {
                        self.observe(agent, &reveal, roles, game_index, turn);
                    }
                }
            }
        }

        event!(
            target: "mascarade_bench::turn",
            Level::DEBUG,
            game_index = game_index as u32,
            turn,
            seat,
            action = action.label(),
            coins = state.treasury().coins(seat),
        );
        Ok(())
    }

    /// Contradictory or non-converging updates leave the belief untouched.
    fn observe(
        &self,
        agent: &mut SeatAgent,
        event: &BeliefEvent<Character>,
        roles: &[Character],
        game_index: usize,
        turn: u32,
    ) {
        match agent.belief.observe(event, roles, &self.normalizer) {
            Ok(next) => agent.belief = next,
            Err(err) => {
                agent.belief_failures += 1;
                warn!(
                    target: "mascarade_bench::belief",
                    game_index = game_index as u32,
                    turn,
                    seat = agent.seat,
                    error = %err,
                    "belief update skipped"
                );
            }
        }
    }
}

struct AgentBlueprint {
    name: String,
    kind: String,
    params: BotParams,
}

impl AgentBlueprint {
    fn new(config: &AgentConfig, registry: &PolicyRegistry) -> Result<Self, RunnerError> {
        let params = config.params.to_bot_params();
        // Spawning once surfaces unknown kinds and bad params before any game starts.
        registry.spawn(&config.kind, params)?;
        Ok(Self {
            name: config.name.clone(),
            kind: config.kind.clone(),
            params,
        })
    }
}

struct SeatAgent {
    agent_name: String,
    seat: usize,
    policy: Box<dyn Policy>,
    belief: AgentBelief,
    metrics: DecisionMetrics,
    belief_failures: u32,
    illegal_decisions: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub game_index: usize,
    pub seed: u64,
    pub turns: u32,
    pub winner: Option<String>,
    pub seats: Vec<SeatResult>,
}

impl GameOutcome {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatResult {
    pub agent_name: String,
    pub seat: usize,
    pub coins: u32,
    pub won: bool,
    /// Mean probability the final belief put on each seat's true card.
    pub belief_accuracy: f64,
    pub belief_entropy: f64,
    pub belief_revisions: u32,
    pub belief_failures: u32,
    pub illegal_decisions: u32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("tournament requires between {min} and {max} agents, found {found}")]
    SeatCount {
        found: usize,
        min: usize,
        max: usize,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("game rejected a move: {0}")]
    Game(#[from] GameError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
