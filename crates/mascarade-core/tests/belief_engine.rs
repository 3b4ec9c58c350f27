use mascarade_core::belief::telemetry::assignment_accuracy;
use mascarade_core::belief::{
    AgentBelief, Audience, BeliefError, BeliefEvent, BeliefMatrix, BeliefPhase, NormalizerConfig,
    apply_reveal, apply_swap, initial_belief, normalize,
};
use mascarade_core::game::state::GameState;
use mascarade_core::model::character::Character;
use mascarade_core::model::registry::{PlayerId, PlayerRegistry};

const ROLES: [&str; 5] = ["Judge", "Bishop", "Queen", "Fool", "Cheat"];

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

#[test]
fn swaps_then_reveal_keep_the_matrix_balanced() {
    let config = NormalizerConfig::default();
    let prior = initial_belief(5);
    assert_eq!(prior, BeliefMatrix::identity(5));

    let first = apply_swap(&prior, 0, 1, 0.4).unwrap();
    assert_close(first.get(0, 0), 0.6, 1e-12);
    assert_close(first.get(0, 1), 0.4, 1e-12);
    assert_close(first.get(1, 0), 0.4, 1e-12);

    let second = apply_swap(&first, 0, 2, 0.4).unwrap();
    assert_close(second.get(0, 0), 0.36, 1e-12);
    assert_close(second.get(0, 1), 0.24, 1e-12);
    assert_close(second.get(0, 2), 0.4, 1e-12);
    assert_close(second.get(2, 0), 0.24, 1e-12);
    assert_close(second.get(2, 2), 0.6, 1e-12);

    let revealed = apply_reveal(&second, 4, &ROLES[4], &ROLES, &config).unwrap();
    assert_eq!(revealed.get(4, 4), 1.0);
    for other in 0..4 {
        assert_eq!(revealed.get(4, other), 0.0);
        assert_eq!(revealed.get(other, 4), 0.0);
    }
    assert!(revealed.is_doubly_stochastic(0.1));
    assert_close(revealed.get(3, 3), 1.0, 1e-9);

    // Priors are never mutated in place.
    assert_eq!(prior, BeliefMatrix::identity(5));
    assert_close(second.get(0, 0), 0.36, 1e-12);
}

#[test]
fn certain_and_impossible_swaps() {
    let prior = initial_belief(4);
    let swapped = apply_swap(&prior, 1, 3, 1.0).unwrap();
    assert_eq!(swapped.row(1), prior.row(3));
    assert_eq!(swapped.row(3), prior.row(1));

    let unchanged = apply_swap(&prior, 1, 3, 0.0).unwrap();
    assert_eq!(unchanged, prior);
}

#[test]
fn normalizer_balances_free_margins_and_rejects_zero_rows() {
    let config = NormalizerConfig::default();
    let skewed = BeliefMatrix::from_rows(vec![
        vec![4.0, 1.0, 1.0],
        vec![1.0, 2.0, 1.0],
        vec![1.0, 1.0, 3.0],
    ])
    .unwrap();
    let balanced = normalize(&skewed, None, None, &config).unwrap();
    for index in 0..3 {
        assert_close(balanced.column_sum(index), 1.0, 1e-9);
        assert_close(balanced.row_sum(index), 1.0, 0.1);
    }

    let dead = BeliefMatrix::from_rows(vec![
        vec![0.0, 0.0, 0.0],
        vec![0.5, 0.5, 0.0],
        vec![0.5, 0.5, 1.0],
    ])
    .unwrap();
    assert!(matches!(
        normalize(&dead, None, None, &config),
        Err(BeliefError::DegenerateRow { row: 0 })
    ));
}

#[test]
fn duplicate_peasants_resolve_to_the_likelier_slot() {
    let config = NormalizerConfig::default();
    let roles = [
        Character::Peasant,
        Character::Judge,
        Character::Peasant,
        Character::Queen,
    ];
    let prior = initial_belief(4);
    let mixed = apply_swap(&prior, 0, 1, 0.3).unwrap();
    let mixed = apply_swap(&mixed, 1, 2, 0.5).unwrap();

    // Seat 1 leans toward slot 2 (0.5) over slot 0 (0.15).
    let posterior = apply_reveal(&mixed, 1, &Character::Peasant, &roles, &config).unwrap();
    assert_eq!(posterior.get(1, 2), 1.0);
    assert_eq!(posterior.get(1, 0), 0.0);
}

#[test]
fn actor_belief_tracks_a_dealt_game() {
    let config = NormalizerConfig::default();
    let mut registry = PlayerRegistry::new();
    let ids: Vec<PlayerId> = (0..6)
        .map(|index| registry.register(format!("seat-{index}")).unwrap())
        .collect();
    let mut state = GameState::deal(&ids, 2024).unwrap();
    let roles = state.starting().roles().to_vec();
    let mut insider = AgentBelief::new(0, state.seating().len());

    let moves = [(0, 3, true), (1, 4, false), (2, 0, true), (3, 5, true)];
    for (seat, target, genuine) in moves {
        assert_eq!(state.current_seat(), seat);
        state.swap(seat, target, genuine).unwrap();
        // Seat 0 is told the truth about every swap in this scenario.
        let event: BeliefEvent<Character> = BeliefEvent::SwapAttempt {
            player_a: seat,
            player_b: target,
            probability: if genuine { 1.0 } else { 0.0 },
        };
        insider = insider.observe(&event, &roles, &config).unwrap();
        state.end_turn();
    }
    assert_eq!(insider.phase(), BeliefPhase::Updated);
    assert_close(
        assignment_accuracy(insider.matrix(), &state.true_columns()),
        1.0,
        1e-12,
    );

    let card = state.character_of(4).unwrap();
    let public_reveal = BeliefEvent::Reveal {
        observer: Audience::Everyone,
        player: 4,
        role: card,
    };
    insider = insider.observe(&public_reveal, &roles, &config).unwrap();
    assert_eq!(insider.revisions(), 5);

    let finished = insider.discard();
    assert!(matches!(
        finished.observe(&public_reveal, &roles, &config),
        Err(BeliefError::Discarded { owner: 0 })
    ));
}
