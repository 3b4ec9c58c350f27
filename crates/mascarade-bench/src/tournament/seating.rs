use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Seat-to-agent mapping for one game: `order[seat]` is the agent index.
pub fn shuffled_order(agents: usize, game_seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..agents).collect();
    let mut rng = StdRng::seed_from_u64(game_seed);
    order.shuffle(&mut rng);
    order
}

/// Per-seat bot seed derived from the agent's own seed and the game seed.
pub fn bot_seed(agent_seed: u64, game_seed: u64, seat: usize) -> u64 {
    let spread = (seat as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    agent_seed ^ game_seed.rotate_left(seat as u32 % 64) ^ spread
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_a_permutation() {
        let mut order = shuffled_order(9, 77);
        order.sort_unstable();
        assert_eq!(order, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_order() {
        assert_eq!(shuffled_order(7, 5), shuffled_order(7, 5));
        let distinct = (0..16)
            .map(|seed| shuffled_order(7, seed))
            .collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn seats_get_distinct_bot_seeds() {
        assert_ne!(bot_seed(1, 42, 0), bot_seed(1, 42, 1));
        assert_eq!(bot_seed(1, 42, 3), bot_seed(1, 42, 3));
    }
}
