use crate::game::GameError;
use crate::model::character::Character;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 13;
/// With fewer players the table is padded with face-down center cards.
pub const MIN_SLOTS: usize = 6;

const BASIC_EDITION: [Character; 13] = [
    Character::Judge,
    Character::Bishop,
    Character::King,
    Character::Fool,
    Character::Queen,
    Character::Thief,
    Character::Witch,
    Character::Spy,
    Character::Peasant,
    Character::Peasant,
    Character::Cheat,
    Character::Inquisitor,
    Character::Widow,
];

// Row per card of BASIC_EDITION, column per active player count 4..=13.
const ALLOWED: [[u8; 10]; 13] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Judge
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Bishop
    [0, 0, 0, 0, 1, 1, 1, 1, 1, 1], // King
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Fool
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Queen
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 1], // Thief
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Witch
    [0, 0, 0, 1, 0, 0, 1, 1, 1, 1], // Spy
    [0, 0, 0, 0, 1, 1, 1, 1, 1, 1], // Peasant
    [0, 0, 0, 0, 1, 1, 1, 1, 1, 1], // Peasant
    [1, 1, 1, 0, 0, 1, 1, 1, 1, 1], // Cheat
    [0, 0, 0, 0, 0, 0, 0, 1, 1, 1], // Inquisitor
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 1], // Widow
];

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Character>,
}

impl Deck {
    /// Cards in play for `active_players`, in basic-edition order.
    pub fn for_players(active_players: usize) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&active_players) {
            return Err(GameError::PlayerCount {
                count: active_players,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        let column = active_players - MIN_PLAYERS;
        let cards = BASIC_EDITION
            .iter()
            .zip(ALLOWED.iter())
            .filter(|(_, allowed)| allowed[column] == 1)
            .map(|(card, _)| *card)
            .collect();
        Ok(Self { cards })
    }

    /// Number of card slots on the table, counting center cards.
    pub fn slots_for(active_players: usize) -> usize {
        active_players.max(MIN_SLOTS)
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.cards.shuffle(rng);
        self
    }

    pub fn shuffled_with_seed(self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        self.shuffled(&mut rng)
    }

    pub fn cards(&self) -> &[Character] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
