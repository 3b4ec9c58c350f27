use super::GameError;
use super::economy::Treasury;
use super::state::GameState;
use crate::model::character::Character;
use crate::model::lineup::{Assignment, CardSlot, StartingAssignment};
use crate::model::player::{SeatKind, Seating};
use serde::{Deserialize, Serialize};

/// Referee-side snapshot of a game in progress. Histories are not included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub seed: u64,
    pub turn: u32,
    pub current_seat: usize,
    pub seats: Vec<SeatKind>,
    pub starting: Vec<Character>,
    pub holding: Vec<usize>,
    pub coins: Vec<u32>,
    pub bank: u32,
    pub courthouse: u32,
    pub revealed: Vec<bool>,
    pub winner: Option<usize>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            seed: state.seed(),
            turn: state.turn(),
            current_seat: state.current_seat(),
            seats: state.seating().seats().to_vec(),
            starting: state.starting().roles().to_vec(),
            holding: state.true_columns(),
            coins: state.treasury().all().to_vec(),
            bank: state.treasury().bank(),
            courthouse: state.treasury().courthouse(),
            revealed: state.revealed().to_vec(),
            winner: state.winner(),
        }
    }

    pub fn restore(self) -> Result<GameState, GameError> {
        let seats = self.seats.len();
        let lengths = [
            ("starting", self.starting.len()),
            ("holding", self.holding.len()),
            ("coins", self.coins.len()),
            ("revealed", self.revealed.len()),
        ];
        if let Some((field, len)) = lengths.iter().find(|(_, len)| *len != seats) {
            return Err(GameError::InvalidSnapshot {
                message: format!("{field} has {len} entries for {seats} seats"),
            });
        }
        let mut seen = vec![false; seats];
        for &column in &self.holding {
            if column >= seats || seen[column] {
                return Err(GameError::InvalidSnapshot {
                    message: format!("holding is not a permutation (column {column})"),
                });
            }
            seen[column] = true;
        }
        let seating = Seating::from_seats(self.seats);
        if !seating.is_active(self.current_seat) {
            return Err(GameError::InvalidSnapshot {
                message: format!("seat {} cannot be on turn", self.current_seat),
            });
        }
        Ok(GameState::from_parts(
            self.seed,
            seating,
            StartingAssignment::new(self.starting),
            Assignment::from_slots(self.holding.into_iter().map(CardSlot).collect()),
            Treasury::from_parts(self.coins, self.bank, self.courthouse),
            self.revealed,
            self.turn,
            self.current_seat,
            self.winner,
        ))
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
