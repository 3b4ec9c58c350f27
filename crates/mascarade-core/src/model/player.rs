use crate::model::deck::Deck;
use crate::model::registry::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatKind {
    Player(PlayerId),
    /// Center card standing in for a missing player; never acts, holds no coins.
    Table,
}

/// Seat order around the table. Players come first, center cards last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    seats: Vec<SeatKind>,
}

impl Seating {
    pub fn new(players: &[PlayerId]) -> Self {
        let mut seats: Vec<SeatKind> = players.iter().copied().map(SeatKind::Player).collect();
        seats.resize(Deck::slots_for(players.len()), SeatKind::Table);
        Self { seats }
    }

    pub fn from_seats(seats: Vec<SeatKind>) -> Self {
        Self { seats }
    }

    pub fn seats(&self) -> &[SeatKind] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn player_at(&self, seat: usize) -> Option<PlayerId> {
        match self.seats.get(seat) {
            Some(SeatKind::Player(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn is_active(&self, seat: usize) -> bool {
        self.player_at(seat).is_some()
    }

    pub fn active_seats(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.seats.len()).filter(|seat| self.is_active(*seat))
    }

    pub fn active_count(&self) -> usize {
        self.active_seats().count()
    }

    pub fn left_of(&self, seat: usize) -> usize {
        (seat + 1) % self.seats.len()
    }

    pub fn right_of(&self, seat: usize) -> usize {
        (seat + self.seats.len() - 1) % self.seats.len()
    }

    /// First active seat clockwise from `seat`, skipping center cards.
    pub fn next_active(&self, seat: usize) -> usize {
        let mut candidate = self.left_of(seat);
        for _ in 0..self.seats.len() {
            if self.is_active(candidate) {
                return candidate;
            }
            candidate = self.left_of(candidate);
        }
        seat
    }

    /// Nearest active seats to the right and to the left of `seat`.
    pub fn active_neighbours(&self, seat: usize) -> (usize, usize) {
        let mut right = self.right_of(seat);
        for _ in 0..self.seats.len() {
            if self.is_active(right) {
                break;
            }
            right = self.right_of(right);
        }
        (right, self.next_active(seat))
    }

    /// Active seats in turn order starting after `seat`.
    pub fn others_in_order(&self, seat: usize) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.seats.len());
        let mut candidate = self.left_of(seat);
        while candidate != seat {
            if self.is_active(candidate) {
                order.push(candidate);
            }
            candidate = self.left_of(candidate);
        }
        order
    }
}
