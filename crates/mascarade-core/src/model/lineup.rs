//! Ground-truth card placement.
//!
//! Cards are tracked by the slot they were dealt to (`CardSlot`), so two Peasants
//! stay distinguishable for the referee while agents only ever see characters.

use crate::model::character::Character;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardSlot(pub usize);

/// Character dealt to each seat at game start; column `j` of every belief matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingAssignment {
    roles: Vec<Character>,
}

impl StartingAssignment {
    pub fn new(roles: Vec<Character>) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &[Character] {
        &self.roles
    }

    pub fn character(&self, slot: CardSlot) -> Option<Character> {
        self.roles.get(slot.0).copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, character: Character) -> bool {
        self.roles.contains(&character)
    }
}

/// Card currently held by each seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    slots: Vec<CardSlot>,
}

impl Assignment {
    /// Every seat holds the card it was dealt.
    pub fn as_dealt(seats: usize) -> Self {
        Self {
            slots: (0..seats).map(CardSlot).collect(),
        }
    }

    pub fn from_slots(slots: Vec<CardSlot>) -> Self {
        Self { slots }
    }

    pub fn slot_of(&self, seat: usize) -> Option<CardSlot> {
        self.slots.get(seat).copied()
    }

    pub fn swap(&mut self, seat_a: usize, seat_b: usize) {
        self.slots.swap(seat_a, seat_b);
    }

    /// Starting column of the card each seat holds, in seat order.
    pub fn columns(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.0).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
