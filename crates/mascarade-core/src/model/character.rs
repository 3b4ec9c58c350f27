use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Character {
    Judge = 0,
    Bishop = 1,
    King = 2,
    Fool = 3,
    Queen = 4,
    Thief = 5,
    Witch = 6,
    Spy = 7,
    Peasant = 8,
    Cheat = 9,
    Inquisitor = 10,
    Widow = 11,
}

/// Reduced effect applied when a character is claimed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    /// Coins paid from the bank.
    Income(u32),
    TakeCourthouse,
    TakeFromRichest(u32),
    TakeFromNeighbours(u32),
    SwapFortuneWithRichest,
    TopUpTo(u32),
    WinAt(u32),
}

impl Character {
    pub const ALL: [Character; 12] = [
        Character::Judge,
        Character::Bishop,
        Character::King,
        Character::Fool,
        Character::Queen,
        Character::Thief,
        Character::Witch,
        Character::Spy,
        Character::Peasant,
        Character::Cheat,
        Character::Inquisitor,
        Character::Widow,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Character::Judge => "Judge",
            Character::Bishop => "Bishop",
            Character::King => "King",
            Character::Fool => "Fool",
            Character::Queen => "Queen",
            Character::Thief => "Thief",
            Character::Witch => "Witch",
            Character::Spy => "Spy",
            Character::Peasant => "Peasant",
            Character::Cheat => "Cheat",
            Character::Inquisitor => "Inquisitor",
            Character::Widow => "Widow",
        }
    }

    pub const fn power(self) -> Power {
        match self {
            Character::Judge => Power::TakeCourthouse,
            Character::Bishop => Power::TakeFromRichest(2),
            Character::King => Power::Income(3),
            Character::Fool => Power::Income(1),
            Character::Queen => Power::Income(2),
            Character::Thief => Power::TakeFromNeighbours(1),
            Character::Witch => Power::SwapFortuneWithRichest,
            Character::Spy | Character::Inquisitor => Power::Income(1),
            Character::Peasant => Power::Income(1),
            Character::Cheat => Power::WinAt(10),
            Character::Widow => Power::TopUpTo(10),
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Character {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Character::ALL
            .iter()
            .copied()
            .find(|character| character.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown character '{s}'"))
    }
}
