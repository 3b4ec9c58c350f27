//! Referee, public and per-seat views of what happened during a game.

use crate::model::character::Character;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// `genuine` is hidden (`None`) from anyone but the swapper and the referee.
    Swapped {
        target: usize,
        genuine: Option<bool>,
    },
    LookedAtCard,
    /// Private to the seat that looked.
    SawOwnCard {
        character: Character,
    },
    Announced {
        character: Character,
    },
    Challenged {
        character: Character,
    },
    Revealed {
        character: Character,
    },
    UsedPower {
        character: Character,
    },
    Fined {
        amount: u32,
    },
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub turn: u32,
    pub seat: usize,
    pub kind: EventKind,
}

impl HistoryEntry {
    pub fn new(turn: u32, seat: usize, kind: EventKind) -> Self {
        Self { turn, seat, kind }
    }

    pub fn is_public(&self) -> bool {
        !matches!(self.kind, EventKind::SawOwnCard { .. })
    }

    /// Copy with swap genuineness removed.
    pub fn masked(&self) -> Self {
        let kind = match &self.kind {
            EventKind::Swapped { target, .. } => EventKind::Swapped {
                target: *target,
                genuine: None,
            },
            other => other.clone(),
        };
        Self {
            turn: self.turn,
            seat: self.seat,
            kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded during `turn`.
    pub fn turn(&self, turn: u32) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |entry| entry.turn == turn)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}

/// All three views kept in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameLog {
    truth: History,
    public: History,
    private: Vec<History>,
}

impl GameLog {
    pub fn new(seats: usize) -> Self {
        Self {
            truth: History::new(),
            public: History::new(),
            private: vec![History::new(); seats],
        }
    }

    /// Records `entry`; `insiders` see it unmasked, everyone else sees the public copy.
    /// Private entries reach the referee and the insiders only.
    pub fn record(&mut self, entry: HistoryEntry, insiders: &[usize]) {
        let public = entry.is_public();
        let masked = entry.masked();
        for (seat, history) in self.private.iter_mut().enumerate() {
            if insiders.contains(&seat) {
                history.push(entry.clone());
            } else if public {
                history.push(masked.clone());
            }
        }
        if public {
            self.public.push(masked);
        }
        self.truth.push(entry);
    }

    pub fn truth(&self) -> &History {
        &self.truth
    }

    pub fn public(&self) -> &History {
        &self.public
    }

    pub fn private(&self, seat: usize) -> Option<&History> {
        self.private.get(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_genuineness_only_reaches_insiders() {
        let mut log = GameLog::new(3);
        let entry = HistoryEntry::new(
            0,
            0,
            EventKind::Swapped {
                target: 1,
                genuine: Some(false),
            },
        );
        log.record(entry.clone(), &[0]);

        assert_eq!(log.truth().last(), Some(&entry));
        assert_eq!(log.private(0).and_then(History::last), Some(&entry));
        let masked = log.public().last().unwrap();
        assert_eq!(
            masked.kind,
            EventKind::Swapped {
                target: 1,
                genuine: None
            }
        );
        assert_eq!(log.private(1).and_then(History::last), Some(masked));
    }

    #[test]
    fn private_observations_stay_private() {
        let mut log = GameLog::new(2);
        log.record(
            HistoryEntry::new(
                5,
                1,
                EventKind::SawOwnCard {
                    character: Character::Spy,
                },
            ),
            &[1],
        );
        assert!(log.public().is_empty());
        assert!(log.private(0).unwrap().is_empty());
        assert_eq!(log.private(1).unwrap().len(), 1);
        assert_eq!(log.truth().turn(5).count(), 1);
    }

    #[test]
    fn history_exports_tagged_json() {
        let mut history = History::new();
        history.push(HistoryEntry::new(
            2,
            3,
            EventKind::Announced {
                character: Character::King,
            },
        ));
        let json = history.to_json().unwrap();
        assert!(json.contains("\"kind\":\"announced\""));
        assert!(json.contains("\"character\":\"King\""));
    }
}
