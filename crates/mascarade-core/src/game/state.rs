use crate::game::GameError;
use crate::game::action::{Action, ActionMode};
use crate::game::economy::{FINE, Treasury};
use crate::game::history::{EventKind, GameLog, HistoryEntry};
use crate::model::character::{Character, Power};
use crate::model::deck::Deck;
use crate::model::lineup::{Assignment, StartingAssignment};
use crate::model::player::Seating;
use crate::model::registry::PlayerId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opening turns during which every seat may only swap.
pub const SWAP_ONLY_TURNS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementOutcome {
    pub character: Character,
    /// Seats that revealed, with the character they showed. Empty when nobody challenged.
    pub revealed: Vec<(usize, Character)>,
    pub rewarded: Vec<usize>,
    pub fined: Vec<usize>,
    pub winner: Option<usize>,
}

impl AnnouncementOutcome {
    pub fn contested(&self) -> bool {
        !self.revealed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<usize>,
    pub coins: Vec<u32>,
    pub turns: u32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    seed: u64,
    seating: Seating,
    starting: StartingAssignment,
    assignment: Assignment,
    treasury: Treasury,
    revealed: Vec<bool>,
    turn: u32,
    current: usize,
    winner: Option<usize>,
    log: GameLog,
}

impl GameState {
    /// Seats `players` in the given order and deals a deck shuffled from `seed`.
    /// Every card starts face up, so the starting assignment is public.
    pub fn deal(players: &[PlayerId], seed: u64) -> Result<Self, GameError> {
        let deck = Deck::for_players(players.len())?.shuffled_with_seed(seed);
        let seating = Seating::new(players);
        if deck.len() != seating.len() {
            return Err(GameError::InvalidSnapshot {
                message: format!(
                    "deck holds {} cards for {} seats",
                    deck.len(),
                    seating.len()
                ),
            });
        }
        let seats = seating.len();
        let treasury = Treasury::new(&seating);
        let current = seating.active_seats().next().unwrap_or(0);
        Ok(Self {
            seed,
            starting: StartingAssignment::new(deck.cards().to_vec()),
            assignment: Assignment::as_dealt(seats),
            treasury,
            revealed: vec![true; seats],
            turn: 0,
            current,
            winner: None,
            log: GameLog::new(seats),
            seating,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        seed: u64,
        seating: Seating,
        starting: StartingAssignment,
        assignment: Assignment,
        treasury: Treasury,
        revealed: Vec<bool>,
        turn: u32,
        current: usize,
        winner: Option<usize>,
    ) -> Self {
        let seats = seating.len();
        Self {
            seed,
            seating,
            starting,
            assignment,
            treasury,
            revealed,
            turn,
            current,
            winner,
            log: GameLog::new(seats),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    pub fn starting(&self) -> &StartingAssignment {
        &self.starting
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_seat(&self) -> usize {
        self.current
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn is_revealed(&self, seat: usize) -> bool {
        self.revealed.get(seat).copied().unwrap_or(false)
    }

    pub fn character_of(&self, seat: usize) -> Result<Character, GameError> {
        self.assignment
            .slot_of(seat)
            .and_then(|slot| self.starting.character(slot))
            .ok_or(GameError::UnknownSeat { seat })
    }

    /// Starting column of the card each seat currently holds.
    pub fn true_columns(&self) -> Vec<usize> {
        self.assignment.columns()
    }

    pub fn action_mode(&self, seat: usize) -> ActionMode {
        if self.turn < SWAP_ONLY_TURNS || self.is_revealed(seat) {
            ActionMode::SwapOnly
        } else {
            ActionMode::Regular
        }
    }

    pub fn is_over(&self, max_turns: u32) -> bool {
        self.winner.is_some() || self.treasury.is_settled(&self.seating) || self.turn >= max_turns
    }

    fn check_active(&self, seat: usize) -> Result<(), GameError> {
        if seat >= self.seating.len() {
            return Err(GameError::UnknownSeat { seat });
        }
        if !self.seating.is_active(seat) {
            return Err(GameError::TableSeat { seat });
        }
        Ok(())
    }

    /// Checks that `seat` may take `action` right now.
    pub fn validate_action(&self, seat: usize, action: &Action) -> Result<(), GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        self.check_active(seat)?;
        if seat != self.current {
            return Err(GameError::NotYourTurn {
                expected: self.current,
                actual: seat,
            });
        }
        let mode = self.action_mode(seat);
        if !mode.permits(action) {
            return Err(GameError::ActionNotAllowed {
                action: action.label().to_string(),
                mode: mode.to_string(),
            });
        }
        match *action {
            Action::SwapMyCard { target, .. } => {
                if target >= self.seating.len() {
                    return Err(GameError::UnknownSeat { seat: target });
                }
                if target == seat {
                    return Err(GameError::SelfSwap { seat });
                }
            }
            Action::AnnounceCharacter(character) => {
                if !self.starting.contains(character) {
                    return Err(GameError::CharacterNotInPlay {
                        character: character.to_string(),
                    });
                }
            }
            Action::LookAtMyCard => {}
        }
        Ok(())
    }

    /// Swaps (or pretends to swap) the cards of `seat` and `target`. Both end up face down.
    pub fn swap(&mut self, seat: usize, target: usize, genuine: bool) -> Result<(), GameError> {
        self.validate_action(seat, &Action::SwapMyCard { target, genuine })?;
        if genuine {
            self.assignment.swap(seat, target);
        }
        self.revealed[seat] = false;
        self.revealed[target] = false;
        debug!(
            target: "mascarade_core::game",
            turn = self.turn,
            seat,
            swap_target = target,
            genuine,
            "swap"
        );
        self.log.record(
            HistoryEntry::new(
                self.turn,
                seat,
                EventKind::Swapped {
                    target,
                    genuine: Some(genuine),
                },
            ),
            &[seat],
        );
        Ok(())
    }

    /// Privately shows `seat` its current card.
    pub fn look(&mut self, seat: usize) -> Result<Character, GameError> {
        self.validate_action(seat, &Action::LookAtMyCard)?;
        let character = self.character_of(seat)?;
        self.log
            .record(HistoryEntry::new(self.turn, seat, EventKind::LookedAtCard), &[seat]);
        self.log.record(
            HistoryEntry::new(self.turn, seat, EventKind::SawOwnCard { character }),
            &[seat],
        );
        Ok(character)
    }

    /// Resolves an announcement once every challenger has been collected.
    ///
    /// Without challengers the announcer uses the power unrevealed. Otherwise every
    /// contender reveals; holders of `character` use the power and the rest are fined.
    pub fn announce(
        &mut self,
        announcer: usize,
        character: Character,
        challengers: &[usize],
    ) -> Result<AnnouncementOutcome, GameError> {
        self.validate_action(announcer, &Action::AnnounceCharacter(character))?;
        for (index, &challenger) in challengers.iter().enumerate() {
            self.check_active(challenger)?;
            if challenger == announcer || challengers[..index].contains(&challenger) {
                return Err(GameError::InvalidChallenger { seat: challenger });
            }
        }

        let turn = self.turn;
        self.log.record(
            HistoryEntry::new(turn, announcer, EventKind::Announced { character }),
            &[],
        );
        for &challenger in challengers {
            self.log.record(
                HistoryEntry::new(turn, challenger, EventKind::Challenged { character }),
                &[],
            );
        }

        let mut outcome = AnnouncementOutcome {
            character,
            revealed: Vec::new(),
            rewarded: Vec::new(),
            fined: Vec::new(),
            winner: None,
        };

        if challengers.is_empty() {
            outcome.rewarded.push(announcer);
        } else {
            let contenders: Vec<usize> = std::iter::once(announcer)
                .chain(challengers.iter().copied())
                .collect();
            for seat in contenders {
                let shown = self.character_of(seat)?;
                self.revealed[seat] = true;
                self.log.record(
                    HistoryEntry::new(turn, seat, EventKind::Revealed { character: shown }),
                    &[],
                );
                outcome.revealed.push((seat, shown));
                if shown == character {
                    outcome.rewarded.push(seat);
                } else {
                    outcome.fined.push(seat);
                }
            }
        }

        let power = match character {
            Character::Peasant if outcome.contested() && outcome.rewarded.len() == 2 => {
                Power::Income(2)
            }
            other => other.power(),
        };
        for &seat in &outcome.rewarded {
            self.log
                .record(HistoryEntry::new(turn, seat, EventKind::UsedPower { character }), &[]);
            if let Some(winner) = self.treasury.apply_power(&self.seating, seat, power)
                && outcome.winner.is_none()
            {
                outcome.winner = Some(winner);
            }
        }
        for &seat in &outcome.fined {
            let amount = self.treasury.pay_fine(seat, FINE);
            self.log
                .record(HistoryEntry::new(turn, seat, EventKind::Fined { amount }), &[]);
        }

        if let Some(winner) = outcome.winner {
            self.winner = Some(winner);
            self.log
                .record(HistoryEntry::new(turn, winner, EventKind::Won), &[]);
        }
        debug!(
            target: "mascarade_core::game",
            turn,
            announcer,
            character = %character,
            challengers = challengers.len(),
            rewarded = outcome.rewarded.len(),
            fined = outcome.fined.len(),
            "announcement resolved"
        );
        Ok(outcome)
    }

    /// Hands the turn to the next active seat.
    pub fn end_turn(&mut self) {
        self.turn += 1;
        self.current = self.seating.next_active(self.current);
    }

    pub fn finish(&self) -> GameResult {
        GameResult {
            winner: self
                .winner
                .or_else(|| self.treasury.richest(&self.seating)),
            coins: self.treasury.all().to_vec(),
            turns: self.turn,
        }
    }
}
