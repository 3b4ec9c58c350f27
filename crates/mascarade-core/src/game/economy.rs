use crate::model::character::Power;
use crate::model::player::Seating;
use serde::{Deserialize, Serialize};

pub const TOTAL_COINS: u32 = 194;
pub const STARTING_COINS: u32 = 6;
/// Reaching this many coins ends the game.
pub const WINNING_COINS: u32 = 13;
pub const FINE: u32 = 1;

/// Coins held by each seat, the bank and the courthouse. The total never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    coins: Vec<u32>,
    bank: u32,
    courthouse: u32,
}

impl Treasury {
    pub fn new(seating: &Seating) -> Self {
        let coins: Vec<u32> = (0..seating.len())
            .map(|seat| {
                if seating.is_active(seat) {
                    STARTING_COINS
                } else {
                    0
                }
            })
            .collect();
        let handed_out: u32 = coins.iter().sum();
        Self {
            coins,
            bank: TOTAL_COINS.saturating_sub(handed_out),
            courthouse: 0,
        }
    }

    pub fn from_parts(coins: Vec<u32>, bank: u32, courthouse: u32) -> Self {
        Self {
            coins,
            bank,
            courthouse,
        }
    }

    pub fn coins(&self, seat: usize) -> u32 {
        self.coins.get(seat).copied().unwrap_or(0)
    }

    pub fn all(&self) -> &[u32] {
        &self.coins
    }

    pub fn bank(&self) -> u32 {
        self.bank
    }

    pub fn courthouse(&self) -> u32 {
        self.courthouse
    }

    pub fn total(&self) -> u32 {
        self.coins.iter().sum::<u32>() + self.bank + self.courthouse
    }

    /// Moves up to `amount` coins from `seat` to the courthouse; returns what was paid.
    pub fn pay_fine(&mut self, seat: usize, amount: u32) -> u32 {
        let Some(purse) = self.coins.get_mut(seat) else {
            return 0;
        };
        let paid = amount.min(*purse);
        *purse -= paid;
        self.courthouse += paid;
        paid
    }

    fn pay_from_bank(&mut self, seat: usize, amount: u32) -> u32 {
        let Some(purse) = self.coins.get_mut(seat) else {
            return 0;
        };
        let paid = amount.min(self.bank);
        self.bank -= paid;
        *purse += paid;
        paid
    }

    fn transfer(&mut self, from: usize, to: usize, amount: u32) -> u32 {
        if from == to || from >= self.coins.len() || to >= self.coins.len() {
            return 0;
        }
        let paid = amount.min(self.coins[from]);
        self.coins[from] -= paid;
        self.coins[to] += paid;
        paid
    }

    /// Richest active seat; ties go to the lowest seat.
    pub fn richest(&self, seating: &Seating) -> Option<usize> {
        self.richest_among(seating.active_seats())
    }

    pub fn richest_other(&self, seating: &Seating, seat: usize) -> Option<usize> {
        self.richest_among(seating.active_seats().filter(|other| *other != seat))
    }

    fn richest_among(&self, seats: impl Iterator<Item = usize>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for seat in seats {
            match best {
                Some(current) if self.coins(seat) <= self.coins(current) => {}
                _ => best = Some(seat),
            }
        }
        best
    }

    /// Applies a claimed power for `seat`. Returns the seat that won outright, if any.
    pub fn apply_power(&mut self, seating: &Seating, seat: usize, power: Power) -> Option<usize> {
        match power {
            Power::Income(amount) => {
                self.pay_from_bank(seat, amount);
            }
            Power::TakeCourthouse => {
                let amount = self.courthouse;
                self.courthouse = 0;
                if let Some(purse) = self.coins.get_mut(seat) {
                    *purse += amount;
                } else {
                    self.courthouse = amount;
                }
            }
            Power::TakeFromRichest(amount) => {
                if let Some(richest) = self.richest_other(seating, seat) {
                    self.transfer(richest, seat, amount);
                }
            }
            Power::TakeFromNeighbours(amount) => {
                let (right, left) = seating.active_neighbours(seat);
                self.transfer(right, seat, amount);
                if left != right {
                    self.transfer(left, seat, amount);
                }
            }
            Power::SwapFortuneWithRichest => {
                if let Some(richest) = self.richest_other(seating, seat)
                    && seat < self.coins.len()
                {
                    self.coins.swap(seat, richest);
                }
            }
            Power::TopUpTo(target) => {
                let missing = target.saturating_sub(self.coins(seat));
                self.pay_from_bank(seat, missing);
            }
            Power::WinAt(threshold) => {
                if self.coins(seat) >= threshold {
                    return Some(seat);
                }
            }
        }
        None
    }

    /// True once an active seat is broke or has reached [`WINNING_COINS`].
    pub fn is_settled(&self, seating: &Seating) -> bool {
        seating.active_seats().any(|seat| {
            let coins = self.coins(seat);
            coins == 0 || coins >= WINNING_COINS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::{PlayerId, PlayerRegistry};

    fn seating(players: usize) -> Seating {
        let mut registry = PlayerRegistry::new();
        let ids: Vec<PlayerId> = (0..players)
            .map(|index| registry.register(format!("p{index}")).unwrap())
            .collect();
        Seating::new(&ids)
    }

    #[test]
    fn starting_purses_leave_the_rest_in_the_bank() {
        let seats = seating(4);
        let treasury = Treasury::new(&seats);
        assert_eq!(treasury.all(), &[6, 6, 6, 6, 0, 0]);
        assert_eq!(treasury.bank(), TOTAL_COINS - 24);
        assert_eq!(treasury.total(), TOTAL_COINS);
    }

    #[test]
    fn fines_fill_the_courthouse_and_judge_empties_it() {
        let seats = seating(4);
        let mut treasury = Treasury::new(&seats);
        assert_eq!(treasury.pay_fine(1, FINE), 1);
        assert_eq!(treasury.pay_fine(2, FINE), 1);
        assert_eq!(treasury.courthouse(), 2);

        treasury.apply_power(&seats, 0, Power::TakeCourthouse);
        assert_eq!(treasury.coins(0), 8);
        assert_eq!(treasury.courthouse(), 0);
        assert_eq!(treasury.total(), TOTAL_COINS);
    }

    #[test]
    fn thief_takes_from_active_neighbours_only() {
        let seats = seating(4);
        let mut treasury = Treasury::new(&seats);
        treasury.apply_power(&seats, 0, Power::TakeFromNeighbours(1));
        assert_eq!(treasury.all(), &[8, 5, 6, 5, 0, 0]);
    }

    #[test]
    fn witch_swaps_with_richest_other() {
        let seats = seating(4);
        let mut treasury = Treasury::from_parts(vec![2, 9, 9, 6, 0, 0], 168, 0);
        treasury.apply_power(&seats, 0, Power::SwapFortuneWithRichest);
        assert_eq!(treasury.all(), &[9, 2, 9, 6, 0, 0]);
    }

    #[test]
    fn widow_tops_up_and_cheat_wins_at_threshold() {
        let seats = seating(4);
        let mut treasury = Treasury::from_parts(vec![3, 10, 6, 6, 0, 0], 169, 0);
        treasury.apply_power(&seats, 0, Power::TopUpTo(10));
        assert_eq!(treasury.coins(0), 10);
        assert_eq!(treasury.apply_power(&seats, 1, Power::WinAt(10)), Some(1));
        assert_eq!(treasury.apply_power(&seats, 2, Power::WinAt(10)), None);
    }

    #[test]
    fn settles_on_broke_or_rich_seat() {
        let seats = seating(4);
        let treasury = Treasury::from_parts(vec![6, 6, 6, 6, 0, 0], 170, 0);
        assert!(!treasury.is_settled(&seats));
        let broke = Treasury::from_parts(vec![0, 6, 6, 12, 0, 0], 170, 0);
        assert!(broke.is_settled(&seats));
        let rich = Treasury::from_parts(vec![13, 6, 6, 6, 0, 0], 163, 0);
        assert!(rich.is_settled(&seats));
        assert_eq!(rich.richest(&seats), Some(0));
    }
}
