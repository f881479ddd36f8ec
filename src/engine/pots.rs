use serde::{Deserialize, Serialize};

use super::state::SeatState;
use super::types::{Chips, SeatId};

/// A pot slice and the seats allowed to win it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<SeatId>,
}

/// Side pots from per-seat total contributions, computed at showdown.
///
/// Contribution levels come from the seats still in the hand; every chip on
/// the table (folded contributions included) lands in exactly one slice, so
/// the slice amounts always sum to the pot.
pub fn compute_pots(seats: &[SeatState]) -> Vec<Pot> {
    let mut levels: Vec<Chips> = seats
        .iter()
        .filter(|s| s.in_hand() && s.total_bet > 0)
        .map(|s| s.total_bet)
        .collect();
    levels.sort_unstable();
    levels.dedup();
    if levels.is_empty() {
        return Vec::new();
    }

    let mut pots = Vec::with_capacity(levels.len());
    let mut prev: Chips = 0;
    for &level in &levels {
        let mut amount: Chips = 0;
        for seat in seats {
            amount += seat.total_bet.min(level).saturating_sub(seat.total_bet.min(prev));
        }
        let eligible: Vec<SeatId> = seats
            .iter()
            .filter(|s| s.in_hand() && s.total_bet >= level)
            .map(|s| s.seat)
            .collect();
        pots.push(Pot { amount, eligible });
        prev = level;
    }

    // Folded chips above the highest live level stay in the last pot.
    let leftover: Chips = seats
        .iter()
        .map(|s| s.total_bet.saturating_sub(prev))
        .sum();
    if leftover > 0 {
        if let Some(last) = pots.last_mut() {
            last.amount += leftover;
        }
    }
    pots
}
