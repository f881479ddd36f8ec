//! Pot resolution at the end of a hand.

use std::collections::BTreeMap;

use crate::engine::{compute_pots, Chips, Pot, SeatId, SeatState};

/// Who won what.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Seats that won at least one pot slice.
    pub winners: Vec<SeatId>,
    /// Chips awarded per seat.
    pub payouts: BTreeMap<SeatId, Chips>,
    /// The pots as contested.
    pub pots: Vec<Pot>,
}

/// Everyone folded to one player; the whole pot is theirs, no reveals
/// needed.
pub fn settle_fold_win(seats: &[SeatState], winner: SeatId) -> Settlement {
    let pot: Chips = seats.iter().map(|s| s.total_bet).sum();
    let mut payouts = BTreeMap::new();
    payouts.insert(winner, pot);
    Settlement {
        winners: vec![winner],
        payouts,
        pots: vec![Pot {
            amount: pot,
            eligible: vec![winner],
        }],
    }
}

/// Showdown settlement.
///
/// `ranks` holds the verified hand rank of every seat that revealed; seats
/// in the hand that missed their reveal forfeit every pot they were
/// eligible for. Each pot goes to the lowest rank among its eligible
/// revealers, split on ties with the odd chip to the first winner clockwise
/// from the dealer.
pub fn settle_showdown(
    seats: &[SeatState],
    dealer: SeatId,
    ranks: &BTreeMap<SeatId, u16>,
) -> Settlement {
    let pots = compute_pots(seats);
    let mut payouts: BTreeMap<SeatId, Chips> = BTreeMap::new();
    let mut winners: Vec<SeatId> = Vec::new();

    for pot in &pots {
        let candidates: Vec<SeatId> = pot
            .eligible
            .iter()
            .copied()
            .filter(|seat| ranks.contains_key(seat))
            .collect();
        // If every eligible seat forfeited its reveal, the slice is split
        // among them rather than burned.
        let contenders = if candidates.is_empty() {
            pot.eligible.clone()
        } else {
            let best = candidates
                .iter()
                .map(|seat| ranks[seat])
                .min()
                .expect("candidates nonempty");
            candidates
                .into_iter()
                .filter(|seat| ranks[seat] == best)
                .collect()
        };
        if contenders.is_empty() {
            continue;
        }

        let ordered = clockwise_from_dealer(&contenders, dealer);
        let share = pot.amount / ordered.len() as Chips;
        let remainder = pot.amount % ordered.len() as Chips;
        for (position, seat) in ordered.iter().enumerate() {
            let mut award = share;
            if position == 0 {
                award += remainder;
            }
            if award > 0 {
                *payouts.entry(*seat).or_default() += award;
            }
            if !winners.contains(seat) {
                winners.push(*seat);
            }
        }
    }

    Settlement {
        winners,
        payouts,
        pots,
    }
}

/// Orders seats by clockwise distance from the seat after the dealer.
fn clockwise_from_dealer(seats: &[SeatId], dealer: SeatId) -> Vec<SeatId> {
    let mut ordered = seats.to_vec();
    ordered.sort_by_key(|&seat| {
        let distance = (seat as i16 - dealer as i16 - 1).rem_euclid(10);
        distance as u8
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: SeatId, total_bet: Chips, folded: bool) -> SeatState {
        let mut s = SeatState::new(id, 0);
        s.total_bet = total_bet;
        s.folded = folded;
        s
    }

    #[test]
    fn fold_win_collects_the_blinds() {
        // Heads-up: dealer folds the small blind to the big blind.
        let seats = [seat(0, 1, true), seat(1, 2, false)];
        let settlement = settle_fold_win(&seats, 1);
        assert_eq!(settlement.payouts[&1], 3);
        assert_eq!(settlement.winners, vec![1]);
    }

    #[test]
    fn tie_splits_an_even_pot_cleanly() {
        // Checked-down hand, both reveal the same rank: 4-chip pot splits
        // 2/2 with no odd chip.
        let seats = [seat(0, 2, false), seat(1, 2, false)];
        let mut ranks = BTreeMap::new();
        ranks.insert(0, 3000);
        ranks.insert(1, 3000);
        let settlement = settle_showdown(&seats, 0, &ranks);
        assert_eq!(settlement.payouts[&0], 2);
        assert_eq!(settlement.payouts[&1], 2);
        assert_eq!(settlement.winners.len(), 2);
    }

    #[test]
    fn odd_chip_goes_clockwise_from_the_dealer() {
        let seats = [seat(0, 3, false), seat(1, 2, false)];
        let mut ranks = BTreeMap::new();
        ranks.insert(0, 100);
        ranks.insert(1, 100);
        // Dealer is seat 0, so seat 1 is first clockwise and takes the odd
        // chip.
        let settlement = settle_showdown(&seats, 0, &ranks);
        assert_eq!(settlement.payouts[&1], 3);
        assert_eq!(settlement.payouts[&0], 2);
    }

    #[test]
    fn side_pot_goes_to_its_only_eligible_seat() {
        // P0 all-in 20; P1 and P2 at 50. P0 has the best hand overall: P0
        // takes the 60 main pot, the 60 side pot falls to the better of P1
        // and P2.
        let seats = [seat(0, 20, false), seat(1, 50, false), seat(2, 50, false)];
        let mut ranks = BTreeMap::new();
        ranks.insert(0, 10);
        ranks.insert(1, 500);
        ranks.insert(2, 800);
        let settlement = settle_showdown(&seats, 0, &ranks);
        assert_eq!(settlement.payouts[&0], 60);
        assert_eq!(settlement.payouts[&1], 60);
        assert!(settlement.payouts.get(&2).is_none());
        let total: Chips = settlement.payouts.values().sum();
        assert_eq!(total, 120);
    }

    #[test]
    fn forfeited_reveal_loses_to_any_revealed_hand() {
        let seats = [seat(0, 30, false), seat(1, 30, false)];
        let mut ranks = BTreeMap::new();
        ranks.insert(1, 7000); // weak, but the only reveal
        let settlement = settle_showdown(&seats, 0, &ranks);
        assert_eq!(settlement.payouts[&1], 60);
        assert!(settlement.payouts.get(&0).is_none());
    }

    #[test]
    fn pot_amounts_always_sum_to_the_table_total() {
        let seats = [
            seat(0, 10, false),
            seat(1, 40, true),
            seat(2, 100, false),
            seat(3, 100, false),
        ];
        let mut ranks = BTreeMap::new();
        ranks.insert(0, 1);
        ranks.insert(2, 2);
        ranks.insert(3, 3);
        let settlement = settle_showdown(&seats, 3, &ranks);
        let paid: Chips = settlement.payouts.values().sum();
        let table: Chips = seats.iter().map(|s| s.total_bet).sum();
        assert_eq!(paid, table);
    }
}
