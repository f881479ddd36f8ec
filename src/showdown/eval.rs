//! Best-hand evaluation via the prime-product tables.

use thiserror::Error;

use super::cards::{card_prime, suit_of};
use super::tables::{HandCategory, RankTables};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("card index {0} is out of range")]
    CardOutOfRange(u8),
    #[error("hand contains a duplicate card")]
    DuplicateCard,
    #[error("prime product {0} matches no equivalence class")]
    UnknownClass(u64),
}

/// Result of evaluating five concrete cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatedHand {
    /// Global rank 0..7461; lower is better.
    pub rank: u16,
    pub category: HandCategory,
    pub is_flush: bool,
    /// Product of the five rank primes; the table lookup key.
    pub lookup_key: u64,
    /// The five deck indices, as chosen.
    pub cards: [u8; 5],
}

/// Evaluates exactly five cards.
pub fn evaluate_five(tables: &RankTables, cards: [u8; 5]) -> Result<EvaluatedHand, EvalError> {
    for (i, &card) in cards.iter().enumerate() {
        if card >= 52 {
            return Err(EvalError::CardOutOfRange(card));
        }
        if cards[..i].contains(&card) {
            return Err(EvalError::DuplicateCard);
        }
    }
    let is_flush = cards.iter().all(|&c| suit_of(c) == suit_of(cards[0]));
    let lookup_key: u64 = cards.iter().map(|&c| card_prime(c)).product();
    let class = tables
        .lookup(lookup_key, is_flush)
        .ok_or(EvalError::UnknownClass(lookup_key))?;
    debug_assert_eq!(class.category.is_flush(), is_flush);
    Ok(EvaluatedHand {
        rank: class.rank,
        category: class.category,
        is_flush,
        lookup_key,
        cards,
    })
}

/// Best five-card hand out of two hole cards and five board cards.
pub fn best_five_of_seven(
    tables: &RankTables,
    hole: [u8; 2],
    board: [u8; 5],
) -> Result<EvaluatedHand, EvalError> {
    let all: [u8; 7] = [
        hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
    ];
    let mut best: Option<EvaluatedHand> = None;
    // All 21 ways to drop two of the seven.
    for skip_a in 0..7 {
        for skip_b in (skip_a + 1)..7 {
            let mut five = [0u8; 5];
            let mut n = 0;
            for (i, &card) in all.iter().enumerate() {
                if i != skip_a && i != skip_b {
                    five[n] = card;
                    n += 1;
                }
            }
            let hand = evaluate_five(tables, five)?;
            if best.map_or(true, |b| hand.rank < b.rank) {
                best = Some(hand);
            }
        }
    }
    // Seven cards always contain at least one valid five-card hand.
    Ok(best.expect("21 subsets evaluated"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::showdown::tables::RankTables;
    use once_cell::sync::Lazy;

    static TABLES: Lazy<RankTables> = Lazy::new(RankTables::build);

    /// Card index from rank 2..=14 and suit 0..=3.
    fn card(rank: u8, suit: u8) -> u8 {
        suit * 13 + (rank - 2)
    }

    #[test]
    fn royal_flush_beats_four_of_a_kind() {
        // Board Q♠ J♠ T♠ 2♥ 2♦: A♠K♠ completes a royal flush, 2♣2♠ quad twos.
        let board = [card(12, 3), card(11, 3), card(10, 3), card(2, 0), card(2, 1)];
        let royal = best_five_of_seven(&TABLES, [card(14, 3), card(13, 3)], board).unwrap();
        assert_eq!(royal.rank, 0);
        assert_eq!(royal.category, HandCategory::StraightFlush);
        assert!(royal.is_flush);

        let quads = best_five_of_seven(&TABLES, [card(2, 2), card(2, 3)], board).unwrap();
        assert_eq!(quads.category, HandCategory::FourOfAKind);
        assert!(royal.rank < quads.rank);
    }

    #[test]
    fn wheel_is_the_weakest_straight() {
        let wheel = evaluate_five(
            &TABLES,
            [card(14, 0), card(2, 1), card(3, 2), card(4, 3), card(5, 0)],
        )
        .unwrap();
        assert_eq!(wheel.category, HandCategory::Straight);

        let six_high = evaluate_five(
            &TABLES,
            [card(6, 0), card(2, 1), card(3, 2), card(4, 3), card(5, 0)],
        )
        .unwrap();
        assert!(six_high.rank < wheel.rank);
    }

    #[test]
    fn best_five_prefers_the_board_when_hole_cards_do_not_help() {
        // Board is a made flush; hole cards are offsuit rags.
        let board = [card(2, 2), card(5, 2), card(9, 2), card(11, 2), card(13, 2)];
        let hand = best_five_of_seven(&TABLES, [card(3, 0), card(4, 1)], board).unwrap();
        assert_eq!(hand.category, HandCategory::Flush);
        assert_eq!(hand.cards.to_vec(), {
            let mut sorted = board.to_vec();
            sorted.sort_unstable();
            let mut chosen = hand.cards.to_vec();
            chosen.sort_unstable();
            chosen
        });
    }

    #[test]
    fn kickers_break_pair_ties() {
        let low_kicker = evaluate_five(
            &TABLES,
            [card(9, 0), card(9, 1), card(5, 2), card(4, 3), card(3, 0)],
        )
        .unwrap();
        let high_kicker = evaluate_five(
            &TABLES,
            [card(9, 0), card(9, 1), card(14, 2), card(4, 3), card(3, 0)],
        )
        .unwrap();
        assert_eq!(low_kicker.category, HandCategory::OnePair);
        assert!(high_kicker.rank < low_kicker.rank);
    }

    #[test]
    fn duplicate_and_out_of_range_cards_are_rejected() {
        assert_eq!(
            evaluate_five(&TABLES, [0, 0, 1, 2, 3]),
            Err(EvalError::DuplicateCard)
        );
        assert_eq!(
            evaluate_five(&TABLES, [0, 1, 2, 3, 52]),
            Err(EvalError::CardOutOfRange(52))
        );
    }
}
