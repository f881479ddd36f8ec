//! Human-readable hand descriptions for showdown broadcasts.

use super::cards::{rank_name, rank_name_plural, rank_of};
use super::eval::EvaluatedHand;
use super::tables::HandCategory;

/// Describes an evaluated hand, e.g. "Royal Flush" or
/// "Two Pair, Kings and Fours".
pub fn describe_hand(hand: &EvaluatedHand) -> String {
    let mut ranks: Vec<u8> = hand.cards.iter().map(|&c| rank_of(c)).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    match hand.category {
        HandCategory::StraightFlush => {
            let high = straight_high(&ranks);
            if high == 14 {
                "Royal Flush".to_string()
            } else {
                format!("Straight Flush, {} High", rank_name(high))
            }
        }
        HandCategory::FourOfAKind => {
            let quad = rank_with_count(&ranks, 4);
            format!("Four of a Kind, {}", rank_name_plural(quad))
        }
        HandCategory::FullHouse => {
            let trips = rank_with_count(&ranks, 3);
            let pair = rank_with_count(&ranks, 2);
            format!(
                "Full House, {} over {}",
                rank_name_plural(trips),
                rank_name_plural(pair)
            )
        }
        HandCategory::Flush => format!("Flush, {} High", rank_name(ranks[0])),
        HandCategory::Straight => {
            format!("Straight, {} High", rank_name(straight_high(&ranks)))
        }
        HandCategory::ThreeOfAKind => {
            let trips = rank_with_count(&ranks, 3);
            format!("Three of a Kind, {}", rank_name_plural(trips))
        }
        HandCategory::TwoPair => {
            let mut pairs: Vec<u8> = distinct_ranks(&ranks)
                .into_iter()
                .filter(|&r| count_rank(&ranks, r) == 2)
                .collect();
            pairs.sort_unstable_by(|a, b| b.cmp(a));
            format!(
                "Two Pair, {} and {}",
                rank_name_plural(pairs[0]),
                rank_name_plural(pairs[1])
            )
        }
        HandCategory::OnePair => {
            let pair = rank_with_count(&ranks, 2);
            format!("Pair of {}", rank_name_plural(pair))
        }
        HandCategory::HighCard => format!("{} High", rank_name(ranks[0])),
    }
}

/// High card of a straight from descending ranks; the wheel counts as
/// 5-high.
fn straight_high(ranks_desc: &[u8]) -> u8 {
    if ranks_desc == [14, 5, 4, 3, 2] {
        5
    } else {
        ranks_desc[0]
    }
}

fn count_rank(ranks: &[u8], rank: u8) -> usize {
    ranks.iter().filter(|&&r| r == rank).count()
}

fn rank_with_count(ranks: &[u8], count: usize) -> u8 {
    *ranks
        .iter()
        .find(|&&r| count_rank(ranks, r) == count)
        .expect("category guarantees the multiplicity")
}

fn distinct_ranks(ranks: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for &r in ranks {
        if !out.contains(&r) {
            out.push(r);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::showdown::eval::evaluate_five;
    use crate::showdown::tables::RankTables;

    fn card(rank: u8, suit: u8) -> u8 {
        suit * 13 + (rank - 2)
    }

    #[test]
    fn descriptions_cover_the_categories() {
        let tables = RankTables::build();
        let cases: Vec<([u8; 5], &str)> = vec![
            (
                [card(14, 3), card(13, 3), card(12, 3), card(11, 3), card(10, 3)],
                "Royal Flush",
            ),
            (
                [card(9, 1), card(8, 1), card(7, 1), card(6, 1), card(5, 1)],
                "Straight Flush, Nine High",
            ),
            (
                [card(7, 0), card(7, 1), card(7, 2), card(7, 3), card(2, 0)],
                "Four of a Kind, Sevens",
            ),
            (
                [card(10, 0), card(10, 1), card(10, 2), card(4, 0), card(4, 1)],
                "Full House, Tens over Fours",
            ),
            (
                [card(13, 2), card(11, 2), card(9, 2), card(5, 2), card(2, 2)],
                "Flush, King High",
            ),
            (
                [card(14, 0), card(5, 1), card(4, 2), card(3, 3), card(2, 0)],
                "Straight, Five High",
            ),
            (
                [card(3, 0), card(3, 1), card(3, 2), card(14, 0), card(9, 1)],
                "Three of a Kind, Threes",
            ),
            (
                [card(13, 0), card(13, 1), card(4, 2), card(4, 3), card(8, 0)],
                "Two Pair, Kings and Fours",
            ),
            (
                [card(11, 0), card(11, 1), card(9, 2), card(6, 3), card(2, 0)],
                "Pair of Jacks",
            ),
            (
                [card(14, 0), card(12, 1), card(9, 2), card(6, 3), card(2, 0)],
                "Ace High",
            ),
        ];
        for (cards, expected) in cases {
            let hand = evaluate_five(&tables, cards).unwrap();
            assert_eq!(describe_hand(&hand), expected, "cards {cards:?}");
        }
    }
}
