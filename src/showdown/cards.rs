//! Deck-index conventions shared by the evaluator and the client driver.
//!
//! A deck index `0..52` decomposes as `suit * 13 + (rank - 2)`: suits are
//! hearts, diamonds, clubs, spades; ranks run 2..=14 with 14 the ace.

/// Primes for ranks 2..=14. A 5-card multiset's product is a canonical
/// identifier for its rank distribution.
pub const RANK_PRIMES: [u64; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

pub const RANKS_PER_SUIT: u8 = 13;

/// Rank of a deck index, 2..=14.
pub fn rank_of(card_index: u8) -> u8 {
    2 + card_index % RANKS_PER_SUIT
}

/// Suit of a deck index, 0..=3.
pub fn suit_of(card_index: u8) -> u8 {
    card_index / RANKS_PER_SUIT
}

/// Prime for a rank in 2..=14.
pub fn rank_prime(rank: u8) -> u64 {
    RANK_PRIMES[(rank - 2) as usize]
}

/// Prime for a deck index.
pub fn card_prime(card_index: u8) -> u64 {
    rank_prime(rank_of(card_index))
}

pub fn rank_name(rank: u8) -> &'static str {
    match rank {
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        6 => "Six",
        7 => "Seven",
        8 => "Eight",
        9 => "Nine",
        10 => "Ten",
        11 => "Jack",
        12 => "Queen",
        13 => "King",
        14 => "Ace",
        _ => "?",
    }
}

pub fn rank_name_plural(rank: u8) -> &'static str {
    match rank {
        2 => "Twos",
        3 => "Threes",
        4 => "Fours",
        5 => "Fives",
        6 => "Sixes",
        7 => "Sevens",
        8 => "Eights",
        9 => "Nines",
        10 => "Tens",
        11 => "Jacks",
        12 => "Queens",
        13 => "Kings",
        14 => "Aces",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_indices_decompose_into_rank_and_suit() {
        assert_eq!(rank_of(0), 2);
        assert_eq!(suit_of(0), 0);
        assert_eq!(rank_of(12), 14);
        assert_eq!(rank_of(13), 2);
        assert_eq!(suit_of(13), 1);
        assert_eq!(rank_of(51), 14);
        assert_eq!(suit_of(51), 3);
    }

    #[test]
    fn primes_are_distinct_per_rank() {
        for r in 2..=14u8 {
            for s in (r + 1)..=14 {
                assert_ne!(rank_prime(r), rank_prime(s));
            }
        }
    }
}
