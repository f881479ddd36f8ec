//! Deterministic deck-index layout for a hand.
//!
//! Seat-order position `p` holds deck indices `2p` and `2p + 1`; the five
//! community cards sit immediately after the last hole card.

/// Hole-card deck indices for the player at seat-order position `position`.
pub fn hole_indices(position: usize) -> [u8; 2] {
    [(2 * position) as u8, (2 * position + 1) as u8]
}

/// Community-card deck indices for an `n_players` hand.
pub fn community_indices(n_players: usize) -> [u8; 5] {
    let base = (2 * n_players) as u8;
    [base, base + 1, base + 2, base + 3, base + 4]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn layout_is_disjoint_and_in_range_for_all_table_sizes() {
        for n in 2..=10usize {
            let mut used = BTreeSet::new();
            for position in 0..n {
                for index in hole_indices(position) {
                    assert!((index as usize) < 52);
                    assert!(used.insert(index), "index {index} reused");
                }
            }
            for index in community_indices(n) {
                assert!((index as usize) < 52);
                assert!(used.insert(index), "index {index} reused");
            }
            assert_eq!(used.len(), 2 * n + 5);
        }
    }

    #[test]
    fn heads_up_layout_matches_the_canonical_positions() {
        assert_eq!(hole_indices(0), [0, 1]);
        assert_eq!(hole_indices(1), [2, 3]);
        assert_eq!(community_indices(2), [4, 5, 6, 7, 8]);
    }
}
