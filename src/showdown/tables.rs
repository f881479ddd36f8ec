//! Generation of the 7462 equivalence classes of 5-card hands.
//!
//! Classes are enumerated in global strength order (royal flush first) and
//! assigned ranks `0..7462` as they are produced, so lower rank is always the
//! better hand. The 1287 classes whose five cards share a suit live in the
//! flush table; the remaining 6175 in the basic table. Both are keyed by the
//! product of the five rank primes.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::cards::rank_prime;
use super::merkle::RankMerkleTree;
use crate::curve::BaseField;

pub const BASIC_CLASS_COUNT: usize = 6175;
pub const FLUSH_CLASS_COUNT: usize = 1287;
pub const TOTAL_CLASS_COUNT: usize = BASIC_CLASS_COUNT + FLUSH_CLASS_COUNT;

/// Hand categories, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    OnePair,
    HighCard,
}

impl HandCategory {
    pub fn is_flush(self) -> bool {
        matches!(self, HandCategory::StraightFlush | HandCategory::Flush)
    }
}

/// One equivalence class of 5-card hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandClass {
    pub prime_product: u64,
    pub rank: u16,
    pub category: HandCategory,
}

/// The two ordered class lists with prime-product lookup indexes.
#[derive(Debug)]
pub struct RankTables {
    pub basic: Vec<HandClass>,
    pub flush: Vec<HandClass>,
    basic_index: HashMap<u64, usize>,
    flush_index: HashMap<u64, usize>,
}

impl RankTables {
    pub fn build() -> Self {
        let mut builder = TableBuilder::default();

        // Straight flushes, ace high down to the wheel.
        for high in (5..=14u8).rev() {
            builder.push_flush(HandCategory::StraightFlush, &straight_ranks(high));
        }
        // Four of a kind.
        for quad in (2..=14u8).rev() {
            for kicker in (2..=14u8).rev() {
                if kicker == quad {
                    continue;
                }
                builder.push_basic(
                    HandCategory::FourOfAKind,
                    &[quad, quad, quad, quad, kicker],
                );
            }
        }
        // Full houses.
        for trips in (2..=14u8).rev() {
            for pair in (2..=14u8).rev() {
                if pair == trips {
                    continue;
                }
                builder.push_basic(HandCategory::FullHouse, &[trips, trips, trips, pair, pair]);
            }
        }
        // Flushes: every distinct-rank combination that is not a run.
        for combo in distinct_rank_combos() {
            if !is_run(&combo) {
                builder.push_flush(HandCategory::Flush, &combo);
            }
        }
        // Straights.
        for high in (5..=14u8).rev() {
            builder.push_basic(HandCategory::Straight, &straight_ranks(high));
        }
        // Three of a kind.
        for trips in (2..=14u8).rev() {
            for k1 in (2..=14u8).rev() {
                if k1 == trips {
                    continue;
                }
                for k2 in (2..k1).rev() {
                    if k2 == trips {
                        continue;
                    }
                    builder.push_basic(HandCategory::ThreeOfAKind, &[trips, trips, trips, k1, k2]);
                }
            }
        }
        // Two pair.
        for p1 in (2..=14u8).rev() {
            for p2 in (2..p1).rev() {
                for kicker in (2..=14u8).rev() {
                    if kicker == p1 || kicker == p2 {
                        continue;
                    }
                    builder.push_basic(HandCategory::TwoPair, &[p1, p1, p2, p2, kicker]);
                }
            }
        }
        // One pair.
        for pair in (2..=14u8).rev() {
            for k1 in (2..=14u8).rev() {
                if k1 == pair {
                    continue;
                }
                for k2 in (2..k1).rev() {
                    if k2 == pair {
                        continue;
                    }
                    for k3 in (2..k2).rev() {
                        if k3 == pair {
                            continue;
                        }
                        builder.push_basic(HandCategory::OnePair, &[pair, pair, k1, k2, k3]);
                    }
                }
            }
        }
        // High card: the non-run combinations again, suits mixed.
        for combo in distinct_rank_combos() {
            if !is_run(&combo) {
                builder.push_basic(HandCategory::HighCard, &combo);
            }
        }

        builder.finish()
    }

    pub fn lookup(&self, prime_product: u64, is_flush: bool) -> Option<&HandClass> {
        if is_flush {
            self.flush_index
                .get(&prime_product)
                .map(|&i| &self.flush[i])
        } else {
            self.basic_index
                .get(&prime_product)
                .map(|&i| &self.basic[i])
        }
    }

    /// Position of a class inside its own table; this is the Merkle leaf
    /// index.
    pub fn leaf_index(&self, prime_product: u64, is_flush: bool) -> Option<usize> {
        if is_flush {
            self.flush_index.get(&prime_product).copied()
        } else {
            self.basic_index.get(&prime_product).copied()
        }
    }

    /// The build-time JSON artifact format: decimal prime-product strings to
    /// integer ranks.
    pub fn artifact_map(&self, is_flush: bool) -> HashMap<String, u16> {
        let table = if is_flush { &self.flush } else { &self.basic };
        table
            .iter()
            .map(|class| (class.prime_product.to_string(), class.rank))
            .collect()
    }

    /// Validates an externally generated artifact against the in-process
    /// tables.
    pub fn verify_artifact(&self, json: &str, is_flush: bool) -> Result<(), String> {
        let loaded: HashMap<String, u16> =
            serde_json::from_str(json).map_err(|e| format!("malformed rank artifact: {e}"))?;
        let expected = self.artifact_map(is_flush);
        if loaded != expected {
            return Err("rank artifact disagrees with generated tables".to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
struct TableBuilder {
    next_rank: u16,
    basic: Vec<HandClass>,
    flush: Vec<HandClass>,
}

impl TableBuilder {
    fn class(&mut self, category: HandCategory, ranks: &[u8; 5]) -> HandClass {
        let prime_product: u64 = ranks.iter().map(|&r| rank_prime(r)).product();
        let class = HandClass {
            prime_product,
            rank: self.next_rank,
            category,
        };
        self.next_rank += 1;
        class
    }

    fn push_basic(&mut self, category: HandCategory, ranks: &[u8; 5]) {
        let class = self.class(category, ranks);
        self.basic.push(class);
    }

    fn push_flush(&mut self, category: HandCategory, ranks: &[u8; 5]) {
        let class = self.class(category, ranks);
        self.flush.push(class);
    }

    fn finish(self) -> RankTables {
        let basic_index = self
            .basic
            .iter()
            .enumerate()
            .map(|(i, class)| (class.prime_product, i))
            .collect();
        let flush_index = self
            .flush
            .iter()
            .enumerate()
            .map(|(i, class)| (class.prime_product, i))
            .collect();
        RankTables {
            basic: self.basic,
            flush: self.flush,
            basic_index,
            flush_index,
        }
    }
}

/// Ranks of the straight with the given high card; the 5-high straight is
/// the wheel A-2-3-4-5.
fn straight_ranks(high: u8) -> [u8; 5] {
    if high == 5 {
        [14, 5, 4, 3, 2]
    } else {
        [high, high - 1, high - 2, high - 3, high - 4]
    }
}

/// All C(13,5) distinct-rank combinations in descending-lex order (strongest
/// first).
fn distinct_rank_combos() -> Vec<[u8; 5]> {
    let mut combos = Vec::with_capacity(1287);
    for c1 in (6..=14u8).rev() {
        for c2 in (5..c1).rev() {
            for c3 in (4..c2).rev() {
                for c4 in (3..c3).rev() {
                    for c5 in (2..c4).rev() {
                        combos.push([c1, c2, c3, c4, c5]);
                    }
                }
            }
        }
    }
    combos
}

fn is_run(ranks: &[u8; 5]) -> bool {
    let consecutive = (0..4).all(|i| ranks[i] == ranks[i + 1] + 1);
    let wheel = *ranks == [14, 5, 4, 3, 2];
    consecutive || wheel
}

/// Tables, both Merkle trees, and the pinned roots, built once per process.
#[derive(Debug)]
pub struct RankArtifacts {
    pub tables: RankTables,
    pub basic_tree: RankMerkleTree,
    pub flush_tree: RankMerkleTree,
    pub basic_root: BaseField,
    pub flush_root: BaseField,
}

impl RankArtifacts {
    pub fn build() -> Self {
        let tables = RankTables::build();
        let basic_tree = RankMerkleTree::from_classes(&tables.basic, false);
        let flush_tree = RankMerkleTree::from_classes(&tables.flush, true);
        let basic_root = basic_tree.root();
        let flush_root = flush_tree.root();
        Self {
            tables,
            basic_tree,
            flush_tree,
            basic_root,
            flush_root,
        }
    }

    /// Process-global instance; immutable after first use.
    pub fn global() -> Arc<RankArtifacts> {
        static ARTIFACTS: Lazy<Arc<RankArtifacts>> = Lazy::new(|| Arc::new(RankArtifacts::build()));
        ARTIFACTS.clone()
    }

    pub fn root_for(&self, is_flush: bool) -> BaseField {
        if is_flush {
            self.flush_root
        } else {
            self.basic_root
        }
    }

    pub fn tree_for(&self, is_flush: bool) -> &RankMerkleTree {
        if is_flush {
            &self.flush_tree
        } else {
            &self.basic_tree
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_count(table: &[HandClass], category: HandCategory) -> usize {
        table.iter().filter(|c| c.category == category).count()
    }

    #[test]
    fn class_counts_match_the_combinatorics() {
        let tables = RankTables::build();
        assert_eq!(tables.basic.len(), BASIC_CLASS_COUNT);
        assert_eq!(tables.flush.len(), FLUSH_CLASS_COUNT);

        assert_eq!(
            category_count(&tables.flush, HandCategory::StraightFlush),
            10
        );
        assert_eq!(category_count(&tables.flush, HandCategory::Flush), 1277);
        assert_eq!(category_count(&tables.basic, HandCategory::FourOfAKind), 156);
        assert_eq!(category_count(&tables.basic, HandCategory::FullHouse), 156);
        assert_eq!(category_count(&tables.basic, HandCategory::Straight), 10);
        assert_eq!(
            category_count(&tables.basic, HandCategory::ThreeOfAKind),
            858
        );
        assert_eq!(category_count(&tables.basic, HandCategory::TwoPair), 858);
        assert_eq!(category_count(&tables.basic, HandCategory::OnePair), 2860);
        assert_eq!(category_count(&tables.basic, HandCategory::HighCard), 1277);
    }

    #[test]
    fn ranks_cover_the_full_range_without_gaps() {
        let tables = RankTables::build();
        let mut seen = vec![false; TOTAL_CLASS_COUNT];
        for class in tables.basic.iter().chain(tables.flush.iter()) {
            assert!(!seen[class.rank as usize], "duplicate rank {}", class.rank);
            seen[class.rank as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn royal_flush_is_rank_zero_and_wheel_straight_flush_is_nine() {
        let tables = RankTables::build();
        let royal: u64 = [14u8, 13, 12, 11, 10].iter().map(|&r| rank_prime(r)).product();
        assert_eq!(tables.lookup(royal, true).unwrap().rank, 0);

        let wheel: u64 = [14u8, 5, 4, 3, 2].iter().map(|&r| rank_prime(r)).product();
        assert_eq!(tables.lookup(wheel, true).unwrap().rank, 9);
        // The same rank set as a non-flush is the weakest straight.
        assert_eq!(
            tables.lookup(wheel, false).unwrap().category,
            HandCategory::Straight
        );
    }

    #[test]
    fn category_rank_bands_are_ordered_by_strength() {
        let tables = RankTables::build();
        // Every flush outranks (is lower than) every straight; every straight
        // outranks every three of a kind.
        let worst_flush = tables
            .flush
            .iter()
            .filter(|c| c.category == HandCategory::Flush)
            .map(|c| c.rank)
            .max()
            .unwrap();
        let best_straight = tables
            .basic
            .iter()
            .filter(|c| c.category == HandCategory::Straight)
            .map(|c| c.rank)
            .min()
            .unwrap();
        assert!(worst_flush < best_straight);

        let worst_straight = tables
            .basic
            .iter()
            .filter(|c| c.category == HandCategory::Straight)
            .map(|c| c.rank)
            .max()
            .unwrap();
        let best_trips = tables
            .basic
            .iter()
            .filter(|c| c.category == HandCategory::ThreeOfAKind)
            .map(|c| c.rank)
            .min()
            .unwrap();
        assert!(worst_straight < best_trips);
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let tables = RankTables::build();
        let json = serde_json::to_string(&tables.artifact_map(true)).unwrap();
        tables.verify_artifact(&json, true).unwrap();
        assert!(tables.verify_artifact(&json, false).is_err());
    }
}
