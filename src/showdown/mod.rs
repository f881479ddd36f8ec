//! Hand-rank evaluation and the commitment scheme a player proves their hand
//! against: the 7462 equivalence classes of 5-card hands, addressed by a
//! prime-product key and committed to by two Poseidon Merkle trees.

pub mod cards;
pub mod describe;
pub mod eval;
pub mod merkle;
pub mod tables;

pub use cards::{card_prime, rank_of, suit_of, RANK_PRIMES};
pub use describe::describe_hand;
pub use eval::{best_five_of_seven, evaluate_five, EvalError, EvaluatedHand};
pub use merkle::{verify_merkle_path, MerklePath, RankMerkleTree, TREE_DEPTH};
pub use tables::{
    HandCategory, HandClass, RankArtifacts, RankTables, BASIC_CLASS_COUNT, FLUSH_CLASS_COUNT,
    TOTAL_CLASS_COUNT,
};
