//! Witness assembly for the hand-rank evaluation circuit.

use serde::{Deserialize, Serialize};

use crate::config::hash_fields;
use crate::curve::BaseField;
use crate::showdown::merkle::class_leaf;
use crate::showdown::{
    best_five_of_seven, describe_hand, EvalError, EvaluatedHand, MerklePath, RankArtifacts,
};

/// Commitment to the two hole-card indices.
pub fn hole_commitment(hole: [u8; 2]) -> BaseField {
    hash_fields(&[BaseField::from(hole[0] as u64), BaseField::from(hole[1] as u64)])
}

/// Commitment to the five board-card indices.
pub fn board_commitment(board: [u8; 5]) -> BaseField {
    let elements: Vec<BaseField> = board.iter().map(|&c| BaseField::from(c as u64)).collect();
    hash_fields(&elements)
}

/// Witness: the chosen five of seven, the class data, and the Merkle path
/// to the matching leaf.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandEvalWitness {
    pub hole: [u8; 2],
    pub board: [u8; 5],
    /// One selection flag per card in `[hole, board]` order; exactly five
    /// are set.
    pub use_flags: [bool; 7],
    pub lookup_key: u64,
    pub is_flush: bool,
    pub hand_rank: u16,
    pub merkle_path: MerklePath,
}

/// A prepared hand reveal.
#[derive(Clone, Debug)]
pub struct HandRevealStep {
    pub hand: EvaluatedHand,
    pub description: String,
    /// `[merkleRoot, holeCardsCommitment, boardCardsCommitment, handRank]`.
    pub public_signals: Vec<BaseField>,
    pub witness: HandEvalWitness,
}

/// Evaluates the player's best hand and lays out the proof inputs.
pub fn prepare_hand_reveal(
    artifacts: &RankArtifacts,
    hole: [u8; 2],
    board: [u8; 5],
) -> Result<HandRevealStep, EvalError> {
    let hand = best_five_of_seven(&artifacts.tables, hole, board)?;

    let all = [
        hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
    ];
    let mut use_flags = [false; 7];
    for (i, card) in all.iter().enumerate() {
        if hand.cards.contains(card) {
            use_flags[i] = true;
        }
    }
    debug_assert_eq!(use_flags.iter().filter(|&&f| f).count(), 5);

    let leaf_index = artifacts
        .tables
        .leaf_index(hand.lookup_key, hand.is_flush)
        .ok_or(EvalError::UnknownClass(hand.lookup_key))?;
    let tree = artifacts.tree_for(hand.is_flush);
    let merkle_path = tree.prove(leaf_index);
    let root = artifacts.root_for(hand.is_flush);

    let description = describe_hand(&hand);
    Ok(HandRevealStep {
        description,
        public_signals: vec![
            root,
            hole_commitment(hole),
            board_commitment(board),
            BaseField::from(hand.rank as u64),
        ],
        witness: HandEvalWitness {
            hole,
            board,
            use_flags,
            lookup_key: hand.lookup_key,
            is_flush: hand.is_flush,
            hand_rank: hand.rank,
            merkle_path,
        },
        hand,
    })
}
