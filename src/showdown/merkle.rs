//! Poseidon Merkle trees over the hand-rank equivalence classes.
//!
//! Leaf `i` of a table's tree is `H(primeProduct, rank, is_flush)` for class
//! `i`; the leaf vector is padded to 2¹³ with zeros and hashed pairwise with
//! the 2-ary Poseidon to a single root.

use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use super::tables::HandClass;
use crate::config::{hash_fields, hash_pair};
use crate::curve::BaseField;

pub const TREE_DEPTH: usize = 13;
pub const PADDED_LEAF_COUNT: usize = 1 << TREE_DEPTH;

/// Leaf hash for one equivalence class.
pub fn class_leaf(class: &HandClass, is_flush: bool) -> BaseField {
    hash_fields(&[
        BaseField::from(class.prime_product),
        BaseField::from(class.rank as u64),
        BaseField::from(is_flush as u64),
    ])
}

/// A fully materialized tree: level 0 is the padded leaves, level 13 the
/// root.
#[derive(Debug)]
pub struct RankMerkleTree {
    levels: Vec<Vec<BaseField>>,
}

impl RankMerkleTree {
    pub fn from_classes(classes: &[HandClass], is_flush: bool) -> Self {
        let mut leaves: Vec<BaseField> = classes
            .iter()
            .map(|class| class_leaf(class, is_flush))
            .collect();
        leaves.resize(PADDED_LEAF_COUNT, BaseField::zero());
        Self::from_leaves(leaves)
    }

    fn from_leaves(leaves: Vec<BaseField>) -> Self {
        debug_assert_eq!(leaves.len(), PADDED_LEAF_COUNT);
        let mut levels = Vec::with_capacity(TREE_DEPTH + 1);
        levels.push(leaves);
        for depth in 0..TREE_DEPTH {
            let below = &levels[depth];
            let above: Vec<BaseField> = below
                .chunks_exact(2)
                .map(|pair| hash_pair(pair[0], pair[1]))
                .collect();
            levels.push(above);
        }
        Self { levels }
    }

    pub fn root(&self) -> BaseField {
        self.levels[TREE_DEPTH][0]
    }

    pub fn leaf(&self, leaf_index: usize) -> BaseField {
        self.levels[0][leaf_index]
    }

    /// Sibling path for a leaf, bottom-up.
    pub fn prove(&self, leaf_index: usize) -> MerklePath {
        debug_assert!(leaf_index < PADDED_LEAF_COUNT);
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        let mut index = leaf_index;
        for depth in 0..TREE_DEPTH {
            siblings.push(self.levels[depth][index ^ 1]);
            index >>= 1;
        }
        MerklePath {
            leaf_index: leaf_index as u32,
            siblings,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    pub leaf_index: u32,
    #[serde(with = "crate::crypto_serde::field_vec")]
    pub siblings: Vec<BaseField>,
}

/// Recomputes the root from a leaf and its sibling path.
pub fn verify_merkle_path(root: BaseField, leaf: BaseField, path: &MerklePath) -> bool {
    if path.siblings.len() != TREE_DEPTH {
        return false;
    }
    let mut node = leaf;
    let mut index = path.leaf_index;
    for sibling in &path.siblings {
        node = if index & 1 == 0 {
            hash_pair(node, *sibling)
        } else {
            hash_pair(*sibling, node)
        };
        index >>= 1;
    }
    node == root
}
