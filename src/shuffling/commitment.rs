//! Canonical commitments the coordinator checks proof public inputs against.

use ark_ff::Zero;

use super::data_structures::MaskedCard;
use crate::config::hash_fields;
use crate::curve::{point_coordinates, BaseField, Curve};

/// Coordinates fed to the hash. Identity components are hashed as `(0, 0)`,
/// not the affine identity `(0, 1)`; this is the single canonicalization the
/// circuits and server must agree on.
fn commitment_coordinates(point: &Curve) -> (BaseField, BaseField) {
    if point.is_zero() {
        (BaseField::zero(), BaseField::zero())
    } else {
        point_coordinates(point)
    }
}

/// `H(epk.x, epk.y, msg.x, msg.y, pk.x, pk.y)` with arity exactly six.
pub fn card_commitment(card: &MaskedCard) -> BaseField {
    let (epk_x, epk_y) = commitment_coordinates(&card.epk);
    let (msg_x, msg_y) = commitment_coordinates(&card.msg);
    let (pk_x, pk_y) = commitment_coordinates(&card.pk);
    hash_fields(&[epk_x, epk_y, msg_x, msg_y, pk_x, pk_y])
}

/// Order-independent multiset commitment over the whole deck:
/// `Π (cardCommitment(cᵢ) + 1)` in the base field.
///
/// A shuffle proof shows the output deck is a permutation of the input by
/// reproducing the same product.
pub fn deck_commitment(deck: &[MaskedCard]) -> BaseField {
    deck.iter()
        .map(|card| card_commitment(card) + BaseField::from(1u64))
        .product()
}

/// Commitment over the seat-ordered game-state tuple.
pub fn game_state_commitment(tuple: &[u64]) -> BaseField {
    let elements: Vec<BaseField> = tuple.iter().map(|&v| BaseField::from(v)).collect();
    hash_fields(&elements)
}
