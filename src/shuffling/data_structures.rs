use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use super::error::ShuffleError;
use crate::curve::{card_point, Curve, DECK_SIZE};

/// A card in some mask state.
///
/// Invariants for a well-formed card:
/// - `pk` is the sum of the public keys of every player currently holding a
///   mask layer; identity when nobody has masked.
/// - `epk` is `(Σ nonces)·G` over every `mask` applied so far; identity for a
///   never-masked card.
/// - removing every player's layer via `partial_unmask` restores `msg` to the
///   card-value point and `pk` to identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedCard {
    #[serde(with = "crate::crypto_serde::point")]
    pub epk: Curve,
    #[serde(with = "crate::crypto_serde::point")]
    pub msg: Curve,
    #[serde(with = "crate::crypto_serde::point")]
    pub pk: Curve,
}

impl MaskedCard {
    pub fn new(epk: Curve, msg: Curve, pk: Curve) -> Self {
        Self { epk, msg, pk }
    }

    /// The plaintext card for a deck index, before any player touches it.
    pub fn from_card_index(index: u8) -> Self {
        Self {
            epk: Curve::zero(),
            msg: card_point(index),
            pk: Curve::zero(),
        }
    }

    /// Whether any mask layer is currently applied.
    pub fn is_masked(&self) -> bool {
        !self.pk.is_zero()
    }
}

pub type Deck = Vec<MaskedCard>;

/// The canonical unmasked 52-card deck, ordered by deck index.
pub fn initial_deck() -> Deck {
    (0..DECK_SIZE as u8).map(MaskedCard::from_card_index).collect()
}

pub fn check_deck_size(deck: &[MaskedCard]) -> Result<(), ShuffleError> {
    if deck.len() != DECK_SIZE {
        return Err(ShuffleError::InvalidDeckSize {
            expected: DECK_SIZE,
            got: deck.len(),
        });
    }
    Ok(())
}
