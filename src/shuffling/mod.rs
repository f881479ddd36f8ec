//! The mental-poker card layer: collaboratively masked cards, the ElGamal
//! operations that move them between mask states, and the commitments the
//! coordinator verifies proofs against.

pub mod commitment;
pub mod data_structures;
pub mod encryption;
pub mod error;

pub use commitment::{card_commitment, deck_commitment, game_state_commitment};
pub use data_structures::{initial_deck, Deck, MaskedCard};
pub use error::ShuffleError;

pub use crate::curve::DECK_SIZE;
