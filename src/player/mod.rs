//! The client-side prover driver.
//!
//! Each peer runs the same crypto core as the coordinator plus the witness
//! assembly for every circuit it may be asked to prove. Proof generation
//! itself is a black box behind [`prover::Prover`]; this module's job is to
//! compute the transition (shuffled deck, unmasked card, next game state,
//! best hand) and lay out witness and public signals exactly as the circuit
//! expects them.

pub mod action;
pub mod hand_eval;
pub mod keys;
pub mod prover;
pub mod shuffle;
pub mod unmask;

pub use action::{prepare_action, ActionStep};
pub use hand_eval::{board_commitment, hole_commitment, prepare_hand_reveal, HandRevealStep};
pub use keys::PlayerKeys;
pub use prover::{CircuitWitness, MockProver, Prover, ProverError};
pub use shuffle::{
    prepare_add_keys, prepare_mask, prepare_shuffle, shuffle_circuit_for, ShuffleStep,
};
pub use unmask::{prepare_unmask, UnmaskStep};
