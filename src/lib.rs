pub mod config;
pub mod crypto_serde;
pub mod curve;
pub mod engine;
pub mod game;
pub mod player;
pub mod protocol;
pub mod server;
pub mod showdown;
pub mod shuffling;
pub mod verifier;

pub use config::{hash_fields, poseidon_config};
pub use curve::DECK_SIZE;
