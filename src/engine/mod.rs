//! The no-limit betting engine: pure state logic, no I/O, no crypto.
//!
//! The coordinator drives one [`state::BettingState`] per hand; every player
//! action flows through [`engine::apply_action`] and produces a
//! [`engine::Transition`] the room task acts on.

pub mod engine;
pub mod errors;
pub mod legals;
pub mod pots;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{apply_action, AppliedAction, Transition};
pub use errors::ActionError;
pub use legals::{legal_actions_for, LegalActions};
pub use pots::{compute_pots, Pot};
pub use state::{BettingState, HandConfig, SeatState};
pub use types::{ActionKind, Chips, HandStatus, PlayerAction, SeatId, Street};
