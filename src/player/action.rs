//! Witness assembly for the `game_action` circuit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::BaseField;
use crate::engine::{apply_action, ActionError, BettingState, Chips, PlayerAction, SeatId};

/// The circuit encodes the acting player as 1 or 2; witness assembly
/// refuses larger tables until a parameterized circuit exists.
const CIRCUIT_SEAT_LIMIT: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionProofError {
    #[error("the game_action circuit supports 2 players, table has {0}")]
    UnsupportedPlayerCount(usize),
    #[error(transparent)]
    Rejected(#[from] ActionError),
}

/// Witness: both state tuples and the action that connects them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionWitness {
    pub state_before: Vec<u64>,
    pub state_after: Vec<u64>,
    /// 1-based player number, as the circuit encodes it.
    pub current_player: u8,
    pub action_type: u8,
    pub amount: Chips,
}

/// A prepared betting action with its commitment pair.
#[derive(Clone, Debug)]
pub struct ActionStep {
    pub state_after: BettingState,
    pub commitment_before: BaseField,
    pub commitment_after: BaseField,
    /// `[stateCommitmentBefore, stateCommitmentAfter]`.
    pub public_signals: Vec<BaseField>,
    pub witness: ActionWitness,
}

/// Applies the action to a copy of the state and assembles the witness.
pub fn prepare_action(
    state: &BettingState,
    seat: SeatId,
    action: PlayerAction,
) -> Result<ActionStep, ActionProofError> {
    if state.seats.len() > CIRCUIT_SEAT_LIMIT {
        return Err(ActionProofError::UnsupportedPlayerCount(state.seats.len()));
    }
    let state_before_tuple = state.state_tuple();
    // The circuit hashes the whole tuple in one shot.
    debug_assert!(state_before_tuple.len() <= crate::config::MAX_HASH_INPUTS);
    let commitment_before = state.commitment();
    let current_player = state
        .seat_index(seat)
        .map(|i| i as u8 + 1)
        .unwrap_or_default();

    let mut state_after = state.clone();
    apply_action(&mut state_after, seat, action)?;
    let commitment_after = state_after.commitment();

    let amount = match action {
        PlayerAction::Bet { amount } => amount,
        PlayerAction::Raise { to } => to,
        _ => 0,
    };

    Ok(ActionStep {
        commitment_before,
        commitment_after,
        public_signals: vec![commitment_before, commitment_after],
        witness: ActionWitness {
            state_before: state_before_tuple,
            state_after: state_after.state_tuple(),
            current_player,
            action_type: action.kind().as_u8(),
            amount,
        },
        state_after,
    })
}
