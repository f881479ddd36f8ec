use tracing::debug;

use super::errors::ActionError;
use super::state::BettingState;
use super::types::{ActionKind, Chips, HandStatus, PlayerAction, SeatId, Street};

const LOG_TARGET: &str = "engine";

/// What an applied action did, for the `action_result` broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedAction {
    pub seat: SeatId,
    pub kind: ActionKind,
    /// Chips moved from the stack into the pot by this action.
    pub amount: Chips,
    pub new_pot: Chips,
    pub new_stack: Chips,
}

/// Where the hand goes after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Continued {
        applied: AppliedAction,
        next_to_act: SeatId,
    },
    StreetEnd {
        applied: AppliedAction,
        street: Street,
    },
    /// Folds collapsed the hand to a single player.
    HandEnd {
        applied: AppliedAction,
        winner: SeatId,
    },
}

/// Validates and applies one player action.
pub fn apply_action(
    state: &mut BettingState,
    seat: SeatId,
    action: PlayerAction,
) -> Result<Transition, ActionError> {
    if state.status != HandStatus::Active || state.street == Street::Showdown {
        return Err(ActionError::HandNotActive);
    }
    if state.to_act != seat {
        return Err(ActionError::NotYourTurn);
    }
    let idx = state.seat_index(seat).ok_or(ActionError::UnknownSeat)?;
    if !state.seats[idx].can_act() {
        return Err(ActionError::ActorCannotAct);
    }

    let price = state.bet_to_match.saturating_sub(state.seats[idx].street_bet);
    let stack = state.seats[idx].stack;
    let mut added: Chips = 0;

    match action {
        PlayerAction::Fold => {
            state.seats[idx].folded = true;
            state.seats[idx].acted = true;
            state.last_action = ActionKind::Fold;
        }
        PlayerAction::Check => {
            if price > 0 {
                return Err(ActionError::CannotCheckFacingBet);
            }
            state.seats[idx].acted = true;
            state.last_action = ActionKind::Check;
        }
        PlayerAction::Call => {
            if price == 0 {
                return Err(ActionError::NothingToCall);
            }
            added = price.min(stack);
            commit_chips(state, idx, added);
            state.seats[idx].acted = true;
            state.last_action = ActionKind::Call;
        }
        PlayerAction::Bet { amount } => {
            // Nobody has bet this street (blinds open the preflop street).
            if state.bet_to_match != 0 {
                return Err(ActionError::CannotBetWhenOpened);
            }
            if amount < state.big_blind {
                return Err(ActionError::BetBelowMinimum {
                    amount,
                    minimum: state.big_blind,
                });
            }
            if amount > stack {
                return Err(ActionError::InsufficientChips {
                    needed: amount,
                    available: stack,
                });
            }
            added = amount;
            commit_chips(state, idx, added);
            state.seats[idx].acted = true;
            state.bet_to_match = amount;
            state.min_raise = amount;
            state.last_action = ActionKind::Bet;
            state.last_bet_size = amount;
        }
        PlayerAction::Raise { to } => {
            if state.bet_to_match == 0 {
                return Err(ActionError::CannotRaiseUnopened);
            }
            let min_to = state.bet_to_match + state.min_raise;
            if to < min_to {
                return Err(ActionError::RaiseBelowMinimum { to, minimum: min_to });
            }
            let needed = to - state.seats[idx].street_bet;
            if needed > stack {
                return Err(ActionError::InsufficientChips {
                    needed,
                    available: stack,
                });
            }
            added = needed;
            commit_chips(state, idx, added);
            state.seats[idx].acted = true;
            state.min_raise = to - state.bet_to_match;
            state.last_bet_size = to - state.bet_to_match;
            state.bet_to_match = to;
            state.last_action = ActionKind::Raise;
        }
        PlayerAction::AllIn => {
            let previous_match = state.bet_to_match;
            let new_total = state.seats[idx].street_bet + stack;
            added = stack;
            commit_chips(state, idx, added);
            state.seats[idx].acted = true;
            if new_total > previous_match {
                // Raising all-in reopens the street only when the jump
                // clears the minimum raise.
                if previous_match == 0 || new_total >= previous_match + state.min_raise {
                    state.min_raise = if previous_match == 0 {
                        new_total.max(state.big_blind)
                    } else {
                        new_total - previous_match
                    };
                }
                state.last_bet_size = new_total - previous_match;
                state.bet_to_match = new_total;
            }
            state.last_action = ActionKind::AllIn;
        }
    }

    let kind = action.kind();
    let applied = AppliedAction {
        seat,
        kind,
        amount: added,
        new_pot: state.pot,
        new_stack: state.seats[idx].stack,
    };
    debug!(
        target = LOG_TARGET,
        seat,
        action = ?kind,
        amount = added,
        pot = state.pot,
        "action applied"
    );

    let in_hand = state.seats_in_hand();
    if in_hand.len() == 1 {
        state.status = HandStatus::Finished;
        return Ok(Transition::HandEnd {
            applied,
            winner: in_hand[0],
        });
    }

    if state.street_settled() {
        return Ok(Transition::StreetEnd {
            applied,
            street: state.street,
        });
    }

    let next = state
        .next_actor_after(seat)
        .expect("unsettled street has an actor");
    state.to_act = next;
    Ok(Transition::Continued {
        applied,
        next_to_act: next,
    })
}

fn commit_chips(state: &mut BettingState, idx: usize, amount: Chips) {
    state.seats[idx].stack -= amount;
    state.seats[idx].street_bet += amount;
    state.seats[idx].total_bet += amount;
    state.pot += amount;
    if state.seats[idx].stack == 0 {
        state.seats[idx].all_in = true;
    }
}
