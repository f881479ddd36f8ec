use serde::{Deserialize, Serialize};

use super::state::BettingState;
use super::types::{ActionKind, Chips, HandStatus, SeatId, Street};

/// The legal-action oracle's answer for one seat, as advertised in the
/// `player_turn` message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub actions: Vec<ActionKind>,
    /// Chips required to call, capped by the seat's stack.
    pub amount_to_call: Chips,
    /// Minimum opening bet (the big blind), when betting is legal.
    pub min_bet: Option<Chips>,
    /// Minimum total street bet for a raise, when raising is legal.
    pub min_raise_to: Option<Chips>,
}

impl LegalActions {
    pub fn none() -> Self {
        Self {
            actions: Vec::new(),
            amount_to_call: 0,
            min_bet: None,
            min_raise_to: None,
        }
    }

    pub fn allows(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }
}

/// Exactly the actions [`super::engine::apply_action`] would accept for this
/// seat right now.
pub fn legal_actions_for(state: &BettingState, seat: SeatId) -> LegalActions {
    if state.status != HandStatus::Active || state.street == Street::Showdown {
        return LegalActions::none();
    }
    if state.to_act != seat {
        return LegalActions::none();
    }
    let Some(player) = state.seat(seat) else {
        return LegalActions::none();
    };
    if !player.can_act() {
        return LegalActions::none();
    }

    let price = state.bet_to_match.saturating_sub(player.street_bet);
    let mut legals = LegalActions {
        actions: vec![ActionKind::Fold],
        amount_to_call: price.min(player.stack),
        min_bet: None,
        min_raise_to: None,
    };

    if price == 0 {
        legals.actions.push(ActionKind::Check);
    } else {
        legals.actions.push(ActionKind::Call);
    }

    if state.bet_to_match == 0 {
        if player.stack >= state.big_blind {
            legals.actions.push(ActionKind::Bet);
            legals.min_bet = Some(state.big_blind);
        }
    } else {
        let min_to = state.bet_to_match + state.min_raise;
        if player.stack >= min_to - player.street_bet {
            legals.actions.push(ActionKind::Raise);
            legals.min_raise_to = Some(min_to);
        }
    }

    // A live stack can always shove.
    legals.actions.push(ActionKind::AllIn);
    legals
}
