use serde::{Deserialize, Serialize};

pub type Chips = u64;
pub type SeatId = u8; // 0..=9

/// Betting rounds, with the wire codepoints of the state commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn as_u8(self) -> u8 {
        match self {
            Street::Preflop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
            Street::Showdown => 4,
        }
    }

    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    /// Community cards revealed when this street opens.
    pub fn cards_revealed(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

/// Action codepoints shared with the `game_action` circuit and the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Null,
    Bet,
    Call,
    Fold,
    Raise,
    Check,
    AllIn,
}

impl ActionKind {
    pub fn as_u8(self) -> u8 {
        match self {
            ActionKind::Null => 0,
            ActionKind::Bet => 1,
            ActionKind::Call => 2,
            ActionKind::Fold => 3,
            ActionKind::Raise => 4,
            ActionKind::Check => 5,
            ActionKind::AllIn => 6,
        }
    }

    pub fn from_u8(value: u8) -> Option<ActionKind> {
        Some(match value {
            0 => ActionKind::Null,
            1 => ActionKind::Bet,
            2 => ActionKind::Call,
            3 => ActionKind::Fold,
            4 => ActionKind::Raise,
            5 => ActionKind::Check,
            6 => ActionKind::AllIn,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandStatus {
    Waiting,
    Active,
    Finished,
}

impl HandStatus {
    pub fn as_u8(self) -> u8 {
        match self {
            HandStatus::Waiting => 0,
            HandStatus::Active => 1,
            HandStatus::Finished => 2,
        }
    }
}

/// An action as submitted by a player. `Bet` and `Raise` carry the player's
/// total street bet after the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet { amount: Chips },
    Raise { to: Chips },
    AllIn,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Bet { .. } => ActionKind::Bet,
            PlayerAction::Raise { .. } => ActionKind::Raise,
            PlayerAction::AllIn => ActionKind::AllIn,
        }
    }

    /// Reassembles a wire action from its codepoint and amount field.
    pub fn from_wire(kind: u8, amount: Chips) -> Option<PlayerAction> {
        Some(match ActionKind::from_u8(kind)? {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Bet => PlayerAction::Bet { amount },
            ActionKind::Raise => PlayerAction::Raise { to: amount },
            ActionKind::AllIn => PlayerAction::AllIn,
            ActionKind::Null => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoints_match_the_wire_contract() {
        assert_eq!(ActionKind::Null.as_u8(), 0);
        assert_eq!(ActionKind::Bet.as_u8(), 1);
        assert_eq!(ActionKind::Call.as_u8(), 2);
        assert_eq!(ActionKind::Fold.as_u8(), 3);
        assert_eq!(ActionKind::Raise.as_u8(), 4);
        assert_eq!(ActionKind::Check.as_u8(), 5);
        assert_eq!(ActionKind::AllIn.as_u8(), 6);
        for v in 0..=6u8 {
            assert_eq!(ActionKind::from_u8(v).unwrap().as_u8(), v);
        }
        assert!(ActionKind::from_u8(7).is_none());

        assert_eq!(Street::Preflop.as_u8(), 0);
        assert_eq!(Street::Showdown.as_u8(), 4);
        assert_eq!(HandStatus::Finished.as_u8(), 2);
    }

    #[test]
    fn street_reveal_counts() {
        assert_eq!(Street::Flop.cards_revealed(), 3);
        assert_eq!(Street::Turn.cards_revealed(), 1);
        assert_eq!(Street::River.cards_revealed(), 1);
        assert_eq!(Street::Preflop.cards_revealed(), 0);
    }
}
