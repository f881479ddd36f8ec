use thiserror::Error;

use super::types::Chips;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("not this seat's turn")]
    NotYourTurn,
    #[error("seat is not in the hand")]
    UnknownSeat,
    #[error("seat cannot act (folded or all-in)")]
    ActorCannotAct,
    #[error("hand is not in a betting street")]
    HandNotActive,
    #[error("cannot check while facing a bet")]
    CannotCheckFacingBet,
    #[error("nothing to call; check instead")]
    NothingToCall,
    #[error("cannot bet once the street is opened")]
    CannotBetWhenOpened,
    #[error("cannot raise an unopened street")]
    CannotRaiseUnopened,
    #[error("bet of {amount} is below the big blind {minimum}")]
    BetBelowMinimum { amount: Chips, minimum: Chips },
    #[error("raise to {to} is below the minimum raise target {minimum}")]
    RaiseBelowMinimum { to: Chips, minimum: Chips },
    #[error("action requires {needed} chips but only {available} remain")]
    InsufficientChips { needed: Chips, available: Chips },
}
