use serde::{Deserialize, Serialize};

/// Error codes of the coordinator's reply taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Protocol level: no state change.
    InvalidMessage,
    NotConnected,
    NotInRoom,
    RoomNotFound,
    RoomFull,
    // Turn level: no state change.
    NotYourTurn,
    InvalidState,
    InvalidAction,
    InvalidCard,
    AlreadyUnmasked,
    InvalidUnmask,
    // Cryptographic: transition rejected.
    InvalidProof,
    CommitmentMismatch,
    // Backpressure.
    Busy,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidMessage => "INVALID_MESSAGE",
            ErrorCode::NotConnected => "NOT_CONNECTED",
            ErrorCode::NotInRoom => "NOT_IN_ROOM",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::RoomFull => "ROOM_FULL",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::InvalidAction => "INVALID_ACTION",
            ErrorCode::InvalidCard => "INVALID_CARD",
            ErrorCode::AlreadyUnmasked => "ALREADY_UNMASKED",
            ErrorCode::InvalidUnmask => "INVALID_UNMASK",
            ErrorCode::InvalidProof => "INVALID_PROOF",
            ErrorCode::CommitmentMismatch => "COMMITMENT_MISMATCH",
            ErrorCode::Busy => "BUSY",
        }
    }
}
