use serde::{Deserialize, Serialize};

/// The eight circuits of the protocol. Closed set: every proof submission
/// names exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitType {
    Shuffle,
    Reshuffle,
    AddKeys,
    Mask,
    Unmask,
    GameAction,
    HandEval,
    Showdown,
}

impl CircuitType {
    pub const ALL: [CircuitType; 8] = [
        CircuitType::Shuffle,
        CircuitType::Reshuffle,
        CircuitType::AddKeys,
        CircuitType::Mask,
        CircuitType::Unmask,
        CircuitType::GameAction,
        CircuitType::HandEval,
        CircuitType::Showdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CircuitType::Shuffle => "shuffle",
            CircuitType::Reshuffle => "reshuffle",
            CircuitType::AddKeys => "add_keys",
            CircuitType::Mask => "mask",
            CircuitType::Unmask => "unmask",
            CircuitType::GameAction => "game_action",
            CircuitType::HandEval => "hand_eval",
            CircuitType::Showdown => "showdown",
        }
    }

    /// File the circuit's verification key is read from, relative to the
    /// artifact directory.
    pub fn key_file(self) -> String {
        format!("{}.vk", self.as_str())
    }

    /// Position in the fixed-size key table.
    pub(crate) fn table_index(self) -> usize {
        match self {
            CircuitType::Shuffle => 0,
            CircuitType::Reshuffle => 1,
            CircuitType::AddKeys => 2,
            CircuitType::Mask => 3,
            CircuitType::Unmask => 4,
            CircuitType::GameAction => 5,
            CircuitType::HandEval => 6,
            CircuitType::Showdown => 7,
        }
    }
}

impl std::fmt::Display for CircuitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
