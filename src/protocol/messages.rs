use serde::{Deserialize, Serialize};

use super::codes::ErrorCode;
use super::dto::{
    CardDto, FinalStackDto, GameStateDto, PlayerInfo, PotShareDto, RoomConfigDto,
    ShowdownPlayerDto,
};
use crate::engine::Chips;

/// Everything a peer may send the coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        player_name: String,
        public_key_x: String,
        public_key_y: String,
    },
    LeaveRoom,
    #[serde(rename_all = "camelCase")]
    Ready { is_ready: bool },
    #[serde(rename_all = "camelCase")]
    SubmitShuffle {
        shuffled_deck: Vec<CardDto>,
        deck_commitment: String,
        proof: String,
        public_signals: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    SubmitUnmask {
        card_index: u8,
        unmasked_card: CardDto,
        proof: String,
        public_signals: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    SubmitAction {
        action_type: u8,
        amount: Chips,
        state_commitment: String,
        proof: String,
        public_signals: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    SubmitHandReveal {
        hand_rank: u16,
        hand_description: String,
        card_indices: [u8; 5],
        proof: String,
        public_signals: Vec<String>,
    },
}

/// Everything the coordinator may send a peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Connected { player_id: String },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: String,
        player_id: String,
        seat_index: u8,
        players: Vec<PlayerInfo>,
        config: RoomConfigDto,
    },
    #[serde(rename_all = "camelCase")]
    PlayerJoined { player: PlayerInfo },
    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: String },
    #[serde(rename_all = "camelCase")]
    PlayerReady { player_id: String, is_ready: bool },
    #[serde(rename_all = "camelCase")]
    GameStarted { game_state: GameStateDto },
    #[serde(rename_all = "camelCase")]
    ShuffleTurn {
        player_id: String,
        seat_index: u8,
        current_deck: Vec<CardDto>,
    },
    #[serde(rename_all = "camelCase")]
    ShuffleComplete {
        player_id: String,
        deck_commitment: String,
    },
    #[serde(rename_all = "camelCase")]
    CardsDealt { your_cards: Vec<u8> },
    #[serde(rename_all = "camelCase")]
    UnmaskRequest {
        card_index: u8,
        /// Owner's player id, or `"community"`.
        for_player_id: String,
        card: CardDto,
    },
    #[serde(rename_all = "camelCase")]
    CardPartiallyUnmasked {
        card_index: u8,
        by_player_id: String,
        remaining_unmasks: u8,
        /// The card state after this unmask; peers with an in-flight proof
        /// for the same card rebase on it.
        card: CardDto,
    },
    #[serde(rename_all = "camelCase")]
    CardFullyUnmasked {
        card_index: u8,
        card: CardDto,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_community: Option<bool>,
    },
    #[serde(rename_all = "camelCase")]
    PlayerTurn {
        player_id: String,
        seat_index: u8,
        /// Action codepoints.
        valid_actions: Vec<u8>,
        min_bet: Chips,
        min_raise: Chips,
        amount_to_call: Chips,
        timeout_ms: u64,
    },
    #[serde(rename_all = "camelCase")]
    ActionResult {
        player_id: String,
        action_type: u8,
        amount: Chips,
        new_pot: Chips,
        player_stack: Chips,
    },
    #[serde(rename_all = "camelCase")]
    StreetAdvanced {
        street: u8,
        community_card_indices: Vec<u8>,
    },
    #[serde(rename_all = "camelCase")]
    RevealHandRequest { pot: Chips, opponents: Vec<String> },
    #[serde(rename_all = "camelCase")]
    HandRevealed {
        player_id: String,
        hand_rank: u16,
        hand_description: String,
        card_indices: Vec<u8>,
    },
    #[serde(rename_all = "camelCase")]
    Showdown {
        players: Vec<ShowdownPlayerDto>,
        winners: Vec<String>,
        pot_distribution: Vec<PotShareDto>,
    },
    #[serde(rename_all = "camelCase")]
    GameEnded {
        reason: String,
        final_stacks: Vec<FinalStackDto>,
    },
    #[serde(rename_all = "camelCase")]
    Error { code: ErrorCode, message: String },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_tags_match_the_wire_table() {
        let cases = vec![
            (
                ClientMessage::JoinRoom {
                    room_id: None,
                    player_name: "alice".into(),
                    public_key_x: "1".into(),
                    public_key_y: "2".into(),
                },
                "join_room",
            ),
            (ClientMessage::LeaveRoom, "leave_room"),
            (ClientMessage::Ready { is_ready: true }, "ready"),
            (
                ClientMessage::SubmitUnmask {
                    card_index: 4,
                    unmasked_card: CardDto([
                        "0".into(),
                        "1".into(),
                        "0".into(),
                        "1".into(),
                        "0".into(),
                        "1".into(),
                    ]),
                    proof: "00".into(),
                    public_signals: vec![],
                },
                "submit_unmask",
            ),
        ];
        for (message, tag) in cases {
            let value = serde_json::to_value(&message).unwrap();
            assert_eq!(value["type"], tag);
            let restored: ClientMessage = serde_json::from_value(value).unwrap();
            assert_eq!(restored, message);
        }
    }

    #[test]
    fn server_message_fields_are_camel_case() {
        let message = ServerMessage::PlayerTurn {
            player_id: "p1".into(),
            seat_index: 0,
            valid_actions: vec![3, 2, 4, 6],
            min_bet: 2,
            min_raise: 4,
            amount_to_call: 1,
            timeout_ms: 60_000,
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "player_turn");
        assert!(value.get("playerId").is_some());
        assert!(value.get("amountToCall").is_some());
        assert!(value.get("timeoutMs").is_some());
    }

    #[test]
    fn unknown_message_type_fails_to_parse() {
        let raw = r#"{"type":"steal_the_pot"}"#;
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn error_message_round_trips() {
        let message = ServerMessage::error(ErrorCode::InvalidProof, "shuffle proof rejected");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("INVALID_PROOF"));
        let restored: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, message);
    }
}
