use serde::{Deserialize, Serialize};

use crate::crypto_serde::{field_from_decimal, field_to_decimal};
use crate::curve::{point_coordinates, point_from_coordinates};
use crate::engine::{BettingState, Chips};
use crate::shuffling::MaskedCard;

/// Sentinel for unmask requests that target the board instead of a player.
pub const COMMUNITY_TARGET: &str = "community";

/// A card on the wire: `[epk.x, epk.y, msg.x, msg.y, pk.x, pk.y]` as decimal
/// strings. Identity components appear in their affine form `(0, 1)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDto(pub [String; 6]);

impl CardDto {
    pub fn from_card(card: &MaskedCard) -> Self {
        let (epk_x, epk_y) = point_coordinates(&card.epk);
        let (msg_x, msg_y) = point_coordinates(&card.msg);
        let (pk_x, pk_y) = point_coordinates(&card.pk);
        CardDto([
            field_to_decimal(&epk_x),
            field_to_decimal(&epk_y),
            field_to_decimal(&msg_x),
            field_to_decimal(&msg_y),
            field_to_decimal(&pk_x),
            field_to_decimal(&pk_y),
        ])
    }

    pub fn to_card(&self) -> Result<MaskedCard, String> {
        let mut coords = [ark_ff::Zero::zero(); 6];
        for (i, raw) in self.0.iter().enumerate() {
            coords[i] = field_from_decimal(raw)?;
        }
        let epk = point_from_coordinates(coords[0], coords[1]).map_err(|e| e.to_string())?;
        let msg = point_from_coordinates(coords[2], coords[3]).map_err(|e| e.to_string())?;
        let pk = point_from_coordinates(coords[4], coords[5]).map_err(|e| e.to_string())?;
        Ok(MaskedCard::new(epk, msg, pk))
    }
}

/// Roster entry in `room_joined` / `player_joined`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub player_id: String,
    pub player_name: String,
    pub seat_index: u8,
    pub is_ready: bool,
    pub public_key_x: String,
    pub public_key_y: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfigDto {
    pub min_players: u8,
    pub max_players: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub starting_stack: Chips,
    pub turn_timeout_ms: u64,
    pub phase_timeout_ms: u64,
}

/// Snapshot of the betting state in `game_started`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub stacks: Vec<Chips>,
    pub street_bets: Vec<Chips>,
    pub pot: Chips,
    pub street: u8,
    pub current_seat: u8,
    pub dealer: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub status: u8,
    pub state_commitment: String,
}

impl GameStateDto {
    pub fn from_state(state: &BettingState) -> Self {
        Self {
            stacks: state.seats.iter().map(|s| s.stack).collect(),
            street_bets: state.seats.iter().map(|s| s.street_bet).collect(),
            pot: state.pot,
            street: state.street.as_u8(),
            current_seat: state.to_act,
            dealer: state.dealer,
            small_blind: state.small_blind,
            big_blind: state.big_blind,
            status: state.status.as_u8(),
            state_commitment: field_to_decimal(&state.commitment()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownPlayerDto {
    pub player_id: String,
    pub seat_index: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_rank: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_indices: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotShareDto {
    pub player_id: String,
    pub amount: Chips,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalStackDto {
    pub player_id: String,
    pub seat_index: u8,
    pub stack: Chips,
}
