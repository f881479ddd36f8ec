//! The JSON wire protocol between peers and the coordinator.
//!
//! Every message is an object with a `"type"` discriminator. Field elements
//! travel as decimal strings and cards as 6-tuples of coordinate strings in
//! `[epk.x, epk.y, msg.x, msg.y, pk.x, pk.y]` order.

mod codes;
mod dto;
mod messages;

pub use codes::ErrorCode;
pub use dto::{
    CardDto, FinalStackDto, GameStateDto, PlayerInfo, PotShareDto, RoomConfigDto,
    ShowdownPlayerDto, COMMUNITY_TARGET,
};
pub use messages::{ClientMessage, ServerMessage};
