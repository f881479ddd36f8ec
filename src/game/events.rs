use parking_lot::Mutex;

use super::PlayerId;
use crate::curve::{BaseField, Curve};
use crate::engine::PlayerAction;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::shuffling::{Deck, MaskedCard};
use crate::verifier::{CircuitType, VerifyError};

/// Everything that can wake a room's event loop.
#[derive(Debug)]
pub enum RoomEvent {
    /// A connected peer asks to take a seat.
    Join {
        player_id: PlayerId,
        player_name: String,
        public_key: Curve,
    },
    /// A message from a seated peer.
    Client {
        player_id: PlayerId,
        message: ClientMessage,
    },
    /// The peer's connection is gone; forfeit for the current hand.
    Disconnected { player_id: PlayerId },
    /// A turn or phase timer elapsed. Stale generations are ignored.
    TimerFired { generation: u64 },
    /// A verification worker finished; the room applies or rejects the
    /// transition on its own logical thread.
    VerifyCompleted {
        player_id: PlayerId,
        circuit: CircuitType,
        job: VerifyJob,
        result: Result<(), VerifyError>,
    },
}

/// The state transition a successful verification commits.
#[derive(Debug)]
pub enum VerifyJob {
    Shuffle {
        deck: Deck,
        commitment: BaseField,
    },
    Unmask {
        card_index: u8,
        card: MaskedCard,
    },
    Action {
        action: PlayerAction,
        declared_commitment: BaseField,
    },
    HandReveal {
        hand_rank: u16,
        description: String,
        card_indices: [u8; 5],
    },
}

/// Outbound seam: the room never touches sockets directly.
pub trait MessageSink: Send + Sync {
    fn send(&self, player: PlayerId, message: ServerMessage);

    fn broadcast(&self, players: &[PlayerId], message: ServerMessage) {
        for player in players {
            self.send(*player, message.clone());
        }
    }

    fn broadcast_except(&self, players: &[PlayerId], except: PlayerId, message: ServerMessage) {
        for player in players {
            if *player != except {
                self.send(*player, message.clone());
            }
        }
    }
}

/// Captures outbound traffic for assertions. Used by the room tests and the
/// local demo path.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(PlayerId, ServerMessage)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<(PlayerId, ServerMessage)> {
        std::mem::take(&mut self.messages.lock())
    }

    pub fn messages_for(&self, player: PlayerId) -> Vec<ServerMessage> {
        self.messages
            .lock()
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, player: PlayerId, message: ServerMessage) {
        self.messages.lock().push((player, message));
    }
}
