//! The process-wide room registry.
//!
//! Rooms own their seat maps; connections know only their player id and the
//! room id it maps to. Each room runs as one task consuming one event
//! channel, created here and torn down when the last player leaves.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::events::{MessageSink, RoomEvent};
use super::room::{Room, RoomConfig};
use super::{PlayerId, RoomId};
use crate::curve::Curve;
use crate::protocol::{ClientMessage, ErrorCode, ServerMessage};
use crate::showdown::RankArtifacts;
use crate::verifier::ProofVerifier;

const LOG_TARGET: &str = "game::registry";

#[derive(Clone)]
pub struct RoomHandle {
    pub id: RoomId,
    tx: mpsc::UnboundedSender<RoomEvent>,
}

impl RoomHandle {
    pub fn send(&self, event: RoomEvent) {
        let _ = self.tx.send(event);
    }
}

pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, RoomHandle>>,
    memberships: Arc<DashMap<PlayerId, RoomId>>,
    config: RoomConfig,
    sink: Arc<dyn MessageSink>,
    verifier: Arc<dyn ProofVerifier>,
    artifacts: Arc<RankArtifacts>,
    shutdown: CancellationToken,
}

impl RoomRegistry {
    pub fn new(
        config: RoomConfig,
        sink: Arc<dyn MessageSink>,
        verifier: Arc<dyn ProofVerifier>,
        artifacts: Arc<RankArtifacts>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            memberships: Arc::new(DashMap::new()),
            config,
            sink,
            verifier,
            artifacts,
            shutdown,
        }
    }

    pub fn room_of(&self, player: PlayerId) -> Option<RoomHandle> {
        let room_id = *self.memberships.get(&player)?;
        self.rooms.get(&room_id).map(|h| h.value().clone())
    }

    /// Routes a parsed client message. `join_room` targets the registry;
    /// everything else goes to the player's room.
    pub fn route(&self, player_id: PlayerId, message: ClientMessage) {
        match message {
            ClientMessage::JoinRoom {
                room_id,
                player_name,
                public_key_x,
                public_key_y,
            } => self.handle_join(player_id, room_id, player_name, public_key_x, public_key_y),
            other => match self.room_of(player_id) {
                Some(handle) => {
                    if matches!(other, ClientMessage::LeaveRoom) {
                        self.memberships.remove(&player_id);
                    }
                    handle.send(RoomEvent::Client {
                        player_id,
                        message: other,
                    });
                }
                None => self.sink.send(
                    player_id,
                    ServerMessage::error(ErrorCode::NotInRoom, "join a room first"),
                ),
            },
        }
    }

    pub fn handle_disconnect(&self, player_id: PlayerId) {
        if let Some((_, room_id)) = self.memberships.remove(&player_id) {
            if let Some(handle) = self.rooms.get(&room_id) {
                handle.send(RoomEvent::Disconnected { player_id });
            }
        }
    }

    fn handle_join(
        &self,
        player_id: PlayerId,
        room_id: Option<String>,
        player_name: String,
        public_key_x: String,
        public_key_y: String,
    ) {
        if self.memberships.contains_key(&player_id) {
            self.sink.send(
                player_id,
                ServerMessage::error(ErrorCode::InvalidMessage, "already in a room"),
            );
            return;
        }
        let public_key = match parse_public_key(&public_key_x, &public_key_y) {
            Ok(key) => key,
            Err(message) => {
                self.sink.send(
                    player_id,
                    ServerMessage::error(ErrorCode::InvalidMessage, message),
                );
                return;
            }
        };

        let handle = match room_id {
            Some(raw) => {
                let Ok(id) = raw.parse::<Uuid>() else {
                    self.sink.send(
                        player_id,
                        ServerMessage::error(ErrorCode::RoomNotFound, "malformed room id"),
                    );
                    return;
                };
                match self.rooms.get(&id) {
                    Some(handle) => handle.value().clone(),
                    None => {
                        self.sink.send(
                            player_id,
                            ServerMessage::error(ErrorCode::RoomNotFound, "no such room"),
                        );
                        return;
                    }
                }
            }
            None => self.create_room(),
        };

        self.memberships.insert(player_id, handle.id);
        handle.send(RoomEvent::Join {
            player_id,
            player_name,
            public_key,
        });
    }

    fn create_room(&self) -> RoomHandle {
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = self.shutdown.child_token();
        let handle = RoomHandle { id, tx: tx.clone() };
        self.rooms.insert(id, handle.clone());

        let mut room = Room::new(
            id,
            self.config.clone(),
            self.sink.clone(),
            self.verifier.clone(),
            self.artifacts.clone(),
            tx,
        );
        let rooms: Weak<DashMap<RoomId, RoomHandle>> = Arc::downgrade(&self.rooms);
        let memberships: Weak<DashMap<PlayerId, RoomId>> = Arc::downgrade(&self.memberships);
        tokio::spawn(async move {
            info!(target = LOG_TARGET, room = %id, "room task started");
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = rx.recv() => {
                        let Some(event) = event else { break };
                        room.handle(event);
                        if room.is_empty() {
                            debug!(target = LOG_TARGET, room = %id, "last player left");
                            break;
                        }
                    }
                }
            }
            if let Some(rooms) = rooms.upgrade() {
                rooms.remove(&id);
            }
            if let Some(memberships) = memberships.upgrade() {
                memberships.retain(|_, room| *room != id);
            }
            info!(target = LOG_TARGET, room = %id, "room task stopped");
        });

        handle
    }
}

fn parse_public_key(x: &str, y: &str) -> Result<Curve, String> {
    use crate::crypto_serde::field_from_decimal;
    use crate::curve::point_from_coordinates;

    let x = field_from_decimal(x)?;
    let y = field_from_decimal(y)?;
    point_from_coordinates(x, y).map_err(|e| e.to_string())
}
