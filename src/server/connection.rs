//! Live connection registry.
//!
//! One writer channel per connected peer; the rooms publish through the
//! [`MessageSink`] implementation and never touch sockets.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::game::{MessageSink, PlayerId};
use crate::protocol::ServerMessage;

const LOG_TARGET: &str = "server::connection";

/// Player id to writer channel. Dropping a connection's sender (via
/// [`ConnectionManager::unregister`]) ends its socket loop.
pub struct ConnectionManager {
    connections: DashMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn register(&self, player: PlayerId, tx: mpsc::UnboundedSender<ServerMessage>) {
        debug!(target = LOG_TARGET, %player, "connection registered");
        self.connections.insert(player, tx);
    }

    pub fn unregister(&self, player: PlayerId) {
        debug!(target = LOG_TARGET, %player, "connection removed");
        self.connections.remove(&player);
    }

    pub fn is_connected(&self, player: PlayerId) -> bool {
        self.connections.contains_key(&player)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for ConnectionManager {
    fn send(&self, player: PlayerId, message: ServerMessage) {
        match self.connections.get(&player) {
            Some(tx) => {
                if tx.send(message).is_err() {
                    warn!(target = LOG_TARGET, %player, "writer gone, dropping message");
                }
            }
            None => {
                // Departed players may still be addressed by in-flight hand
                // logic; their traffic is dropped.
                debug!(target = LOG_TARGET, %player, "no connection for message");
            }
        }
    }
}
