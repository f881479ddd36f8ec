use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::{middleware, Router};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::connection::ConnectionManager;
use super::logging::log_requests;
use crate::game::events::MessageSink;
use crate::game::{PlayerId, RoomRegistry};
use crate::protocol::{ClientMessage, ErrorCode, ServerMessage};

const LOG_TARGET: &str = "server::ws";

/// Two consecutive missed pings terminate the session.
const MAX_MISSED_PINGS: u32 = 2;

#[derive(Clone)]
pub struct ServerContext {
    pub connections: Arc<ConnectionManager>,
    pub registry: Arc<RoomRegistry>,
    pub ping_interval: Duration,
}

pub fn build_router(context: ServerContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/healthz", get(|| async { "ok" }))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(context)
}

async fn ws_handler(ws: WebSocketUpgrade, State(context): State<ServerContext>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, context))
}

/// One task per peer: pumps outbound frames, parses inbound messages, and
/// keeps the heartbeat. Exits on close, error, or two missed pings.
async fn handle_socket(socket: WebSocket, context: ServerContext) {
    let player_id: PlayerId = Uuid::new_v4();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();
    context.connections.register(player_id, outbound_tx);

    let (mut sink, mut stream) = socket.split();
    let connected = serde_json::to_string(&ServerMessage::Connected {
        player_id: player_id.to_string(),
    })
    .expect("connected message serializes");
    if sink.send(Message::Text(connected.into())).await.is_err() {
        context.connections.unregister(player_id);
        return;
    }
    info!(target = LOG_TARGET, %player_id, "peer connected");

    // The heartbeat interval is deliberately long: peers stall for the
    // whole proof-generation wall time without reading the socket.
    let mut heartbeat = interval(context.ping_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    heartbeat.tick().await; // immediate first tick
    let mut missed_pings: u32 = 0;

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(message) => {
                        let Ok(text) = serde_json::to_string(&message) else { continue };
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = heartbeat.tick() => {
                if missed_pings >= MAX_MISSED_PINGS {
                    warn!(target = LOG_TARGET, %player_id, "heartbeat lapsed, closing");
                    break;
                }
                missed_pings += 1;
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        missed_pings = 0;
                        dispatch_text(&context, player_id, text.as_str());
                    }
                    Some(Ok(Message::Pong(_))) => {
                        missed_pings = 0;
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        missed_pings = 0;
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(target = LOG_TARGET, %player_id, "peer closed");
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        context.connections.send(
                            player_id,
                            ServerMessage::error(
                                ErrorCode::InvalidMessage,
                                "binary frames are not part of the protocol",
                            ),
                        );
                    }
                    Some(Err(err)) => {
                        debug!(target = LOG_TARGET, %player_id, %err, "socket error");
                        break;
                    }
                }
            }
        }
    }

    context.connections.unregister(player_id);
    context.registry.handle_disconnect(player_id);
    info!(target = LOG_TARGET, %player_id, "peer disconnected");
}

fn dispatch_text(context: &ServerContext, player_id: PlayerId, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => context.registry.route(player_id, message),
        Err(err) => {
            debug!(target = LOG_TARGET, %player_id, %err, "unparseable message");
            context.connections.send(
                player_id,
                ServerMessage::error(ErrorCode::InvalidMessage, "unparseable message"),
            );
        }
    }
}
