//! The coordinator's transport layer: axum WebSocket endpoint, connection
//! registry, and server bootstrap.

pub mod bootstrap;
pub mod connection;
pub mod logging;
pub mod routes;

pub use bootstrap::{run_server, ServerConfig};
pub use connection::ConnectionManager;
pub use routes::ServerContext;
