use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use zk_holdem::engine::Chips;
use zk_holdem::game::RoomConfig;
use zk_holdem::server::{run_server, ServerConfig};

const DEFAULT_BIND: &str = "127.0.0.1:4000";

#[derive(Debug, Parser)]
#[command(name = "zk_holdem_server")]
#[command(about = "Launch the mental-poker coordinator", long_about = None)]
struct Args {
    /// Address to bind the WebSocket server to (host:port)
    #[arg(long, env = "SERVER_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Directory with verification keys (<circuit>.vk) and the optional
    /// Poseidon test vector
    #[arg(long, env = "SERVER_ARTIFACT_DIR")]
    artifact_dir: Option<PathBuf>,

    /// Accept proofs without verification (local demos only)
    #[arg(long, env = "SERVER_ACCEPT_UNVERIFIED", default_value_t = false)]
    accept_unverified: bool,

    /// Small blind in chips
    #[arg(long, env = "ROOM_SMALL_BLIND", default_value_t = 1)]
    small_blind: Chips,

    /// Big blind in chips
    #[arg(long, env = "ROOM_BIG_BLIND", default_value_t = 2)]
    big_blind: Chips,

    /// Starting stack in chips
    #[arg(long, env = "ROOM_STARTING_STACK", default_value_t = 100)]
    starting_stack: Chips,

    /// Seconds a player has to act on their betting turn
    #[arg(long, env = "ROOM_TURN_TIMEOUT_SECS", default_value_t = 60)]
    turn_timeout_secs: u64,

    /// Seconds allowed for shuffle, unmask, and showdown phases
    #[arg(long, env = "ROOM_PHASE_TIMEOUT_SECS", default_value_t = 30)]
    phase_timeout_secs: u64,

    /// Heartbeat ping interval in seconds; keep above the worst-case
    /// client proving time
    #[arg(long, env = "SERVER_PING_INTERVAL_SECS", default_value_t = 90)]
    ping_interval_secs: u64,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "SERVER_LOG_JSON", default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let room = RoomConfig {
        small_blind: args.small_blind,
        big_blind: args.big_blind,
        starting_stack: args.starting_stack,
        turn_timeout: Duration::from_secs(args.turn_timeout_secs),
        phase_timeout: Duration::from_secs(args.phase_timeout_secs),
        ..RoomConfig::default()
    };
    let config = ServerConfig {
        bind: args.bind,
        artifact_dir: args.artifact_dir,
        accept_unverified: args.accept_unverified,
        room,
        ping_interval: Duration::from_secs(args.ping_interval_secs),
    };
    run_server(config).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
}
