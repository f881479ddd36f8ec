use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::connection::ConnectionManager;
use super::routes::{build_router, ServerContext};
use crate::config::hash_fields;
use crate::crypto_serde::field_from_decimal;
use crate::game::{RoomConfig, RoomRegistry};
use crate::showdown::RankArtifacts;
use crate::verifier::{AcceptAllVerifier, Groth16Verifier, ProofVerifier, VerificationKeyStore};

const LOG_TARGET: &str = "server::bootstrap";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory holding the eight verification keys and optional hash
    /// test vector.
    pub artifact_dir: Option<PathBuf>,
    /// Accept proof submissions without verifying. Local demos only.
    pub accept_unverified: bool,
    pub room: RoomConfig,
    pub ping_interval: Duration,
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Hand-rank tables and both Merkle trees; the roots are pinned for the
    // life of the process.
    let artifacts = RankArtifacts::global();
    info!(
        target = LOG_TARGET,
        basic_root = %artifacts.basic_root,
        flush_root = %artifacts.flush_root,
        "hand-rank tables ready"
    );

    let verifier: Arc<dyn ProofVerifier> = match (&config.artifact_dir, config.accept_unverified) {
        (Some(dir), _) => {
            check_poseidon_vector(dir)?;
            check_rank_artifacts(dir, &artifacts)?;
            let store = VerificationKeyStore::load(dir)
                .context("failed to load verification keys")?;
            Arc::new(Groth16Verifier::new(store))
        }
        (None, true) => {
            warn!(
                target = LOG_TARGET,
                "running WITHOUT proof verification; every submission is trusted"
            );
            Arc::new(AcceptAllVerifier)
        }
        (None, false) => {
            bail!("no artifact directory configured; pass one or allow unverified proofs")
        }
    };

    let shutdown = CancellationToken::new();
    let connections = Arc::new(ConnectionManager::new());
    let registry = Arc::new(RoomRegistry::new(
        config.room.clone(),
        connections.clone(),
        verifier,
        artifacts,
        shutdown.clone(),
    ));
    let context = ServerContext {
        connections,
        registry,
        ping_interval: config.ping_interval,
    };

    let router = build_router(context);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(target = LOG_TARGET, bind = %config.bind, "coordinator listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!(target = LOG_TARGET, "shutdown signal received");
        })
        .await
        .context("server error")?;

    shutdown.cancel();
    Ok(())
}

#[derive(Deserialize)]
struct PoseidonVector {
    inputs: Vec<String>,
    digest: String,
}

/// Asserts the compiled-in Poseidon against a test vector generated by the
/// circuit toolchain. A parameter drift fails startup instead of rejecting
/// every proof at runtime.
fn check_poseidon_vector(dir: &std::path::Path) -> Result<()> {
    let path = dir.join("poseidon_vector.json");
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(_) => {
            warn!(
                target = LOG_TARGET,
                path = %path.display(),
                "no Poseidon test vector; skipping hash self-check"
            );
            return Ok(());
        }
    };
    let vector: PoseidonVector =
        serde_json::from_str(&raw).context("malformed Poseidon test vector")?;
    let inputs = vector
        .inputs
        .iter()
        .map(|value| field_from_decimal(value).map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    let expected = field_from_decimal(&vector.digest).map_err(anyhow::Error::msg)?;
    if hash_fields(&inputs) != expected {
        bail!("Poseidon parameters disagree with the circuit test vector");
    }
    info!(target = LOG_TARGET, "Poseidon self-check passed");
    Ok(())
}

/// If the table-generation script's JSON artifacts are present, they must
/// agree with the in-process tables.
fn check_rank_artifacts(dir: &std::path::Path, artifacts: &RankArtifacts) -> Result<()> {
    for (file, is_flush) in [("hand_ranks_basic.json", false), ("hand_ranks_flush.json", true)] {
        let path = dir.join(file);
        let Ok(raw) = std::fs::read_to_string(&path) else {
            continue;
        };
        artifacts
            .tables
            .verify_artifact(&raw, is_flush)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("rank artifact {} rejected", path.display()))?;
        info!(target = LOG_TARGET, path = %path.display(), "rank artifact matches generated tables");
    }
    Ok(())
}
