//! Groth16 proof verification.
//!
//! The proving system is a black box behind [`ProofVerifier`]: the engine
//! only ever asks "does this proof verify for this circuit under these
//! public signals". Verification keys are loaded once at startup and shared
//! read-only for the life of the process.

mod circuit;
mod groth16;

pub use circuit::CircuitType;
pub use groth16::{Groth16Verifier, VerificationKeyStore};

use thiserror::Error;

use crate::curve::BaseField;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("unknown circuit")]
    UnknownCircuit,
    #[error("proof bytes are malformed")]
    MalformedProof,
    #[error("public signals do not match the circuit layout")]
    PublicSignalMismatch,
    #[error("verification key is not loaded")]
    KeyNotLoaded,
    #[error("proof is invalid")]
    Invalid,
}

/// The verification seam the coordinator depends on.
pub trait ProofVerifier: Send + Sync {
    fn verify(
        &self,
        circuit: CircuitType,
        proof: &[u8],
        public_signals: &[BaseField],
    ) -> Result<(), VerifyError>;
}

/// Accepts every structurally well-formed submission. For tests and local
/// demos without circuit artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllVerifier;

impl ProofVerifier for AcceptAllVerifier {
    fn verify(
        &self,
        _circuit: CircuitType,
        _proof: &[u8],
        _public_signals: &[BaseField],
    ) -> Result<(), VerifyError> {
        Ok(())
    }
}

/// Rejects everything. For failure-path tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAllVerifier;

impl ProofVerifier for RejectAllVerifier {
    fn verify(
        &self,
        _circuit: CircuitType,
        _proof: &[u8],
        _public_signals: &[BaseField],
    ) -> Result<(), VerifyError> {
        Err(VerifyError::Invalid)
    }
}
