use std::fs;
use std::path::Path;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use thiserror::Error;
use tracing::info;

use super::{CircuitType, ProofVerifier, VerifyError};
use crate::curve::BaseField;

const LOG_TARGET: &str = "verifier";

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("failed to read verification key for {circuit}: {source}")]
    Io {
        circuit: CircuitType,
        #[source]
        source: std::io::Error,
    },
    #[error("verification key for {circuit} is malformed")]
    Malformed { circuit: CircuitType },
}

/// All eight prepared verification keys, loaded once from the artifact
/// directory and immutable afterwards.
pub struct VerificationKeyStore {
    keys: [Option<PreparedVerifyingKey<Bn254>>; 8],
}

impl VerificationKeyStore {
    /// Reads `<circuit>.vk` for every circuit. Missing or malformed files
    /// abort startup; a coordinator without its full key set cannot verify
    /// anything.
    pub fn load(dir: &Path) -> Result<Self, KeyStoreError> {
        let mut keys: [Option<PreparedVerifyingKey<Bn254>>; 8] = Default::default();
        for circuit in CircuitType::ALL {
            let path = dir.join(circuit.key_file());
            let bytes = fs::read(&path).map_err(|source| KeyStoreError::Io { circuit, source })?;
            let vk = VerifyingKey::<Bn254>::deserialize_compressed(&bytes[..])
                .map_err(|_| KeyStoreError::Malformed { circuit })?;
            keys[circuit.table_index()] = Some(Groth16::<Bn254>::process_vk(&vk).map_err(|_| {
                KeyStoreError::Malformed { circuit }
            })?);
            info!(target = LOG_TARGET, %circuit, path = %path.display(), "verification key loaded");
        }
        Ok(Self { keys })
    }

    /// An empty store; every verification fails with `KeyNotLoaded`.
    pub fn unloaded() -> Self {
        Self {
            keys: Default::default(),
        }
    }

    pub fn get(&self, circuit: CircuitType) -> Option<&PreparedVerifyingKey<Bn254>> {
        self.keys[circuit.table_index()].as_ref()
    }
}

/// The production verifier: Groth16 over BN254.
pub struct Groth16Verifier {
    store: VerificationKeyStore,
}

impl Groth16Verifier {
    pub fn new(store: VerificationKeyStore) -> Self {
        Self { store }
    }
}

impl ProofVerifier for Groth16Verifier {
    fn verify(
        &self,
        circuit: CircuitType,
        proof: &[u8],
        public_signals: &[BaseField],
    ) -> Result<(), VerifyError> {
        let pvk = self.store.get(circuit).ok_or(VerifyError::KeyNotLoaded)?;
        // gamma_abc has one row per public input plus the constant row.
        if pvk.vk.gamma_abc_g1.len() != public_signals.len() + 1 {
            return Err(VerifyError::PublicSignalMismatch);
        }
        let proof = Proof::<Bn254>::deserialize_compressed(proof)
            .map_err(|_| VerifyError::MalformedProof)?;
        match Groth16::<Bn254>::verify_with_processed_vk(pvk, public_signals, &proof) {
            Ok(true) => Ok(()),
            Ok(false) => Err(VerifyError::Invalid),
            Err(_) => Err(VerifyError::PublicSignalMismatch),
        }
    }
}
