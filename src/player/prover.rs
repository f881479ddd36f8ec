use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::{ActionStep, ActionWitness};
use super::hand_eval::{HandEvalWitness, HandRevealStep};
use super::shuffle::{AddKeysStep, AddKeysWitness, MaskStep, MaskWitness, ShuffleStep, ShuffleWitness};
use super::unmask::{UnmaskStep, UnmaskWitness};
use crate::verifier::CircuitType;

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("witness does not fit circuit {0}")]
    WitnessMismatch(CircuitType),
    #[error("proof generation failed: {0}")]
    Backend(String),
}

/// A fully assembled witness, ready for the external proving backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "circuit", rename_all = "snake_case")]
pub enum CircuitWitness {
    Shuffle(ShuffleWitness),
    Reshuffle(ShuffleWitness),
    AddKeys(AddKeysWitness),
    Mask(MaskWitness),
    Unmask(UnmaskWitness),
    GameAction(ActionWitness),
    HandEval(HandEvalWitness),
}

impl CircuitWitness {
    pub fn circuit(&self) -> CircuitType {
        match self {
            CircuitWitness::Shuffle(_) => CircuitType::Shuffle,
            CircuitWitness::Reshuffle(_) => CircuitType::Reshuffle,
            CircuitWitness::AddKeys(_) => CircuitType::AddKeys,
            CircuitWitness::Mask(_) => CircuitType::Mask,
            CircuitWitness::Unmask(_) => CircuitType::Unmask,
            CircuitWitness::GameAction(_) => CircuitType::GameAction,
            CircuitWitness::HandEval(_) => CircuitType::HandEval,
        }
    }
}

impl From<&ShuffleStep> for CircuitWitness {
    fn from(step: &ShuffleStep) -> Self {
        match step.circuit {
            CircuitType::Reshuffle => CircuitWitness::Reshuffle(step.witness.clone()),
            _ => CircuitWitness::Shuffle(step.witness.clone()),
        }
    }
}

impl From<&AddKeysStep> for CircuitWitness {
    fn from(step: &AddKeysStep) -> Self {
        CircuitWitness::AddKeys(step.witness.clone())
    }
}

impl From<&MaskStep> for CircuitWitness {
    fn from(step: &MaskStep) -> Self {
        CircuitWitness::Mask(step.witness.clone())
    }
}

impl From<&UnmaskStep> for CircuitWitness {
    fn from(step: &UnmaskStep) -> Self {
        CircuitWitness::Unmask(step.witness.clone())
    }
}

impl From<&ActionStep> for CircuitWitness {
    fn from(step: &ActionStep) -> Self {
        CircuitWitness::GameAction(step.witness.clone())
    }
}

impl From<&HandRevealStep> for CircuitWitness {
    fn from(step: &HandRevealStep) -> Self {
        CircuitWitness::HandEval(step.witness.clone())
    }
}

/// The proving backend seam. Implementations wrap the Groth16 prover for
/// the compiled circuits; witness assembly upstream guarantees the inputs
/// satisfy the constraints, so a failure here is an environment problem,
/// not a protocol one.
#[async_trait]
pub trait Prover: Send + Sync {
    async fn prove(&self, witness: &CircuitWitness) -> Result<Vec<u8>, ProverError>;
}

/// Emits empty proof blobs. Pairs with
/// [`crate::verifier::AcceptAllVerifier`] for tests and local demos.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProver;

#[async_trait]
impl Prover for MockProver {
    async fn prove(&self, _witness: &CircuitWitness) -> Result<Vec<u8>, ProverError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{prepare_shuffle, prepare_unmask, PlayerKeys};
    use crate::shuffling::initial_deck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn witness_bundles_name_their_circuits() {
        let mut rng = StdRng::seed_from_u64(33);
        let keys = PlayerKeys::generate(&mut rng);

        let shuffle = prepare_shuffle(&initial_deck(), &keys, &mut rng).unwrap();
        let witness = CircuitWitness::from(&shuffle);
        assert_eq!(witness.circuit(), CircuitType::Shuffle);

        let reshuffle = prepare_shuffle(&shuffle.deck_after, &keys, &mut rng).unwrap();
        assert_eq!(
            CircuitWitness::from(&reshuffle).circuit(),
            CircuitType::Reshuffle
        );

        let unmask = prepare_unmask(&reshuffle.deck_after[0], &keys).unwrap();
        let unmask_witness = CircuitWitness::from(&unmask);
        assert_eq!(unmask_witness.circuit(), CircuitType::Unmask);

        let proof = MockProver.prove(&witness).await.unwrap();
        assert!(proof.is_empty());
    }

    #[tokio::test]
    async fn witness_bundle_round_trips_through_json() {
        let mut rng = StdRng::seed_from_u64(34);
        let keys = PlayerKeys::generate(&mut rng);
        let step = prepare_unmask(
            &crate::shuffling::MaskedCard::from_card_index(5)
                .add_and_mask(keys.secret(), &crate::curve::ScalarField::from(9u64))
                .unwrap(),
            &keys,
        )
        .unwrap();
        let witness = CircuitWitness::from(&step);

        let json = serde_json::to_string(&witness).unwrap();
        assert!(json.contains("\"circuit\":\"unmask\""));
        let restored: CircuitWitness = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.circuit(), CircuitType::Unmask);
        let proof = MockProver.prove(&restored).await.unwrap();
        assert!(proof.is_empty());
    }
}
