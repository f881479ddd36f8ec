//! Witness assembly for the unmask circuit.

use serde::{Deserialize, Serialize};

use super::keys::PlayerKeys;
use crate::curve::{point_coordinates, BaseField, ScalarField};
use crate::shuffling::{card_commitment, MaskedCard, ShuffleError};

/// Witness: the card being peeled and the player's secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnmaskWitness {
    pub card: MaskedCard,
    #[serde(with = "crate::crypto_serde::scalar")]
    pub secret: ScalarField,
}

/// A prepared partial unmask of one card.
#[derive(Clone, Debug)]
pub struct UnmaskStep {
    pub card_after: MaskedCard,
    pub commitment_before: BaseField,
    pub commitment_after: BaseField,
    /// `[inputCardCommitment, outputCardCommitment, playerPubX, playerPubY]`.
    pub public_signals: Vec<BaseField>,
    pub witness: UnmaskWitness,
}

pub fn prepare_unmask(card: &MaskedCard, keys: &PlayerKeys) -> Result<UnmaskStep, ShuffleError> {
    let card_after = card.partial_unmask(keys.secret())?;
    let commitment_before = card_commitment(card);
    let commitment_after = card_commitment(&card_after);
    let (pub_x, pub_y) = point_coordinates(&keys.public);
    Ok(UnmaskStep {
        card_after,
        commitment_before,
        commitment_after,
        public_signals: vec![commitment_before, commitment_after, pub_x, pub_y],
        witness: UnmaskWitness {
            card: *card,
            secret: *keys.secret(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::card_index_of_point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unmask_step_matches_the_card_algebra() {
        let mut rng = StdRng::seed_from_u64(21);
        let alice = PlayerKeys::generate(&mut rng);
        let bob = PlayerKeys::generate(&mut rng);

        let card = MaskedCard::from_card_index(13)
            .add_and_mask(alice.secret(), &ScalarField::from(3u64))
            .unwrap()
            .add_and_mask(bob.secret(), &ScalarField::from(5u64))
            .unwrap();

        let step = prepare_unmask(&card, &alice).unwrap();
        assert_eq!(step.commitment_before, card_commitment(&card));
        assert_eq!(step.commitment_after, card_commitment(&step.card_after));

        let open = step.card_after.partial_unmask(bob.secret()).unwrap();
        assert_eq!(card_index_of_point(&open.msg), Ok(13));
    }

    #[test]
    fn fully_unmasked_card_cannot_be_prepared_again() {
        let mut rng = StdRng::seed_from_u64(22);
        let alice = PlayerKeys::generate(&mut rng);
        let card = MaskedCard::from_card_index(0);
        assert_eq!(
            prepare_unmask(&card, &alice).unwrap_err(),
            ShuffleError::AlreadyUnmasked
        );
    }
}
