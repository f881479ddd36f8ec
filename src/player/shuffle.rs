//! Witness assembly for the shuffle, reshuffle and add-keys circuits.

use rand::{seq::SliceRandom, CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use super::keys::PlayerKeys;
use crate::curve::{point_coordinates, random_scalar, BaseField, ScalarField, DECK_SIZE};
use crate::shuffling::data_structures::check_deck_size;
use crate::shuffling::{deck_commitment, Deck, MaskedCard, ShuffleError};
use crate::verifier::CircuitType;

/// Witness for `shuffle` and `reshuffle`: the permutation, the player's
/// secret, and one masking nonce per card.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShuffleWitness {
    pub permutation: Vec<u8>,
    #[serde(with = "crate::crypto_serde::scalar")]
    pub secret: ScalarField,
    #[serde(with = "crate::crypto_serde::scalar_vec")]
    pub nonces: Vec<ScalarField>,
}

/// Witness for `add_keys`: no permutation, one boolean per card selecting
/// the identity-pk addition rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddKeysWitness {
    #[serde(with = "crate::crypto_serde::scalar")]
    pub secret: ScalarField,
    pub pk_was_identity: Vec<bool>,
}

/// Witness for `mask`: a fresh re-randomization of every card under the
/// unchanged joint key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaskWitness {
    #[serde(with = "crate::crypto_serde::scalar_vec")]
    pub nonces: Vec<ScalarField>,
}

/// A prepared shuffle-stage transition: the output deck plus everything the
/// proof needs.
#[derive(Clone, Debug)]
pub struct ShuffleStep {
    pub circuit: CircuitType,
    pub deck_after: Deck,
    pub commitment_before: BaseField,
    pub commitment_after: BaseField,
    /// `[deckCommitmentBefore, deckCommitmentAfter, playerPubX, playerPubY]`.
    pub public_signals: Vec<BaseField>,
    pub witness: ShuffleWitness,
}

/// Which permutation circuit the current deck state calls for: `shuffle`
/// for the untouched deck, `reshuffle` once a previous player has masked.
pub fn shuffle_circuit_for(deck: &[MaskedCard]) -> CircuitType {
    if deck.iter().any(|card| card.is_masked()) {
        CircuitType::Reshuffle
    } else {
        CircuitType::Shuffle
    }
}

/// Samples a permutation and fresh nonces, applies `add_and_mask` to every
/// card, and assembles the witness.
pub fn prepare_shuffle<R: Rng + CryptoRng>(
    deck: &[MaskedCard],
    keys: &PlayerKeys,
    rng: &mut R,
) -> Result<ShuffleStep, ShuffleError> {
    check_deck_size(deck)?;
    let circuit = shuffle_circuit_for(deck);

    let mut permutation: Vec<u8> = (0..DECK_SIZE as u8).collect();
    permutation.shuffle(rng);

    let mut nonces = Vec::with_capacity(DECK_SIZE);
    let mut deck_after = Vec::with_capacity(DECK_SIZE);
    for &source in &permutation {
        let nonce = random_scalar(rng);
        let card = deck[source as usize].add_and_mask(keys.secret(), &nonce)?;
        nonces.push(nonce);
        deck_after.push(card);
    }

    let commitment_before = deck_commitment(deck);
    let commitment_after = deck_commitment(&deck_after);
    let (pub_x, pub_y) = point_coordinates(&keys.public);

    Ok(ShuffleStep {
        circuit,
        deck_after,
        commitment_before,
        commitment_after,
        public_signals: vec![commitment_before, commitment_after, pub_x, pub_y],
        witness: ShuffleWitness {
            permutation,
            secret: *keys.secret(),
            nonces,
        },
    })
}

/// A prepared add-keys transition for the non-shuffling protocol variant.
#[derive(Clone, Debug)]
pub struct AddKeysStep {
    pub deck_after: Deck,
    pub commitment_before: BaseField,
    pub commitment_after: BaseField,
    pub public_signals: Vec<BaseField>,
    pub witness: AddKeysWitness,
}

/// Adds the player's key to every card in place, without permuting.
pub fn prepare_add_keys(
    deck: &[MaskedCard],
    keys: &PlayerKeys,
) -> Result<AddKeysStep, ShuffleError> {
    check_deck_size(deck)?;
    let pk_was_identity: Vec<bool> = deck.iter().map(|card| !card.is_masked()).collect();
    let deck_after: Deck = deck
        .iter()
        .map(|card| card.add_player_to_mask(keys.secret()))
        .collect::<Result<_, _>>()?;

    let commitment_before = deck_commitment(deck);
    let commitment_after = deck_commitment(&deck_after);
    let (pub_x, pub_y) = point_coordinates(&keys.public);

    Ok(AddKeysStep {
        deck_after,
        commitment_before,
        commitment_after,
        public_signals: vec![commitment_before, commitment_after, pub_x, pub_y],
        witness: AddKeysWitness {
            secret: *keys.secret(),
            pk_was_identity,
        },
    })
}

/// A prepared re-randomization for the non-shuffling protocol variant.
#[derive(Clone, Debug)]
pub struct MaskStep {
    pub deck_after: Deck,
    pub commitment_before: BaseField,
    pub commitment_after: BaseField,
    pub public_signals: Vec<BaseField>,
    pub witness: MaskWitness,
}

/// Re-randomizes every card with fresh nonces. Requires the deck to carry
/// at least one key layer already.
pub fn prepare_mask<R: Rng + CryptoRng>(
    deck: &[MaskedCard],
    keys: &PlayerKeys,
    rng: &mut R,
) -> Result<MaskStep, ShuffleError> {
    check_deck_size(deck)?;
    let mut nonces = Vec::with_capacity(DECK_SIZE);
    let mut deck_after = Vec::with_capacity(DECK_SIZE);
    for card in deck {
        let nonce = random_scalar(rng);
        deck_after.push(card.mask(&nonce)?);
        nonces.push(nonce);
    }

    let commitment_before = deck_commitment(deck);
    let commitment_after = deck_commitment(&deck_after);
    let (pub_x, pub_y) = point_coordinates(&keys.public);

    Ok(MaskStep {
        deck_after,
        commitment_before,
        commitment_after,
        public_signals: vec![commitment_before, commitment_after, pub_x, pub_y],
        witness: MaskWitness { nonces },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffling::initial_deck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_shuffle_uses_the_shuffle_circuit_and_commits_correctly() {
        let mut rng = StdRng::seed_from_u64(7);
        let keys = PlayerKeys::generate(&mut rng);
        let deck = initial_deck();

        let step = prepare_shuffle(&deck, &keys, &mut rng).unwrap();
        assert_eq!(step.circuit, CircuitType::Shuffle);
        assert_eq!(step.deck_after.len(), DECK_SIZE);
        assert_eq!(step.commitment_before, deck_commitment(&deck));
        assert_eq!(step.commitment_after, deck_commitment(&step.deck_after));
        assert_eq!(step.public_signals.len(), 4);
        // Every output card is masked by exactly this player.
        assert!(step.deck_after.iter().all(|c| c.pk == keys.public));
    }

    #[test]
    fn second_shuffle_selects_reshuffle() {
        let mut rng = StdRng::seed_from_u64(8);
        let first = PlayerKeys::generate(&mut rng);
        let second = PlayerKeys::generate(&mut rng);

        let step1 = prepare_shuffle(&initial_deck(), &first, &mut rng).unwrap();
        let step2 = prepare_shuffle(&step1.deck_after, &second, &mut rng).unwrap();
        assert_eq!(step2.circuit, CircuitType::Reshuffle);
        // The joint key now aggregates both players.
        let joint = first.public + second.public;
        assert!(step2.deck_after.iter().all(|c| c.pk == joint));
    }

    #[test]
    fn witness_permutation_is_a_bijection() {
        let mut rng = StdRng::seed_from_u64(9);
        let keys = PlayerKeys::generate(&mut rng);
        let step = prepare_shuffle(&initial_deck(), &keys, &mut rng).unwrap();

        let mut seen = [false; DECK_SIZE];
        for &index in &step.witness.permutation {
            assert!(!seen[index as usize], "repeated index {index}");
            seen[index as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn shuffled_deck_still_unmasks_to_all_card_values() {
        use crate::curve::card_index_of_point;
        use std::collections::BTreeSet;

        let mut rng = StdRng::seed_from_u64(10);
        let alice = PlayerKeys::generate(&mut rng);
        let bob = PlayerKeys::generate(&mut rng);

        let step1 = prepare_shuffle(&initial_deck(), &alice, &mut rng).unwrap();
        let step2 = prepare_shuffle(&step1.deck_after, &bob, &mut rng).unwrap();

        let mut values = BTreeSet::new();
        for card in &step2.deck_after {
            let open = card
                .partial_unmask(alice.secret())
                .unwrap()
                .partial_unmask(bob.secret())
                .unwrap();
            values.insert(card_index_of_point(&open.msg).unwrap());
        }
        assert_eq!(values.len(), DECK_SIZE);
    }

    #[test]
    fn mask_rerandomizes_without_touching_the_joint_key() {
        let mut rng = StdRng::seed_from_u64(12);
        let keys = PlayerKeys::generate(&mut rng);
        let keyed = prepare_add_keys(&initial_deck(), &keys).unwrap();

        let step = prepare_mask(&keyed.deck_after, &keys, &mut rng).unwrap();
        for (before, after) in keyed.deck_after.iter().zip(step.deck_after.iter()) {
            assert_eq!(after.pk, before.pk);
            assert_ne!(after.epk, before.epk);
            assert_ne!(after.msg, before.msg);
        }
        // The one key holder can still open every card.
        let open = step.deck_after[7].partial_unmask(keys.secret()).unwrap();
        assert_eq!(crate::curve::card_index_of_point(&open.msg), Ok(7));
    }

    #[test]
    fn mask_on_an_unkeyed_deck_is_rejected() {
        let mut rng = StdRng::seed_from_u64(13);
        let keys = PlayerKeys::generate(&mut rng);
        assert_eq!(
            prepare_mask(&initial_deck(), &keys, &mut rng).unwrap_err(),
            ShuffleError::NoParticipants
        );
    }

    #[test]
    fn add_keys_leaves_messages_untouched_on_fresh_deck() {
        let mut rng = StdRng::seed_from_u64(11);
        let keys = PlayerKeys::generate(&mut rng);
        let deck = initial_deck();

        let step = prepare_add_keys(&deck, &keys).unwrap();
        assert!(step.witness.pk_was_identity.iter().all(|&b| b));
        for (before, after) in deck.iter().zip(step.deck_after.iter()) {
            assert_eq!(after.msg, before.msg);
            assert_eq!(after.epk, before.epk);
            assert_eq!(after.pk, keys.public);
        }
    }
}
