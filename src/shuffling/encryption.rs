//! The four card operations of the masking protocol.
//!
//! The algebra is plain exponent bookkeeping: `pk` tracks which player keys
//! hold a layer, `epk` tracks the accumulated masking nonces, and `msg`
//! carries the card value blinded by both. Any order of `partial_unmask`
//! calls by the participating players cancels the layers exactly.

use ark_ff::Zero;

use super::data_structures::MaskedCard;
use super::error::ShuffleError;
use crate::curve::{generator, ScalarField};

impl MaskedCard {
    /// Adds a player's key layer: `pk' = pk + s·G`, and for an already-masked
    /// card also `msg' = msg + s·epk` so the new layer covers the existing
    /// nonces.
    pub fn add_player_to_mask(&self, secret: &ScalarField) -> Result<MaskedCard, ShuffleError> {
        if !self.epk.is_zero() && self.pk.is_zero() {
            return Err(ShuffleError::PkAtInfinityUnexpected);
        }
        let mut next = *self;
        next.pk += generator() * secret;
        if !self.epk.is_zero() {
            next.msg += self.epk * secret;
        }
        Ok(next)
    }

    /// Re-randomizes the card under the current joint key:
    /// `epk' = epk + ρ·G`, `msg' = msg + ρ·pk`.
    pub fn mask(&self, nonce: &ScalarField) -> Result<MaskedCard, ShuffleError> {
        if self.pk.is_zero() {
            return Err(ShuffleError::NoParticipants);
        }
        let mut next = *self;
        next.epk += generator() * nonce;
        next.msg += self.pk * nonce;
        Ok(next)
    }

    /// Removes one player's layer: `msg' = msg − s·epk`, `pk' = pk − s·G`.
    ///
    /// When the last participant unmasks, both subtractions cancel exactly
    /// and `pk` lands on the identity.
    pub fn partial_unmask(&self, secret: &ScalarField) -> Result<MaskedCard, ShuffleError> {
        if self.pk.is_zero() {
            return Err(ShuffleError::AlreadyUnmasked);
        }
        let mut next = *self;
        next.msg -= self.epk * secret;
        next.pk -= generator() * secret;
        Ok(next)
    }

    /// Sequential composition used by the shuffle step: join the mask set,
    /// then re-randomize.
    pub fn add_and_mask(
        &self,
        secret: &ScalarField,
        nonce: &ScalarField,
    ) -> Result<MaskedCard, ShuffleError> {
        self.add_player_to_mask(secret)?.mask(nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{card_index_of_point, card_point};
    use ark_ff::UniformRand;
    use ark_std::test_rng;

    fn random_scalars(count: usize) -> Vec<ScalarField> {
        let mut rng = test_rng();
        (0..count).map(|_| ScalarField::rand(&mut rng)).collect()
    }

    #[test]
    fn mask_requires_a_participant() {
        let card = MaskedCard::from_card_index(0);
        let nonce = ScalarField::from(9u64);
        assert_eq!(card.mask(&nonce), Err(ShuffleError::NoParticipants));
    }

    #[test]
    fn unmask_of_untouched_card_is_rejected() {
        let card = MaskedCard::from_card_index(0);
        let secret = ScalarField::from(4u64);
        assert_eq!(
            card.partial_unmask(&secret),
            Err(ShuffleError::AlreadyUnmasked)
        );
    }

    #[test]
    fn single_player_mask_round_trip() {
        let secret = ScalarField::from(1234u64);
        let nonce = ScalarField::from(777u64);
        let card = MaskedCard::from_card_index(5)
            .add_and_mask(&secret, &nonce)
            .unwrap();
        assert!(card.is_masked());
        assert_ne!(card.msg, card_point(5));

        let open = card.partial_unmask(&secret).unwrap();
        assert!(open.pk.is_zero());
        assert_eq!(open.msg, card_point(5));
    }

    #[test]
    fn unmask_commutes_for_any_player_order() {
        // Five players mask in sequence; every unmask order must recover the
        // card value and an identity joint key.
        let secrets = random_scalars(5);
        let nonces = random_scalars(5);

        let mut card = MaskedCard::from_card_index(42);
        for (secret, nonce) in secrets.iter().zip(nonces.iter()) {
            card = card.add_and_mask(secret, nonce).unwrap();
        }

        let orders: [[usize; 5]; 4] = [
            [0, 1, 2, 3, 4],
            [4, 3, 2, 1, 0],
            [2, 0, 4, 1, 3],
            [1, 4, 0, 3, 2],
        ];
        for order in orders {
            let mut open = card;
            for player in order {
                open = open.partial_unmask(&secrets[player]).unwrap();
            }
            assert!(open.pk.is_zero());
            assert_eq!(card_index_of_point(&open.msg), Ok(42));
        }
    }

    #[test]
    fn extra_masks_by_joined_players_still_cancel() {
        let secrets = random_scalars(3);
        let extra_nonces = random_scalars(4);

        let mut card = MaskedCard::from_card_index(11);
        card = card.add_and_mask(&secrets[0], &extra_nonces[0]).unwrap();
        card = card.add_and_mask(&secrets[1], &extra_nonces[1]).unwrap();
        card = card.add_and_mask(&secrets[2], &extra_nonces[2]).unwrap();
        // A participant re-randomizes again without adding a key.
        card = card.mask(&extra_nonces[3]).unwrap();

        for player in [1, 2, 0] {
            card = card.partial_unmask(&secrets[player]).unwrap();
        }
        assert!(card.pk.is_zero());
        assert_eq!(card_index_of_point(&card.msg), Ok(11));
    }
}
