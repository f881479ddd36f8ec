use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_crypto_primitives::sponge::{poseidon::PoseidonSponge, CryptographicSponge};
use ark_ff::PrimeField;
use once_cell::sync::Lazy;

use crate::curve::BaseField;

/// Sponge rate and capacity shared with the proving circuits.
const RATE: usize = 2;
const CAPACITY: usize = 1;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 57;
const ALPHA: u64 = 5;

/// Circuit-facing bound on hash arity; proof public inputs never commit to
/// more elements than this in one hash.
pub const MAX_HASH_INPUTS: usize = 16;

/// Returns the Poseidon configuration for the given field.
///
/// Parameters are derived deterministically from the field modulus, so every
/// process (and the circuit toolchain, which consumes the same derivation)
/// arrives at identical round constants and MDS matrix.
pub fn poseidon_config<F: PrimeField>() -> PoseidonConfig<F> {
    let (ark, mds) = find_poseidon_ark_and_mds::<F>(
        F::MODULUS_BIT_SIZE as u64,
        RATE,
        FULL_ROUNDS as u64,
        PARTIAL_ROUNDS as u64,
        0,
    );
    PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, CAPACITY)
}

static BASE_FIELD_CONFIG: Lazy<PoseidonConfig<BaseField>> = Lazy::new(poseidon_config::<BaseField>);

/// The commitment hash `H` of the protocol: absorbs up to 16 base-field
/// elements and squeezes one.
///
/// The input length is absorbed ahead of the inputs, so `H([x])` and
/// `H([x, 0])` are distinct. The circuits instantiate the hash with the same
/// length tag; this is the bit-exactness contract the startup self-check
/// asserts.
pub fn hash_fields(inputs: &[BaseField]) -> BaseField {
    let mut sponge = PoseidonSponge::new(&BASE_FIELD_CONFIG);
    sponge.absorb(&BaseField::from(inputs.len() as u64));
    for input in inputs {
        sponge.absorb(input);
    }
    sponge.squeeze_field_elements(1)[0]
}

/// Two-ary Poseidon used at every internal Merkle node.
pub fn hash_pair(left: BaseField, right: BaseField) -> BaseField {
    hash_fields(&[left, right])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn hash_is_deterministic_across_sponge_instances() {
        let inputs = [BaseField::from(7u64), BaseField::from(11u64)];
        assert_eq!(hash_fields(&inputs), hash_fields(&inputs));
    }

    #[test]
    fn length_tag_separates_padded_inputs() {
        let x = BaseField::from(42u64);
        assert_ne!(hash_fields(&[x]), hash_fields(&[x, BaseField::zero()]));
    }

    #[test]
    fn config_regeneration_matches_cached_parameters() {
        let fresh = poseidon_config::<BaseField>();
        assert_eq!(fresh.ark, BASE_FIELD_CONFIG.ark);
        assert_eq!(fresh.mds, BASE_FIELD_CONFIG.mds);
    }

    #[test]
    fn arity_six_card_hash_differs_from_padded_arity_eight() {
        let six = vec![BaseField::from(3u64); 6];
        let mut eight = six.clone();
        eight.push(BaseField::zero());
        eight.push(BaseField::zero());
        assert_ne!(hash_fields(&six), hash_fields(&eight));
    }
}
