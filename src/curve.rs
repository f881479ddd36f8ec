//! BabyJubJub curve core.
//!
//! Every card lives on the BabyJubJub twisted Edwards curve, whose base field
//! is the BN254 scalar field. The affine identity is `(0, 1)`, a valid curve
//! point; `CurveGroup::is_zero` is the canonical "never masked" test wherever
//! the protocol distinguishes an untouched component from a real mask layer.

use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{UniformRand, Zero};
use rand::{CryptoRng, Rng};
use thiserror::Error;

pub type Curve = ark_ed_on_bn254::EdwardsProjective;
pub type CurveAffine = ark_ed_on_bn254::EdwardsAffine;

/// The BN254 scalar field: coordinates, commitments and public signals.
pub type BaseField = ark_ed_on_bn254::Fq;
/// The prime-order-subgroup scalar field: secrets and masking nonces.
pub type ScalarField = ark_ed_on_bn254::Fr;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    #[error("point is not on the curve or outside the prime-order subgroup")]
    InvalidPoint,
    #[error("point does not encode a card value")]
    NotACardValue,
}

pub fn generator() -> Curve {
    Curve::generator()
}

/// Uniform scalar in `[0, L)` from a CSPRNG.
pub fn random_scalar<R: Rng + CryptoRng>(rng: &mut R) -> ScalarField {
    ScalarField::rand(rng)
}

/// Deterministic card-value point for deck index `0..52`: `(i + 1) · G`.
///
/// The offset keeps index 0 away from the identity so an unmasked card is
/// always a non-trivial point.
pub fn card_point(index: u8) -> Curve {
    debug_assert!((index as usize) < DECK_SIZE);
    generator() * ScalarField::from(index as u64 + 1)
}

/// Inverse of [`card_point`]: recovers the deck index of a fully unmasked
/// message point.
pub fn card_index_of_point(point: &Curve) -> Result<u8, CurveError> {
    let mut acc = Curve::zero();
    let g = generator();
    for index in 0..DECK_SIZE as u8 {
        acc += g;
        if acc == *point {
            return Ok(index);
        }
    }
    Err(CurveError::NotACardValue)
}

/// Validates affine coordinates received off the wire.
///
/// Rejects declared points that fail the curve equation or the subgroup
/// check; the coordinator never lets a malformed point reach the card
/// algebra.
pub fn point_from_coordinates(x: BaseField, y: BaseField) -> Result<Curve, CurveError> {
    let affine = CurveAffine::new_unchecked(x, y);
    if !affine.is_on_curve() || !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CurveError::InvalidPoint);
    }
    Ok(affine.into())
}

/// Affine coordinates of a point, with the twisted Edwards identity mapped to
/// its genuine affine form `(0, 1)`.
pub fn point_coordinates(point: &Curve) -> (BaseField, BaseField) {
    let affine = point.into_affine();
    match affine.xy() {
        Some((x, y)) => (x, y),
        None => (BaseField::zero(), BaseField::from(1u64)),
    }
}
