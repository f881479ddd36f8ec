use ark_ff::Zero;
use rand::{CryptoRng, Rng};
use zeroize::Zeroize;

use crate::curve::{generator, random_scalar, Curve, ScalarField};

/// A player's long-term key pair. The secret never leaves the client
/// process and is wiped when the keys are dropped.
pub struct PlayerKeys {
    secret: SecretScalar,
    pub public: Curve,
}

impl PlayerKeys {
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        Self::from_secret(random_scalar(rng))
    }

    pub fn from_secret(secret: ScalarField) -> Self {
        let public = generator() * secret;
        Self {
            secret: SecretScalar(secret),
            public,
        }
    }

    pub fn secret(&self) -> &ScalarField {
        &self.secret.0
    }
}

struct SecretScalar(ScalarField);

impl Zeroize for SecretScalar {
    fn zeroize(&mut self) {
        self.0 = ScalarField::zero();
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}
