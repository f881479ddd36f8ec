use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleError {
    /// `mask` was called before any player added a key layer.
    #[error("card has no mask participants")]
    NoParticipants,
    /// `partial_unmask` was called on a card whose joint key is identity.
    #[error("card is already fully unmasked")]
    AlreadyUnmasked,
    /// A masked card (non-identity ephemeral key) carried an identity joint
    /// key; well-formed cards cannot reach this state.
    #[error("masked card carries an identity joint key")]
    PkAtInfinityUnexpected,
    #[error("deck must contain {expected} cards, got {got}")]
    InvalidDeckSize { expected: usize, got: usize },
    #[error("permutation is not a bijection over the deck")]
    InvalidPermutation,
}
