//! Error type

use core::fmt::{self, Display};

/// Result type with the `deterministic-k` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Nonce generation and signing errors
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A required input is missing or out of range. Carries the name of the
    /// offending input.
    InvalidInput(&'static str),

    /// A nonce was requested from a generator which was never initialized.
    UninitializedState,

    /// A finite nonce source ran out of values.
    NonceSourceExhausted,

    /// The underlying signature primitive failed for a reason other than an
    /// unusable nonce.
    SigningPrimitive,

    /// A hash algorithm name was not recognized.
    UnknownHashAlgorithm,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(what) => write!(f, "invalid input: {what}"),
            Error::UninitializedState => f.write_str("nonce generator used before init"),
            Error::NonceSourceExhausted => f.write_str("nonce source exhausted"),
            Error::SigningPrimitive => f.write_str("signature primitive error"),
            Error::UnknownHashAlgorithm => f.write_str("unknown hash algorithm"),
        }
    }
}

impl core::error::Error for Error {}
