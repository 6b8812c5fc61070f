//! Error categories shared across crates, plus text parsing errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Every engine error falls into exactly one of these categories.
///
/// Each crate's error enum exposes `kind()` so hosts can branch on the
/// category without matching individual variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller lacks the required role or identity.
    Authorization,
    /// Malformed, unknown or duplicate input.
    Validation,
    /// Transfer exceeds available funds.
    InsufficientBalance,
    /// Operation attempted outside its legal block or time window.
    Timing,
    /// Operation attempted in the wrong lifecycle state.
    StateConflict,
    /// Checked arithmetic overflowed or underflowed.
    Arithmetic,
    /// Deployment parameters are out of range.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::InsufficientBalance => "insufficient_balance",
            Self::Timing => "timing",
            Self::StateConflict => "state_conflict",
            Self::Arithmetic => "arithmetic",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Errors from parsing addresses and amounts out of text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("address must be 40 hex digits, got {0}")]
    AddressLength(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("amount has {0} fractional digits, at most 18 allowed")]
    TooManyDecimals(usize),

    #[error("amount does not fit in 128 bits of raw units")]
    AmountOverflow,
}
