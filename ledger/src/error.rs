//! Ledger-specific errors.

use civic_types::{BlockNumber, ErrorKind, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ERC20: transfer amount exceeds balance (need {needed}, have {available})")]
    InsufficientBalance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("{0} cannot be the zero address")]
    ZeroAddress(&'static str),

    #[error("lookup of block {requested} is not yet finalized (current block {current})")]
    FutureLookup {
        requested: BlockNumber,
        current: BlockNumber,
    },

    #[error("checkpoint at block {attempted} precedes latest checkpoint at block {latest}")]
    NonMonotonicCheckpoint {
        latest: BlockNumber,
        attempted: BlockNumber,
    },

    #[error("arithmetic overflow in ledger accounting")]
    Overflow,

    #[error("invalid ledger configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot rejected: {0}")]
    Snapshot(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::ZeroAddress(_) | Self::Snapshot(_) => ErrorKind::Validation,
            Self::FutureLookup { .. } => ErrorKind::Timing,
            Self::NonMonotonicCheckpoint { .. } => ErrorKind::StateConflict,
            Self::Overflow => ErrorKind::Arithmetic,
            Self::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }
}
