//! Delay-gate errors.

use civic_types::{ErrorKind, OperationId, Timestamp};
use thiserror::Error;

use crate::role::Role;

#[derive(Debug, Error)]
pub enum TimelockError {
    #[error("Only {0} authorized")]
    Unauthorized(Role),

    #[error("delay {requested}s is below the minimum of {minimum}s")]
    DelayTooShort { requested: u64, minimum: u64 },

    #[error("operation {0} was never scheduled")]
    UnknownOperation(OperationId),

    #[error("operation {0} is already queued")]
    AlreadyQueued(OperationId),

    #[error("operation {0} was already executed")]
    AlreadyExecuted(OperationId),

    #[error("operation {0} was canceled")]
    OperationCanceled(OperationId),

    #[error("operation {id} is not ready until {ready_at}")]
    NotReady { id: OperationId, ready_at: Timestamp },

    #[error("an Admin cannot revoke its own Admin role; use renounce_role")]
    SelfRevocation,

    #[error("the Admin role cannot be transferred to the zero address")]
    ZeroAdmin,

    #[error("dispatch of operation {id} failed: {reason}")]
    DispatchFailed { id: OperationId, reason: String },

    #[error("timestamp overflow while scheduling")]
    Overflow,
}

impl TimelockError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) | Self::SelfRevocation => ErrorKind::Authorization,
            Self::DelayTooShort { .. } | Self::UnknownOperation(_) | Self::ZeroAdmin => {
                ErrorKind::Validation
            }
            Self::AlreadyQueued(_)
            | Self::AlreadyExecuted(_)
            | Self::OperationCanceled(_)
            | Self::DispatchFailed { .. } => ErrorKind::StateConflict,
            Self::NotReady { .. } => ErrorKind::Timing,
            Self::Overflow => ErrorKind::Arithmetic,
        }
    }
}
