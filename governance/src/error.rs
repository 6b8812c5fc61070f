use civic_ledger::LedgerError;
use civic_timelock::TimelockError;
use civic_types::{Address, BlockNumber, ErrorKind, ProposalId, Timestamp, TokenAmount};
use thiserror::Error;

use crate::proposal::ProposalState;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),

    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("proposal description cannot be empty")]
    EmptyDescription,

    #[error("invalid vote type {0}: expected 0 (against), 1 (for) or 2 (abstain)")]
    InvalidVoteType(u8),

    #[error("proposer has {votes} votes, below the proposal threshold of {threshold}")]
    BelowProposalThreshold {
        votes: TokenAmount,
        threshold: TokenAmount,
    },

    #[error("voting is not active (proposal is {state})")]
    InactiveProposal { state: ProposalState },

    #[error("{voter} has already voted on this proposal")]
    AlreadyVoted { voter: Address },

    #[error("voting has not ended (ends after block {vote_end}, current block {current})")]
    VotingNotEnded {
        vote_end: BlockNumber,
        current: BlockNumber,
    },

    #[error("proposal has not succeeded (state {state})")]
    NotSucceeded { state: ProposalState },

    #[error("proposal is not queued (state {state})")]
    NotQueued { state: ProposalState },

    #[error("proposal {0} expired before execution")]
    ProposalExpired(ProposalId),

    #[error("timelock delay has not elapsed (ready at {ready_at}, now {now})")]
    TimelockNotReady { ready_at: Timestamp, now: Timestamp },

    #[error("proposal cannot be canceled once voting has ended (state {state})")]
    NotCancelable { state: ProposalState },

    #[error("{0} may not cancel this proposal")]
    Unauthorized(Address),

    #[error("invalid governor configuration: {0}")]
    InvalidConfig(String),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownProposal(_)
            | Self::DuplicateProposal(_)
            | Self::EmptyDescription
            | Self::InvalidVoteType(_)
            | Self::BelowProposalThreshold { .. } => ErrorKind::Validation,
            Self::InactiveProposal { .. }
            | Self::VotingNotEnded { .. }
            | Self::TimelockNotReady { .. } => ErrorKind::Timing,
            Self::AlreadyVoted { .. }
            | Self::NotSucceeded { .. }
            | Self::NotQueued { .. }
            | Self::NotCancelable { .. }
            | Self::ProposalExpired(_) => ErrorKind::StateConflict,
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::Overflow => ErrorKind::Arithmetic,
            Self::Ledger(e) => e.kind(),
            Self::Timelock(e) => e.kind(),
        }
    }
}
