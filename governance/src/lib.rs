//! Governance controller for the Civic engine.
//!
//! Token holders propose actions, vote with the power they held when the
//! proposal was created, and successful proposals are scheduled on the delay
//! gate and later executed through it. Proposal state is derived from stored
//! facts on every read and never advanced eagerly.

pub mod config;
pub mod error;
pub mod event;
pub mod governor;
pub mod proposal;

pub use config::GovernorConfig;
pub use error::GovernanceError;
pub use event::GovernanceEvent;
pub use governor::GovernanceController;
pub use proposal::{
    hash_description, hash_proposal, Phase, Proposal, ProposalState, Tally, VoteReceipt, VoteType,
};
