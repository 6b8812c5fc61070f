//! Voting ledger for the Civic governance engine.
//!
//! A fixed-supply balance ledger with a delegation overlay. Every change to a
//! delegate's voting power appends a checkpoint, so the power any account held
//! at a past block can be recovered with a binary search. Proposals read those
//! historical values, which keeps an in-flight tally immune to transfers and
//! re-delegations made after the proposal was created.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod snapshot;

pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use config::{DelegationMode, LedgerConfig};
pub use error::LedgerError;
pub use event::LedgerEvent;
pub use ledger::VotingLedger;
pub use snapshot::LedgerSnapshot;
