//! Fundamental types for the Civic governance engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, token amounts, derived identifiers, timestamps, the chain context
//! handed in by the host, the action payload and the error categories.

pub mod action;
pub mod address;
pub mod amount;
pub mod context;
pub mod error;
pub mod hash;
pub mod time;

pub use action::Action;
pub use address::Address;
pub use amount::TokenAmount;
pub use context::{BlockNumber, ChainContext};
pub use error::{ErrorKind, ParseError};
pub use hash::{OperationId, ProposalId};
pub use time::Timestamp;
