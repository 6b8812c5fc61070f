//! The host's view of the chain, handed to every engine call.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Position in the host's totally ordered sequence of blocks.
pub type BlockNumber = u64;

/// Current block number and block timestamp as seen by the call being executed.
///
/// Voting windows and checkpoints are measured in blocks; the delay gate and
/// proposal expiry are measured in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContext {
    pub block: BlockNumber,
    pub timestamp: Timestamp,
}

impl ChainContext {
    pub fn new(block: BlockNumber, timestamp: Timestamp) -> Self {
        Self { block, timestamp }
    }
}
