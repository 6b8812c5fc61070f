//! Integrity-checked ledger snapshots.
//!
//! A snapshot is the bincode encoding of the full ledger state plus a Blake2b
//! digest over those bytes. Restoring re-hashes the payload and re-checks the
//! conservation invariants before handing back a ledger.

use civic_types::hash::blake2b_256;
use civic_types::BlockNumber;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::VotingLedger;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    /// Block the snapshot was taken at.
    pub block: BlockNumber,
    pub digest: [u8; 32],
    payload: Vec<u8>,
}

impl LedgerSnapshot {
    pub(crate) fn capture(ledger: &VotingLedger, block: BlockNumber) -> Result<Self, LedgerError> {
        let payload = bincode::serialize(ledger)
            .map_err(|e| LedgerError::Snapshot(format!("encode: {e}")))?;
        let digest = blake2b_256(&payload);
        tracing::debug!(block, bytes = payload.len(), "ledger snapshot captured");
        Ok(Self {
            version: SNAPSHOT_VERSION,
            block,
            digest,
            payload,
        })
    }

    pub(crate) fn restore(&self) -> Result<VotingLedger, LedgerError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(LedgerError::Snapshot(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if blake2b_256(&self.payload) != self.digest {
            return Err(LedgerError::Snapshot("digest mismatch".into()));
        }
        let ledger: VotingLedger = bincode::deserialize(&self.payload)
            .map_err(|e| LedgerError::Snapshot(format!("decode: {e}")))?;
        ledger.check_invariants()?;
        Ok(ledger)
    }

    /// Serialize the snapshot for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Snapshot(format!("encode: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Snapshot(format!("decode: {e}")))
    }
}
