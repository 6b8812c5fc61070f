//! Append-only voting-power history.

use crate::error::LedgerError;
use civic_types::BlockNumber;
use serde::{Deserialize, Serialize};

/// Voting power recorded at a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub block: BlockNumber,
    /// Raw token units.
    pub votes: u128,
}

/// Checkpoints of one delegate (or of total supply), strictly increasing by block.
///
/// Several writes within the same block collapse into one entry holding the
/// last value, so a lookup for a block always returns the power at the end of it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHistory {
    entries: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `votes` as of `block`.
    pub fn push(&mut self, block: BlockNumber, votes: u128) -> Result<(), LedgerError> {
        match self.entries.last_mut() {
            Some(last) if last.block == block => {
                last.votes = votes;
            }
            Some(last) if last.block > block => {
                return Err(LedgerError::NonMonotonicCheckpoint {
                    latest: last.block,
                    attempted: block,
                });
            }
            _ => self.entries.push(Checkpoint { block, votes }),
        }
        Ok(())
    }

    /// Current value (zero if nothing was ever recorded).
    pub fn latest(&self) -> u128 {
        self.entries.last().map_or(0, |c| c.votes)
    }

    /// Value of the latest checkpoint at or before `block`, or zero.
    pub fn upper_lookup(&self, block: BlockNumber) -> u128 {
        // Most lookups target recent blocks; check the tail before searching.
        match self.entries.last() {
            None => return 0,
            Some(last) if last.block <= block => return last.votes,
            _ => {}
        }
        let pos = self.entries.partition_point(|c| c.block <= block);
        if pos == 0 {
            0
        } else {
            self.entries[pos - 1].votes
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Checkpoint] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(points: &[(BlockNumber, u128)]) -> CheckpointHistory {
        let mut h = CheckpointHistory::new();
        for &(block, votes) in points {
            h.push(block, votes).unwrap();
        }
        h
    }

    #[test]
    fn empty_history_reads_zero() {
        let h = CheckpointHistory::new();
        assert_eq!(h.latest(), 0);
        assert_eq!(h.upper_lookup(100), 0);
        assert!(h.is_empty());
    }

    #[test]
    fn lookup_finds_latest_at_or_before() {
        let h = history(&[(10, 100), (20, 250), (30, 50)]);
        assert_eq!(h.upper_lookup(9), 0);
        assert_eq!(h.upper_lookup(10), 100);
        assert_eq!(h.upper_lookup(19), 100);
        assert_eq!(h.upper_lookup(20), 250);
        assert_eq!(h.upper_lookup(29), 250);
        assert_eq!(h.upper_lookup(30), 50);
        assert_eq!(h.upper_lookup(1_000), 50);
        assert_eq!(h.latest(), 50);
    }

    #[test]
    fn same_block_writes_collapse() {
        let h = history(&[(5, 1), (5, 2), (5, 3)]);
        assert_eq!(h.len(), 1);
        assert_eq!(h.upper_lookup(5), 3);
    }

    #[test]
    fn earlier_block_is_rejected() {
        let mut h = history(&[(10, 1)]);
        let err = h.push(9, 2).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NonMonotonicCheckpoint { latest: 10, attempted: 9 }
        ));
        assert_eq!(h.latest(), 1);
    }

    #[test]
    fn entries_stay_strictly_increasing() {
        let h = history(&[(1, 1), (3, 2), (3, 4), (7, 0), (8, 9)]);
        let blocks: Vec<_> = h.entries().iter().map(|c| c.block).collect();
        assert_eq!(blocks, vec![1, 3, 7, 8]);
    }
}
