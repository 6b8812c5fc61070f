//! Nullable chain: a block height and timestamp that only move when told to.

use civic_types::{BlockNumber, ChainContext, Timestamp};

/// A deterministic chain position for testing.
///
/// Mining a block advances the timestamp by `block_time_secs`.
#[derive(Clone, Debug)]
pub struct NullChain {
    block: BlockNumber,
    timestamp: u64,
    block_time_secs: u64,
}

impl NullChain {
    pub fn new(block: BlockNumber, timestamp_secs: u64, block_time_secs: u64) -> Self {
        Self {
            block,
            timestamp: timestamp_secs,
            block_time_secs,
        }
    }

    /// The context for calls made in the current block.
    pub fn context(&self) -> ChainContext {
        ChainContext::new(self.block, Timestamp::new(self.timestamp))
    }

    pub fn block(&self) -> BlockNumber {
        self.block
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp)
    }

    pub fn block_time_secs(&self) -> u64 {
        self.block_time_secs
    }

    /// Mine `blocks` blocks.
    pub fn mine(&mut self, blocks: u64) -> ChainContext {
        self.block = self.block.saturating_add(blocks);
        self.timestamp = self
            .timestamp
            .saturating_add(blocks.saturating_mul(self.block_time_secs));
        self.context()
    }

    /// Let `secs` pass, mining the blocks that fit in that time (at least one).
    pub fn advance_time(&mut self, secs: u64) -> ChainContext {
        let blocks = match self.block_time_secs {
            0 => 1,
            t => (secs / t).max(1),
        };
        self.block = self.block.saturating_add(blocks);
        self.timestamp = self.timestamp.saturating_add(secs);
        self.context()
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(1, 0, 12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mine_moves_block_and_time() {
        let mut chain = NullChain::new(10, 1_000, 12);
        let ctx = chain.mine(5);
        assert_eq!(ctx.block, 15);
        assert_eq!(ctx.timestamp, Timestamp::new(1_060));
    }

    #[test]
    fn advance_time_mines_at_least_one_block() {
        let mut chain = NullChain::new(1, 0, 12);
        assert_eq!(chain.advance_time(5).block, 2);
        let ctx = chain.advance_time(172_800);
        assert_eq!(ctx.block, 2 + 14_400);
        assert_eq!(ctx.timestamp, Timestamp::new(172_805));
    }

    #[test]
    fn context_is_stable_between_moves() {
        let chain = NullChain::default();
        assert_eq!(chain.context(), chain.context());
        assert_eq!(chain.block(), 1);
    }
}
