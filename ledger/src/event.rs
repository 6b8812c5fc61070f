//! Events emitted by the voting ledger.

use civic_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Balance moved between holders (`from` is zero for the genesis mint).
    Transfer {
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
    /// A holder pointed its voting power at a new delegate.
    DelegateChanged {
        delegator: Address,
        from_delegate: Option<Address>,
        to_delegate: Address,
    },
    /// A delegate's checkpointed voting power changed.
    DelegateVotesChanged {
        delegate: Address,
        previous: TokenAmount,
        current: TokenAmount,
    },
}
