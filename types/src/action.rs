//! The action payload carried by proposals and queued operations.

use crate::address::Address;
use crate::amount::TokenAmount;
use serde::{Deserialize, Serialize};

/// A call to be performed once governance approves it: who receives it,
/// how much value moves with it and the opaque call data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target: Address,
    pub value: TokenAmount,
    #[serde(default)]
    pub calldata: Vec<u8>,
}

impl Action {
    pub fn new(target: Address, value: TokenAmount, calldata: impl Into<Vec<u8>>) -> Self {
        Self {
            target,
            value,
            calldata: calldata.into(),
        }
    }

    /// A plain value transfer with no call data.
    pub fn transfer(target: Address, value: TokenAmount) -> Self {
        Self::new(target, value, Vec::new())
    }

    /// The byte fields that identify this action, in hashing order.
    pub fn hash_fields(&self) -> [Vec<u8>; 3] {
        [
            self.target.as_bytes().to_vec(),
            self.value.raw().to_le_bytes().to_vec(),
            self.calldata.clone(),
        ]
    }
}
