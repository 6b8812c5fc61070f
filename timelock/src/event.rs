use civic_types::{Action, Address, OperationId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelockEvent {
    CallScheduled {
        id: OperationId,
        action: Action,
        ready_at: Timestamp,
    },
    CallExecuted {
        id: OperationId,
        action: Action,
    },
    Cancelled {
        id: OperationId,
    },
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
    OwnershipTransferred {
        previous: Address,
        new: Address,
    },
    MinDelayChanged {
        old_secs: u64,
        new_secs: u64,
    },
}
