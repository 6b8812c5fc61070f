use civic_types::{Action, Address, BlockNumber, OperationId, ProposalId, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::proposal::VoteType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        action: Action,
        description: String,
        vote_start: BlockNumber,
        vote_end: BlockNumber,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: VoteType,
        weight: TokenAmount,
        reason: Option<String>,
    },
    ProposalQueued {
        id: ProposalId,
        operation: OperationId,
        ready_at: Timestamp,
    },
    ProposalExecuted {
        id: ProposalId,
    },
    ProposalCanceled {
        id: ProposalId,
    },
}
