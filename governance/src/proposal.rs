//! Governance proposals and their lifecycle.

use std::collections::BTreeMap;
use std::fmt;

use civic_types::hash::{blake2b_256, blake2b_256_fields};
use civic_types::{Action, Address, BlockNumber, OperationId, ProposalId, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Blake2b hash of a proposal description. Also used as the gate salt.
pub fn hash_description(description: &str) -> [u8; 32] {
    blake2b_256(description.as_bytes())
}

/// Identity of a proposal: its action and description hash.
pub fn hash_proposal(action: &Action, description_hash: &[u8; 32]) -> ProposalId {
    let [target, value, calldata] = action.hash_fields();
    ProposalId::new(blake2b_256_fields(&[
        &target,
        &value,
        &calldata,
        description_hash,
    ]))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteType {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl TryFrom<u8> for VoteType {
    type Error = GovernanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            other => Err(GovernanceError::InvalidVoteType(other)),
        }
    }
}

/// Weighted vote totals. Only ever grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_votes: TokenAmount,
    pub against_votes: TokenAmount,
    pub abstain_votes: TokenAmount,
}

impl Tally {
    pub fn add(&mut self, support: VoteType, weight: TokenAmount) -> Result<(), GovernanceError> {
        let slot = match support {
            VoteType::Against => &mut self.against_votes,
            VoteType::For => &mut self.for_votes,
            VoteType::Abstain => &mut self.abstain_votes,
        };
        *slot = slot.checked_add(weight).ok_or(GovernanceError::Overflow)?;
        Ok(())
    }

    /// Total weight cast, which is what quorum is measured against.
    pub fn participation(&self) -> Result<TokenAmount, GovernanceError> {
        self.for_votes
            .checked_add(self.against_votes)
            .and_then(|s| s.checked_add(self.abstain_votes))
            .ok_or(GovernanceError::Overflow)
    }

    pub fn majority_for(&self) -> bool {
        self.for_votes > self.against_votes
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub support: VoteType,
    pub weight: TokenAmount,
    pub reason: Option<String>,
}

/// Stored lifecycle facts. Everything else about a proposal's state is
/// derived from these plus the current block, time and gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Open,
    Canceled,
    Queued {
        operation: OperationId,
        ready_at: Timestamp,
    },
    Executed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Expired,
    Executed,
}

impl ProposalState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Defeated | Self::Expired | Self::Executed
        )
    }

    /// Whether a proposal may go directly from `self` to `next`.
    pub fn can_transition_to(&self, next: ProposalState) -> bool {
        use ProposalState::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Canceled)
                | (Active, Canceled)
                | (Active, Defeated)
                | (Active, Succeeded)
                | (Succeeded, Queued)
                | (Queued, Executed)
                | (Queued, Expired)
                | (Queued, Canceled)
        )
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub action: Action,
    pub description: String,
    pub description_hash: [u8; 32],
    /// Snapshot block: vote weights are read as of the end of it.
    pub created_at: BlockNumber,
    pub vote_start: BlockNumber,
    pub vote_end: BlockNumber,
    /// Participation needed to pass, fixed at creation.
    pub quorum: TokenAmount,
    pub tally: Tally,
    pub voters: BTreeMap<Address, VoteReceipt>,
    pub phase: Phase,
}

impl Proposal {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains_key(voter)
    }

    /// Whether the closed vote reached quorum with more for than against.
    pub fn passed(&self) -> Result<bool, GovernanceError> {
        Ok(self.tally.participation()? >= self.quorum && self.tally.majority_for())
    }

    /// State while the proposal is still open and voting has not closed.
    pub(crate) fn voting_state(&self, block: BlockNumber) -> Option<ProposalState> {
        if self.phase != Phase::Open {
            return None;
        }
        if block < self.vote_start {
            Some(ProposalState::Pending)
        } else if block <= self.vote_end {
            Some(ProposalState::Active)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_type_from_u8() {
        assert_eq!(VoteType::try_from(0).unwrap(), VoteType::Against);
        assert_eq!(VoteType::try_from(1).unwrap(), VoteType::For);
        assert_eq!(VoteType::try_from(2).unwrap(), VoteType::Abstain);
        assert!(matches!(
            VoteType::try_from(3),
            Err(GovernanceError::InvalidVoteType(3))
        ));
    }

    #[test]
    fn tally_accumulates_by_support() {
        let mut tally = Tally::default();
        tally.add(VoteType::For, TokenAmount::whole(100)).unwrap();
        tally.add(VoteType::Against, TokenAmount::whole(40)).unwrap();
        tally.add(VoteType::Abstain, TokenAmount::whole(60)).unwrap();
        tally.add(VoteType::For, TokenAmount::ZERO).unwrap();
        assert_eq!(tally.for_votes, TokenAmount::whole(100));
        assert_eq!(tally.participation().unwrap(), TokenAmount::whole(200));
        assert!(tally.majority_for());
    }

    #[test]
    fn tied_tally_is_not_a_majority() {
        let mut tally = Tally::default();
        tally.add(VoteType::For, TokenAmount::whole(5)).unwrap();
        tally.add(VoteType::Against, TokenAmount::whole(5)).unwrap();
        assert!(!tally.majority_for());
    }

    #[test]
    fn tally_overflow_is_reported() {
        let mut tally = Tally::default();
        tally.add(VoteType::For, TokenAmount::from_raw(u128::MAX)).unwrap();
        assert!(matches!(
            tally.add(VoteType::For, TokenAmount::from_raw(1)),
            Err(GovernanceError::Overflow)
        ));
    }

    #[test]
    fn lifecycle_edges() {
        use ProposalState::*;
        assert!(Pending.can_transition_to(Active));
        assert!(Active.can_transition_to(Succeeded));
        assert!(Succeeded.can_transition_to(Queued));
        assert!(Queued.can_transition_to(Expired));
        assert!(!Defeated.can_transition_to(Queued));
        assert!(!Succeeded.can_transition_to(Canceled));
        assert!(!Executed.can_transition_to(Queued));
        for terminal in [Canceled, Defeated, Expired, Executed] {
            assert!(terminal.is_terminal());
        }
    }

    #[test]
    fn ids_depend_on_description() {
        let action = Action::transfer(Address::from_label("grantee"), TokenAmount::whole(1));
        let a = hash_proposal(&action, &hash_description("fund the grant"));
        let b = hash_proposal(&action, &hash_description("fund the grant again"));
        assert_ne!(a, b);
        assert_eq!(a, hash_proposal(&action, &hash_description("fund the grant")));
    }
}
