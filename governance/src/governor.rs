//! The governance controller.

use std::collections::{BTreeMap, HashMap};

use civic_ledger::VotingLedger;
use civic_timelock::{ActionHandler, DelayGate, OperationState, Role, TimelockError};
use civic_types::{Action, Address, BlockNumber, ChainContext, OperationId, ProposalId, TokenAmount};

use crate::config::GovernorConfig;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::proposal::{
    hash_description, hash_proposal, Phase, Proposal, ProposalState, Tally, VoteReceipt, VoteType,
};

/// Runs proposals from creation through execution on the delay gate.
///
/// The controller owns no tokens and no queue. It reads vote weights from a
/// [`VotingLedger`] and schedules through a [`DelayGate`], both handed in per
/// call, acting on the gate as its own `address`.
#[derive(Debug)]
pub struct GovernanceController {
    address: Address,
    config: GovernorConfig,
    proposals: HashMap<ProposalId, Proposal>,
    order: Vec<ProposalId>,
    events: Vec<GovernanceEvent>,
}

impl GovernanceController {
    pub fn new(config: GovernorConfig, address: Address) -> Result<Self, GovernanceError> {
        config.validate()?;
        tracing::debug!(
            %address,
            quorum_percentage = config.quorum_percentage,
            voting_delay = config.voting_delay,
            voting_period = config.voting_period,
            "governor deployed"
        );
        Ok(Self {
            address,
            config,
            proposals: HashMap::new(),
            order: Vec::new(),
            events: Vec::new(),
        })
    }

    // ── Parameters ───────────────────────────────────────────────────────

    /// The identity this controller uses when calling the gate.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn voting_delay(&self) -> u64 {
        self.config.voting_delay
    }

    pub fn voting_period(&self) -> u64 {
        self.config.voting_period
    }

    pub fn quorum_percentage(&self) -> u8 {
        self.config.quorum_percentage
    }

    /// Participation required at `block`: a percentage of past total supply.
    pub fn quorum(
        &self,
        ctx: &ChainContext,
        ledger: &VotingLedger,
        block: BlockNumber,
    ) -> Result<TokenAmount, GovernanceError> {
        let supply = ledger.get_past_total_supply(block, ctx)?;
        self.quorum_of(supply)
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Create a proposal. Its snapshot is the current block, and voting
    /// opens `voting_delay` blocks later.
    pub fn propose(
        &mut self,
        ctx: &ChainContext,
        ledger: &VotingLedger,
        proposer: Address,
        action: Action,
        description: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }

        let threshold = self.config.proposal_threshold;
        if !threshold.is_zero() {
            let votes = match ctx.block.checked_sub(1) {
                Some(prev) => ledger.get_past_votes(&proposer, prev, ctx)?,
                None => TokenAmount::ZERO,
            };
            if votes < threshold {
                return Err(GovernanceError::BelowProposalThreshold { votes, threshold });
            }
        }

        let description_hash = hash_description(&description);
        let id = hash_proposal(&action, &description_hash);
        if self.proposals.contains_key(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let vote_start = ctx
            .block
            .checked_add(self.config.voting_delay)
            .ok_or(GovernanceError::Overflow)?;
        let vote_end = vote_start
            .checked_add(self.config.voting_period)
            .ok_or(GovernanceError::Overflow)?;
        // Supply is fixed at deployment, so the current total is also the
        // total at the end of the snapshot block.
        let quorum = self.quorum_of(ledger.total_supply())?;

        let proposal = Proposal {
            id,
            proposer,
            action: action.clone(),
            description: description.clone(),
            description_hash,
            created_at: ctx.block,
            vote_start,
            vote_end,
            quorum,
            tally: Tally::default(),
            voters: BTreeMap::new(),
            phase: Phase::Open,
        };
        self.proposals.insert(id, proposal);
        self.order.push(id);
        self.events.push(GovernanceEvent::ProposalCreated {
            id,
            proposer,
            action,
            description,
            vote_start,
            vote_end,
        });

        tracing::info!(proposal = %id, %proposer, vote_start, vote_end, "proposal created");
        Ok(id)
    }

    pub fn cast_vote(
        &mut self,
        ctx: &ChainContext,
        ledger: &VotingLedger,
        id: ProposalId,
        voter: Address,
        support: u8,
    ) -> Result<TokenAmount, GovernanceError> {
        self.record_vote(ctx, ledger, id, voter, support, None)
    }

    pub fn cast_vote_with_reason(
        &mut self,
        ctx: &ChainContext,
        ledger: &VotingLedger,
        id: ProposalId,
        voter: Address,
        support: u8,
        reason: impl Into<String>,
    ) -> Result<TokenAmount, GovernanceError> {
        self.record_vote(ctx, ledger, id, voter, support, Some(reason.into()))
    }

    /// Schedule a succeeded proposal's action on the gate.
    pub fn queue(
        &mut self,
        ctx: &ChainContext,
        gate: &mut DelayGate,
        id: ProposalId,
    ) -> Result<OperationId, GovernanceError> {
        self.check_transition(ctx, gate, id, ProposalState::Queued)?;

        let proposal = self.get(&id)?;
        let delay = gate.min_delay();
        let operation = gate.schedule(
            ctx,
            self.address,
            &proposal.action,
            proposal.description_hash,
            delay,
        )?;
        let ready_at = gate
            .operation(&operation)
            .map(|op| op.ready_at)
            .ok_or(TimelockError::UnknownOperation(operation))?;

        self.get_mut(&id)?.phase = Phase::Queued {
            operation,
            ready_at,
        };
        self.events.push(GovernanceEvent::ProposalQueued {
            id,
            operation,
            ready_at,
        });
        tracing::info!(proposal = %id, %operation, %ready_at, "proposal queued");
        Ok(operation)
    }

    /// Execute a queued proposal through the gate.
    pub fn execute(
        &mut self,
        ctx: &ChainContext,
        gate: &mut DelayGate,
        id: ProposalId,
        handler: &mut dyn ActionHandler,
    ) -> Result<(), GovernanceError> {
        self.check_transition(ctx, gate, id, ProposalState::Executed)?;

        let proposal = self.get(&id)?;
        let result = gate.execute(
            ctx,
            self.address,
            &proposal.action,
            proposal.description_hash,
            handler,
        );
        match result {
            Ok(_) => {}
            Err(TimelockError::NotReady { ready_at, .. }) => {
                return Err(GovernanceError::TimelockNotReady {
                    ready_at,
                    now: ctx.timestamp,
                });
            }
            Err(e) => return Err(e.into()),
        }

        self.get_mut(&id)?.phase = Phase::Executed;
        self.events.push(GovernanceEvent::ProposalExecuted { id });
        tracing::info!(proposal = %id, "proposal executed");
        Ok(())
    }

    /// Withdraw a proposal before voting ends. Allowed for its proposer and
    /// for any gate Admin.
    pub fn cancel(
        &mut self,
        ctx: &ChainContext,
        gate: &DelayGate,
        id: ProposalId,
        caller: Address,
    ) -> Result<(), GovernanceError> {
        let proposal = self.get(&id)?;
        if caller != proposal.proposer && !gate.has_role(Role::Admin, &caller) {
            return Err(GovernanceError::Unauthorized(caller));
        }
        self.check_transition(ctx, gate, id, ProposalState::Canceled)?;

        self.get_mut(&id)?.phase = Phase::Canceled;
        self.events.push(GovernanceEvent::ProposalCanceled { id });
        tracing::info!(proposal = %id, %caller, "proposal canceled");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Current lifecycle state, derived from the stored phase, the chain
    /// position and the gate.
    pub fn state(
        &self,
        ctx: &ChainContext,
        gate: &DelayGate,
        id: ProposalId,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.get(&id)?;
        self.derive_state(proposal, ctx, Some(gate))
    }

    pub fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// All proposals in creation order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.order.iter().filter_map(|id| self.proposal(id))
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.proposal(id).is_some_and(|p| p.has_voted(voter))
    }

    pub fn proposal_votes(&self, id: &ProposalId) -> Option<Tally> {
        self.proposal(id).map(|p| p.tally)
    }

    pub fn proposal_snapshot(&self, id: &ProposalId) -> Option<BlockNumber> {
        self.proposal(id).map(|p| p.created_at)
    }

    pub fn proposal_deadline(&self, id: &ProposalId) -> Option<BlockNumber> {
        self.proposal(id).map(|p| p.vote_end)
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn get(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposal(id).ok_or(GovernanceError::UnknownProposal(*id))
    }

    fn get_mut(&mut self, id: &ProposalId) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(id)
            .ok_or(GovernanceError::UnknownProposal(*id))
    }

    /// Confirm the proposal may move from its current state to `next`,
    /// returning the current state. A queued proposal is canceled on the
    /// gate, never through the governor.
    fn check_transition(
        &self,
        ctx: &ChainContext,
        gate: &DelayGate,
        id: ProposalId,
        next: ProposalState,
    ) -> Result<ProposalState, GovernanceError> {
        let current = self.state(ctx, gate, id)?;
        let via_gate_only = current == ProposalState::Queued && next == ProposalState::Canceled;
        if current.can_transition_to(next) && !via_gate_only {
            return Ok(current);
        }
        tracing::debug!(proposal = %id, from = %current, to = %next, "illegal transition");
        Err(match (current, next) {
            (ProposalState::Pending | ProposalState::Active, ProposalState::Queued) => {
                GovernanceError::VotingNotEnded {
                    vote_end: self.get(&id)?.vote_end,
                    current: ctx.block,
                }
            }
            (state, ProposalState::Queued) => GovernanceError::NotSucceeded { state },
            (ProposalState::Expired, ProposalState::Executed) => {
                GovernanceError::ProposalExpired(id)
            }
            (state, ProposalState::Executed) => GovernanceError::NotQueued { state },
            (state, _) => GovernanceError::NotCancelable { state },
        })
    }

    fn quorum_of(&self, supply: TokenAmount) -> Result<TokenAmount, GovernanceError> {
        supply
            .checked_mul_div(u128::from(self.config.quorum_percentage), 100)
            .ok_or(GovernanceError::Overflow)
    }

    fn record_vote(
        &mut self,
        ctx: &ChainContext,
        ledger: &VotingLedger,
        id: ProposalId,
        voter: Address,
        support: u8,
        reason: Option<String>,
    ) -> Result<TokenAmount, GovernanceError> {
        let support = VoteType::try_from(support)?;
        let proposal = self.get(&id)?;
        match proposal.voting_state(ctx.block) {
            Some(ProposalState::Active) => {}
            _ => {
                let state = self.derive_state(proposal, ctx, None)?;
                return Err(GovernanceError::InactiveProposal { state });
            }
        }
        if proposal.has_voted(&voter) {
            return Err(GovernanceError::AlreadyVoted { voter });
        }

        let weight = ledger.get_past_votes(&voter, proposal.created_at, ctx)?;
        let proposal = self.get_mut(&id)?;
        proposal.tally.add(support, weight)?;
        proposal.voters.insert(
            voter,
            VoteReceipt {
                support,
                weight,
                reason: reason.clone(),
            },
        );
        self.events.push(GovernanceEvent::VoteCast {
            id,
            voter,
            support,
            weight,
            reason,
        });

        tracing::debug!(proposal = %id, %voter, ?support, %weight, "vote cast");
        Ok(weight)
    }

    /// Derive a proposal's state. Without a gate, cancellation on the gate
    /// cannot be seen.
    fn derive_state(
        &self,
        proposal: &Proposal,
        ctx: &ChainContext,
        gate: Option<&DelayGate>,
    ) -> Result<ProposalState, GovernanceError> {
        let state = match proposal.phase {
            Phase::Canceled => ProposalState::Canceled,
            Phase::Executed => ProposalState::Executed,
            Phase::Queued {
                operation,
                ready_at,
            } => {
                let expires_at = ready_at
                    .checked_add_secs(self.config.grace_period_secs)
                    .ok_or(GovernanceError::Overflow)?;
                match gate.map(|g| g.operation_state(&operation)) {
                    Some(OperationState::Canceled) => ProposalState::Canceled,
                    Some(OperationState::Executed) => ProposalState::Executed,
                    _ if ctx.timestamp > expires_at => ProposalState::Expired,
                    _ => ProposalState::Queued,
                }
            }
            Phase::Open => match proposal.voting_state(ctx.block) {
                Some(state) => state,
                None if proposal.passed()? => ProposalState::Succeeded,
                None => ProposalState::Defeated,
            },
        };
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_ledger::LedgerConfig;
    use civic_timelock::{GateConfig, NoopHandler};
    use civic_types::Timestamp;

    const DELAY: u64 = 172_800;

    struct Fixture {
        ledger: VotingLedger,
        gate: DelayGate,
        governor: GovernanceController,
    }

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    fn at(block: BlockNumber) -> ChainContext {
        ChainContext::new(block, Timestamp::new(block * 12))
    }

    fn gt(n: u64) -> TokenAmount {
        TokenAmount::whole(n)
    }

    fn fixture() -> Fixture {
        let owner = addr("owner");
        let mut ledger = VotingLedger::deploy(&LedgerConfig::default(), owner, &at(0)).unwrap();
        ledger.transfer(&at(0), owner, addr("voter1"), gt(150_000)).unwrap();
        ledger.transfer(&at(0), owner, addr("voter2"), gt(100_000)).unwrap();
        let gate_config = GateConfig {
            proposers: vec![addr("governor")],
            executors: vec![Address::ZERO],
            ..GateConfig::default()
        };
        let gate = DelayGate::new(&gate_config, owner);
        let config = GovernorConfig {
            voting_period: 10,
            ..GovernorConfig::default()
        };
        let governor = GovernanceController::new(config, addr("governor")).unwrap();
        Fixture {
            ledger,
            gate,
            governor,
        }
    }

    fn grant() -> Action {
        Action::transfer(addr("grantee"), gt(10))
    }

    impl Fixture {
        fn propose(&mut self, block: BlockNumber) -> ProposalId {
            self.governor
                .propose(&at(block), &self.ledger, addr("voter1"), grant(), "fund grantee")
                .unwrap()
        }

        fn state(&self, ctx: &ChainContext, id: ProposalId) -> ProposalState {
            self.governor.state(ctx, &self.gate, id).unwrap()
        }
    }

    #[test]
    fn voting_window_follows_delay_and_period() {
        let mut f = fixture();
        let id = f.propose(5);
        assert_eq!(f.governor.proposal_snapshot(&id), Some(5));
        assert_eq!(f.governor.proposal_deadline(&id), Some(16));
        assert_eq!(f.state(&at(5), id), ProposalState::Pending);
        assert_eq!(f.state(&at(6), id), ProposalState::Active);
        assert_eq!(f.state(&at(16), id), ProposalState::Active);
        assert_eq!(f.state(&at(17), id), ProposalState::Defeated);
    }

    #[test]
    fn votes_use_snapshot_weight() {
        let mut f = fixture();
        let id = f.propose(5);
        f.ledger.transfer(&at(6), addr("voter1"), addr("voter3"), gt(150_000)).unwrap();

        let weight = f
            .governor
            .cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1)
            .unwrap();
        assert_eq!(weight, gt(150_000));
        let late = f
            .governor
            .cast_vote(&at(7), &f.ledger, id, addr("voter3"), 1)
            .unwrap();
        assert_eq!(late, TokenAmount::ZERO);
        assert!(f.governor.has_voted(&id, &addr("voter3")));
        assert_eq!(f.governor.proposal_votes(&id).unwrap().for_votes, gt(150_000));
    }

    #[test]
    fn vote_guards() {
        let mut f = fixture();
        let id = f.propose(5);
        let err = f
            .governor
            .cast_vote(&at(5), &f.ledger, id, addr("voter1"), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InactiveProposal { state: ProposalState::Pending }
        ));

        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1).unwrap();
        let err = f
            .governor
            .cast_vote(&at(7), &f.ledger, id, addr("voter1"), 0)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyVoted { .. }));

        let err = f
            .governor
            .cast_vote(&at(7), &f.ledger, id, addr("voter2"), 7)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidVoteType(7)));

        let err = f
            .governor
            .cast_vote(&at(17), &f.ledger, id, addr("voter2"), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InactiveProposal { state: ProposalState::Defeated }
        ));
    }

    #[test]
    fn quorum_counts_all_participation() {
        let mut f = fixture();
        let id = f.propose(5);
        assert_eq!(f.governor.quorum(&at(6), &f.ledger, 5).unwrap(), gt(200_000));

        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1).unwrap();
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter2"), 2).unwrap();
        assert_eq!(f.state(&at(17), id), ProposalState::Succeeded);
    }

    #[test]
    fn below_quorum_is_defeated() {
        let mut f = fixture();
        let id = f.propose(5);
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter2"), 1).unwrap();
        assert_eq!(f.state(&at(17), id), ProposalState::Defeated);

        let err = f.governor.queue(&at(17), &mut f.gate, id).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::NotSucceeded { state: ProposalState::Defeated }
        ));
    }

    #[test]
    fn full_lifecycle_through_gate() {
        let mut f = fixture();
        let id = f.propose(5);
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1).unwrap();
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter2"), 1).unwrap();

        let err = f.governor.queue(&at(10), &mut f.gate, id).unwrap_err();
        assert!(matches!(err, GovernanceError::VotingNotEnded { vote_end: 16, current: 10 }));

        let queued_at = at(17);
        let op = f.governor.queue(&queued_at, &mut f.gate, id).unwrap();
        assert!(f.gate.is_operation_pending(&op));
        assert_eq!(f.state(&queued_at, id), ProposalState::Queued);

        let early = ChainContext::new(18, Timestamp::new(queued_at.timestamp.as_secs() + 60));
        let err = f
            .governor
            .execute(&early, &mut f.gate, id, &mut NoopHandler)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::TimelockNotReady { .. }));
        assert_eq!(err.kind(), civic_types::ErrorKind::Timing);

        let ready = ChainContext::new(19, Timestamp::new(queued_at.timestamp.as_secs() + DELAY));
        f.governor
            .execute(&ready, &mut f.gate, id, &mut NoopHandler)
            .unwrap();
        assert_eq!(f.state(&ready, id), ProposalState::Executed);
        assert!(f.gate.is_operation_done(&op));

        let err = f
            .governor
            .execute(&ready, &mut f.gate, id, &mut NoopHandler)
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::NotQueued { state: ProposalState::Executed }
        ));
    }

    #[test]
    fn queued_proposal_expires_after_grace() {
        let mut f = fixture();
        let id = f.propose(5);
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1).unwrap();
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter2"), 1).unwrap();
        let queued_at = at(17);
        f.governor.queue(&queued_at, &mut f.gate, id).unwrap();

        let grace = f.governor.config().grace_period_secs;
        let late = ChainContext::new(
            20,
            Timestamp::new(queued_at.timestamp.as_secs() + DELAY + grace + 1),
        );
        assert_eq!(f.state(&late, id), ProposalState::Expired);
        let err = f
            .governor
            .execute(&late, &mut f.gate, id, &mut NoopHandler)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::ProposalExpired(_)));
    }

    #[test]
    fn gate_cancellation_shows_through() {
        let mut f = fixture();
        let id = f.propose(5);
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1).unwrap();
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter2"), 1).unwrap();
        let op = f.governor.queue(&at(17), &mut f.gate, id).unwrap();

        f.gate.cancel(addr("owner"), op).unwrap();
        assert_eq!(f.state(&at(18), id), ProposalState::Canceled);
    }

    #[test]
    fn mutations_refuse_illegal_edges() {
        let mut f = fixture();
        let id = f.propose(5);

        assert!(!ProposalState::Pending.can_transition_to(ProposalState::Executed));
        let err = f
            .governor
            .execute(&at(5), &mut f.gate, id, &mut NoopHandler)
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::NotQueued { state: ProposalState::Pending }
        ));
        let err = f.governor.queue(&at(5), &mut f.gate, id).unwrap_err();
        assert!(matches!(err, GovernanceError::VotingNotEnded { .. }));

        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter1"), 1).unwrap();
        f.governor.cast_vote(&at(6), &f.ledger, id, addr("voter2"), 1).unwrap();
        f.governor.queue(&at(17), &mut f.gate, id).unwrap();

        let err = f.governor.queue(&at(18), &mut f.gate, id).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::NotSucceeded { state: ProposalState::Queued }
        ));
        // Legal in the lifecycle, but only the gate Admin can take it.
        assert!(ProposalState::Queued.can_transition_to(ProposalState::Canceled));
        let err = f
            .governor
            .cancel(&at(18), &f.gate, id, addr("voter1"))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::NotCancelable { state: ProposalState::Queued }
        ));
        assert_eq!(f.state(&at(18), id), ProposalState::Queued);
        assert!(f.governor.take_events().iter().all(|e| !matches!(
            e,
            GovernanceEvent::ProposalCanceled { .. }
        )));
    }

    #[test]
    fn cancel_rules() {
        let mut f = fixture();
        let id = f.propose(5);
        let err = f
            .governor
            .cancel(&at(5), &f.gate, id, addr("voter2"))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Unauthorized(_)));
        assert_eq!(err.kind(), civic_types::ErrorKind::Authorization);

        f.governor.cancel(&at(6), &f.gate, id, addr("voter1")).unwrap();
        assert_eq!(f.state(&at(6), id), ProposalState::Canceled);
        let err = f
            .governor
            .cast_vote(&at(7), &f.ledger, id, addr("voter2"), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InactiveProposal { state: ProposalState::Canceled }
        ));

        let other = f
            .governor
            .propose(&at(8), &f.ledger, addr("voter2"), grant(), "another grant")
            .unwrap();
        let err = f
            .governor
            .cancel(&at(30), &f.gate, other, addr("owner"))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::NotCancelable { state: ProposalState::Defeated }
        ));
        f.governor.cancel(&at(9), &f.gate, other, addr("owner")).unwrap();
    }

    #[test]
    fn propose_guards() {
        let mut f = fixture();
        let err = f
            .governor
            .propose(&at(5), &f.ledger, addr("voter1"), grant(), "  ")
            .unwrap_err();
        assert!(matches!(err, GovernanceError::EmptyDescription));

        f.propose(5);
        let err = f
            .governor
            .propose(&at(6), &f.ledger, addr("voter2"), grant(), "fund grantee")
            .unwrap_err();
        assert!(matches!(err, GovernanceError::DuplicateProposal(_)));
        assert_eq!(f.governor.proposals().count(), 1);
    }

    #[test]
    fn proposal_threshold_reads_previous_block() {
        let mut f = fixture();
        f.governor = GovernanceController::new(
            GovernorConfig {
                proposal_threshold: gt(120_000),
                ..GovernorConfig::default()
            },
            addr("governor"),
        )
        .unwrap();
        let err = f
            .governor
            .propose(&at(5), &f.ledger, addr("voter2"), grant(), "too small")
            .unwrap_err();
        assert!(matches!(err, GovernanceError::BelowProposalThreshold { .. }));
        f.governor
            .propose(&at(5), &f.ledger, addr("voter1"), grant(), "big enough")
            .unwrap();
    }

    #[test]
    fn events_are_emitted_in_order() {
        let mut f = fixture();
        let id = f.propose(5);
        f.governor
            .cast_vote_with_reason(&at(6), &f.ledger, id, addr("voter1"), 1, "good use of funds")
            .unwrap();
        let events = f.governor.take_events();
        assert!(matches!(events[0], GovernanceEvent::ProposalCreated { .. }));
        assert!(matches!(
            &events[1],
            GovernanceEvent::VoteCast { reason: Some(r), support: VoteType::For, .. } if r == "good use of funds"
        ));
        assert!(f.governor.take_events().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GovernorConfig {
            voting_delay: 0,
            ..GovernorConfig::default()
        };
        assert!(GovernanceController::new(config, addr("governor")).is_err());
    }
}
