//! The deployed governance system: ledger, gate and governor side by side.

use civic_governance::{GovernanceController, ProposalState};
use civic_ledger::VotingLedger;
use civic_timelock::DelayGate;
use civic_types::{Action, Address, ChainContext, OperationId, ProposalId, TokenAmount};

use crate::config::DeploymentConfig;
use crate::event_bus::{EventBus, SystemEvent};
use crate::treasury::TreasuryHandler;
use crate::NodeError;

/// Owns the three engines and routes calls between them.
///
/// No engine reaches into another's storage: every composite call borrows
/// the components it needs separately and passes them in.
pub struct GovernanceSystem {
    config: DeploymentConfig,
    ledger: VotingLedger,
    gate: DelayGate,
    governor: GovernanceController,
    bus: EventBus,
}

impl GovernanceSystem {
    /// Deploy all three engines at `ctx`.
    ///
    /// The governor is always a gate Proposer and, when executors are
    /// configured, one of them. When the config names no executors,
    /// execution is opened to anyone.
    pub fn deploy(config: DeploymentConfig, ctx: &ChainContext) -> Result<Self, NodeError> {
        config.validate()?;
        let ledger = VotingLedger::deploy(&config.ledger, config.deployer, ctx)?;

        let mut gate_config = config.timelock.clone();
        if !gate_config.proposers.contains(&config.governor_address) {
            gate_config.proposers.push(config.governor_address);
        }
        if gate_config.executors.is_empty() {
            gate_config.executors.push(Address::ZERO);
        } else if !gate_config.executors.contains(&config.governor_address) {
            gate_config.executors.push(config.governor_address);
        }
        let gate = DelayGate::new(&gate_config, config.deployer);
        let governor =
            GovernanceController::new(config.governor.clone(), config.governor_address)?;

        tracing::info!(
            deployer = %config.deployer,
            governor = %config.governor_address,
            timelock = %config.timelock_address,
            supply = %ledger.total_supply(),
            "governance system deployed"
        );

        let mut system = Self {
            config,
            ledger,
            gate,
            governor,
            bus: EventBus::new(),
        };
        system.flush_events();
        Ok(system)
    }

    // ── Components ───────────────────────────────────────────────────────

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn ledger(&self) -> &VotingLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut VotingLedger {
        &mut self.ledger
    }

    pub fn gate(&self) -> &DelayGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut DelayGate {
        &mut self.gate
    }

    pub fn governor(&self) -> &GovernanceController {
        &self.governor
    }

    pub fn governor_mut(&mut self) -> &mut GovernanceController {
        &mut self.governor
    }

    /// The gate's own account.
    pub fn treasury(&self) -> Address {
        self.config.timelock_address
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&SystemEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    pub fn events_emitted(&self) -> u64 {
        self.bus.emitted()
    }

    /// Drain every component's event buffer into the bus.
    pub fn flush_events(&mut self) {
        for event in self.ledger.take_events() {
            self.bus.emit(&SystemEvent::Ledger(event));
        }
        for event in self.gate.take_events() {
            self.bus.emit(&SystemEvent::Timelock(event));
        }
        for event in self.governor.take_events() {
            self.bus.emit(&SystemEvent::Governance(event));
        }
    }

    // ── Ledger ───────────────────────────────────────────────────────────

    pub fn transfer(
        &mut self,
        ctx: &ChainContext,
        from: Address,
        to: Address,
        amount: TokenAmount,
    ) -> Result<(), NodeError> {
        self.ledger.transfer(ctx, from, to, amount)?;
        self.flush_events();
        Ok(())
    }

    pub fn delegate(
        &mut self,
        ctx: &ChainContext,
        holder: Address,
        to: Address,
    ) -> Result<(), NodeError> {
        self.ledger.delegate(ctx, holder, to)?;
        self.flush_events();
        Ok(())
    }

    // ── Governance ───────────────────────────────────────────────────────

    pub fn propose(
        &mut self,
        ctx: &ChainContext,
        proposer: Address,
        action: Action,
        description: impl Into<String>,
    ) -> Result<ProposalId, NodeError> {
        let id = self
            .governor
            .propose(ctx, &self.ledger, proposer, action, description)?;
        self.flush_events();
        Ok(id)
    }

    pub fn cast_vote(
        &mut self,
        ctx: &ChainContext,
        id: ProposalId,
        voter: Address,
        support: u8,
        reason: Option<String>,
    ) -> Result<TokenAmount, NodeError> {
        let weight = match reason {
            Some(reason) => self
                .governor
                .cast_vote_with_reason(ctx, &self.ledger, id, voter, support, reason)?,
            None => self.governor.cast_vote(ctx, &self.ledger, id, voter, support)?,
        };
        self.flush_events();
        Ok(weight)
    }

    pub fn queue(&mut self, ctx: &ChainContext, id: ProposalId) -> Result<OperationId, NodeError> {
        let operation = self.governor.queue(ctx, &mut self.gate, id)?;
        self.flush_events();
        Ok(operation)
    }

    /// Execute a queued proposal, paying its value out of the treasury.
    pub fn execute(&mut self, ctx: &ChainContext, id: ProposalId) -> Result<(), NodeError> {
        let mut handler = TreasuryHandler::new(&mut self.ledger, self.config.timelock_address);
        self.governor.execute(ctx, &mut self.gate, id, &mut handler)?;
        self.flush_events();
        Ok(())
    }

    pub fn cancel(
        &mut self,
        ctx: &ChainContext,
        id: ProposalId,
        caller: Address,
    ) -> Result<(), NodeError> {
        self.governor.cancel(ctx, &self.gate, id, caller)?;
        self.flush_events();
        Ok(())
    }

    pub fn state(&self, ctx: &ChainContext, id: ProposalId) -> Result<ProposalState, NodeError> {
        Ok(self.governor.state(ctx, &self.gate, id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_timelock::Role;
    use civic_types::Timestamp;

    #[test]
    fn deploy_wires_governor_into_gate() {
        let system =
            GovernanceSystem::deploy(DeploymentConfig::default(), &ChainContext::default())
                .unwrap();
        let config = system.config();
        assert!(system.gate().has_role(Role::Proposer, &config.governor_address));
        assert!(system.gate().has_role(Role::Admin, &config.deployer));
        assert!(system
            .gate()
            .has_role(Role::Executor, &Address::from_label("anyone")));
        assert_eq!(
            system.ledger().balance_of(&config.deployer),
            TokenAmount::whole(1_000_000)
        );
        assert!(system.events_emitted() > 0);
    }

    #[test]
    fn configured_executors_are_not_opened() {
        let mut config = DeploymentConfig::default();
        let executor = Address::from_label("executor");
        config.timelock.executors = vec![executor];
        let system = GovernanceSystem::deploy(config, &ChainContext::default()).unwrap();
        assert!(system.gate().has_role(Role::Executor, &executor));
        assert!(system
            .gate()
            .has_role(Role::Executor, &system.config().governor_address));
        assert!(!system
            .gate()
            .has_role(Role::Executor, &Address::from_label("anyone")));
    }

    #[test]
    fn flush_drains_components() {
        let mut system =
            GovernanceSystem::deploy(DeploymentConfig::default(), &ChainContext::default())
                .unwrap();
        let before = system.events_emitted();
        let ctx = ChainContext::new(1, Timestamp::new(12));
        let deployer = system.config().deployer;
        system
            .transfer(&ctx, deployer, Address::from_label("voter1"), TokenAmount::whole(5))
            .unwrap();
        // transfer plus two vote-power changes
        assert_eq!(system.events_emitted(), before + 3);
        assert!(system.ledger_mut().take_events().is_empty());
    }
}
