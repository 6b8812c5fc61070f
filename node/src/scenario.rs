//! Scripted replays against a deterministic chain.
//!
//! A scenario is a JSON list of steps. Accounts and proposals are referred to
//! by label: `deployer`, `governor` and `timelock` (alias `treasury`) resolve
//! to the configured addresses, `0x…` strings parse as hex, and anything
//! else is hashed into an address with [`Address::from_label`].

use std::collections::{BTreeMap, HashMap};

use civic_governance::ProposalState;
use civic_nullables::NullChain;
use civic_timelock::Role;
use civic_types::{Action, Address, BlockNumber, ProposalId, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::config::DeploymentConfig;
use crate::system::GovernanceSystem;
use crate::NodeError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(s: &str) -> Result<Self, NodeError> {
        serde_json::from_str(s).map_err(|e| NodeError::Scenario(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStep {
    #[serde(flatten)]
    pub step: Step,
    /// The step must fail with an error containing this text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Transfer {
        from: String,
        to: String,
        amount: TokenAmount,
    },
    Delegate {
        holder: String,
        to: String,
    },
    Propose {
        label: String,
        proposer: String,
        target: String,
        #[serde(default)]
        value: TokenAmount,
        /// Hex-encoded call data.
        #[serde(default)]
        calldata: String,
        description: String,
    },
    Vote {
        proposal: String,
        voter: String,
        support: u8,
        #[serde(default)]
        reason: Option<String>,
    },
    Mine {
        blocks: u64,
    },
    AdvanceTime {
        secs: u64,
    },
    Queue {
        proposal: String,
    },
    Execute {
        proposal: String,
    },
    Cancel {
        proposal: String,
        caller: String,
    },
    GrantRole {
        caller: String,
        role: Role,
        account: String,
    },
    RevokeRole {
        caller: String,
        role: Role,
        account: String,
    },
    TransferOwnership {
        caller: String,
        new_admin: String,
    },
    ExpectState {
        proposal: String,
        state: ProposalState,
    },
    ExpectVotes {
        account: String,
        votes: TokenAmount,
    },
    ExpectBalance {
        account: String,
        balance: TokenAmount,
    },
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Delegate { .. } => "delegate",
            Self::Propose { .. } => "propose",
            Self::Vote { .. } => "vote",
            Self::Mine { .. } => "mine",
            Self::AdvanceTime { .. } => "advance_time",
            Self::Queue { .. } => "queue",
            Self::Execute { .. } => "execute",
            Self::Cancel { .. } => "cancel",
            Self::GrantRole { .. } => "grant_role",
            Self::RevokeRole { .. } => "revoke_role",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::ExpectState { .. } => "expect_state",
            Self::ExpectVotes { .. } => "expect_votes",
            Self::ExpectBalance { .. } => "expect_balance",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: String,
    pub block: BlockNumber,
    pub ok: bool,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepOutcome>,
    pub final_block: BlockNumber,
    pub final_timestamp: Timestamp,
    pub events_emitted: u64,
    pub balances: BTreeMap<String, TokenAmount>,
    pub votes: BTreeMap<String, TokenAmount>,
}

impl ScenarioReport {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }

    pub fn passed(&self) -> bool {
        self.failures() == 0
    }
}

/// Replays scenarios against a [`GovernanceSystem`] on a [`NullChain`].
pub struct ScenarioRunner {
    system: GovernanceSystem,
    chain: NullChain,
    proposals: HashMap<String, ProposalId>,
    names: HashMap<Address, String>,
}

impl ScenarioRunner {
    /// Deploy at block 1 and mine one block so the genesis checkpoints are
    /// already in the past when the first step runs.
    pub fn new(config: DeploymentConfig) -> Result<Self, NodeError> {
        let mut chain = NullChain::new(1, 0, config.block_time_secs);
        let mut names = HashMap::new();
        names.insert(config.deployer, "deployer".to_string());
        names.insert(config.governor_address, "governor".to_string());
        names.insert(config.timelock_address, "timelock".to_string());

        let system = GovernanceSystem::deploy(config, &chain.context())?;
        chain.mine(1);
        Ok(Self {
            system,
            chain,
            proposals: HashMap::new(),
            names,
        })
    }

    pub fn system(&self) -> &GovernanceSystem {
        &self.system
    }

    pub fn chain(&self) -> &NullChain {
        &self.chain
    }

    /// The id a `propose` step registered under `label`.
    pub fn proposal_id(&self, label: &str) -> Option<ProposalId> {
        self.proposals.get(label).copied()
    }

    /// Run every step, recording each outcome. Later steps run even after a
    /// failure.
    pub fn run(&mut self, scenario: &Scenario) -> ScenarioReport {
        tracing::info!(scenario = %scenario.name, steps = scenario.steps.len(), "replaying scenario");
        let mut outcomes = Vec::with_capacity(scenario.steps.len());

        for (index, step) in scenario.steps.iter().enumerate() {
            let block = self.chain.block();
            let result = self.apply(&step.step);
            let (ok, detail) = match (result, &step.expect_error) {
                (Ok(detail), None) => (true, detail),
                (Ok(detail), Some(expected)) => {
                    (false, format!("expected error containing '{expected}', got success: {detail}"))
                }
                (Err(e), Some(expected)) if e.to_string().contains(expected.as_str()) => {
                    (true, format!("failed as expected: {e}"))
                }
                (Err(e), _) => (false, e.to_string()),
            };
            if !ok {
                tracing::warn!(index, op = step.step.op(), %detail, "scenario step failed");
            }
            outcomes.push(StepOutcome {
                index,
                op: step.step.op().to_string(),
                block,
                ok,
                detail,
            });
        }

        self.report(&scenario.name, outcomes)
    }

    fn report(&self, name: &str, steps: Vec<StepOutcome>) -> ScenarioReport {
        let ledger = self.system.ledger();
        let balances = ledger
            .holders()
            .map(|(a, b)| (self.name_of(&a), b))
            .collect();
        let votes = ledger
            .voting_powers()
            .map(|(a, v)| (self.name_of(&a), v))
            .collect();
        ScenarioReport {
            name: name.to_string(),
            steps,
            final_block: self.chain.block(),
            final_timestamp: self.chain.now(),
            events_emitted: self.system.events_emitted(),
            balances,
            votes,
        }
    }

    fn name_of(&self, address: &Address) -> String {
        self.names
            .get(address)
            .cloned()
            .unwrap_or_else(|| address.to_string())
    }

    fn resolve(&mut self, label: &str) -> Result<Address, NodeError> {
        let config = self.system.config();
        let (deployer, governor, timelock) = (
            config.deployer,
            config.governor_address,
            config.timelock_address,
        );
        let address = match label {
            "deployer" => deployer,
            "governor" => governor,
            "timelock" | "treasury" => timelock,
            hex if hex.starts_with("0x") => hex
                .parse()
                .map_err(|e| NodeError::Scenario(format!("bad address '{hex}': {e}")))?,
            other => {
                let address = Address::from_label(other);
                self.names.entry(address).or_insert_with(|| other.to_string());
                address
            }
        };
        Ok(address)
    }

    fn proposal(&self, label: &str) -> Result<ProposalId, NodeError> {
        self.proposal_id(label)
            .ok_or_else(|| NodeError::Scenario(format!("unknown proposal label '{label}'")))
    }

    fn apply(&mut self, step: &Step) -> Result<String, NodeError> {
        let ctx = self.chain.context();
        match step {
            Step::Transfer { from, to, amount } => {
                let (from, to) = (self.resolve(from)?, self.resolve(to)?);
                self.system.transfer(&ctx, from, to, *amount)?;
                Ok(format!("moved {amount}"))
            }
            Step::Delegate { holder, to } => {
                let (holder, to) = (self.resolve(holder)?, self.resolve(to)?);
                self.system.delegate(&ctx, holder, to)?;
                Ok(format!("delegate is now {}", self.name_of(&to)))
            }
            Step::Propose {
                label,
                proposer,
                target,
                value,
                calldata,
                description,
            } => {
                if self.proposals.contains_key(label) {
                    return Err(NodeError::Scenario(format!(
                        "proposal label '{label}' reused"
                    )));
                }
                let proposer = self.resolve(proposer)?;
                let target = self.resolve(target)?;
                let calldata = hex::decode(calldata.trim_start_matches("0x"))
                    .map_err(|e| NodeError::Scenario(format!("bad calldata: {e}")))?;
                let action = Action::new(target, *value, calldata);
                let id = self.system.propose(&ctx, proposer, action, description.clone())?;
                self.proposals.insert(label.clone(), id);
                Ok(format!("proposal {id}"))
            }
            Step::Vote {
                proposal,
                voter,
                support,
                reason,
            } => {
                let id = self.proposal(proposal)?;
                let voter = self.resolve(voter)?;
                let weight = self
                    .system
                    .cast_vote(&ctx, id, voter, *support, reason.clone())?;
                Ok(format!("weight {weight}"))
            }
            Step::Mine { blocks } => {
                let ctx = self.chain.mine(*blocks);
                Ok(format!("block {}", ctx.block))
            }
            Step::AdvanceTime { secs } => {
                let ctx = self.chain.advance_time(*secs);
                Ok(format!(
                    "advanced {}, now block {} at {}",
                    civic_utils::format_duration(*secs),
                    ctx.block,
                    ctx.timestamp
                ))
            }
            Step::Queue { proposal } => {
                let id = self.proposal(proposal)?;
                let operation = self.system.queue(&ctx, id)?;
                let ready_at = self
                    .system
                    .gate()
                    .operation(&operation)
                    .map(|op| op.ready_at)
                    .unwrap_or(ctx.timestamp);
                Ok(format!("operation {operation} ready at {ready_at}"))
            }
            Step::Execute { proposal } => {
                let id = self.proposal(proposal)?;
                self.system.execute(&ctx, id)?;
                Ok("executed".to_string())
            }
            Step::Cancel { proposal, caller } => {
                let id = self.proposal(proposal)?;
                let caller = self.resolve(caller)?;
                self.system.cancel(&ctx, id, caller)?;
                Ok("canceled".to_string())
            }
            Step::GrantRole {
                caller,
                role,
                account,
            } => {
                let (caller, account) = (self.resolve(caller)?, self.resolve(account)?);
                self.system.gate_mut().grant_role(caller, *role, account)?;
                self.system.flush_events();
                Ok(format!("{role} granted"))
            }
            Step::RevokeRole {
                caller,
                role,
                account,
            } => {
                let (caller, account) = (self.resolve(caller)?, self.resolve(account)?);
                self.system.gate_mut().revoke_role(caller, *role, account)?;
                self.system.flush_events();
                Ok(format!("{role} revoked"))
            }
            Step::TransferOwnership { caller, new_admin } => {
                let (caller, new_admin) = (self.resolve(caller)?, self.resolve(new_admin)?);
                self.system.gate_mut().transfer_ownership(caller, new_admin)?;
                self.system.flush_events();
                Ok(format!("Admin is now {}", self.name_of(&new_admin)))
            }
            Step::ExpectState { proposal, state } => {
                let id = self.proposal(proposal)?;
                let actual = self.system.state(&ctx, id)?;
                expect("state", *state, actual)
            }
            Step::ExpectVotes { account, votes } => {
                let account = self.resolve(account)?;
                expect("votes", *votes, self.system.ledger().get_votes(&account))
            }
            Step::ExpectBalance { account, balance } => {
                let account = self.resolve(account)?;
                expect("balance", *balance, self.system.ledger().balance_of(&account))
            }
        }
    }
}

fn expect<T: PartialEq + std::fmt::Display>(
    what: &str,
    expected: T,
    actual: T,
) -> Result<String, NodeError> {
    if expected == actual {
        Ok(format!("{what} is {actual}"))
    } else {
        Err(NodeError::Scenario(format!(
            "expected {what} {expected}, found {actual}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_parse_from_tagged_json() {
        let scenario = Scenario::from_json(
            r#"{
                "name": "parse",
                "steps": [
                    {"op": "transfer", "from": "deployer", "to": "voter1", "amount": "100"},
                    {"op": "mine", "blocks": 2},
                    {"op": "expect_state", "proposal": "p1", "state": "Defeated"},
                    {"op": "grant_role", "caller": "voter1", "role": "Admin", "account": "voter1",
                     "expect_error": "Only Admin authorized"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.steps.len(), 4);
        assert_eq!(scenario.steps[1].step, Step::Mine { blocks: 2 });
        assert_eq!(
            scenario.steps[3].expect_error.as_deref(),
            Some("Only Admin authorized")
        );
        assert_eq!(scenario.steps[2].step.op(), "expect_state");
    }

    #[test]
    fn unknown_op_is_rejected() {
        let err = Scenario::from_json(r#"{"name": "x", "steps": [{"op": "mint"}]}"#).unwrap_err();
        assert!(matches!(err, NodeError::Scenario(_)));
    }

    #[test]
    fn failed_expectation_is_reported_not_fatal() {
        let mut runner = ScenarioRunner::new(DeploymentConfig::default()).unwrap();
        let scenario = Scenario {
            name: "expectations".into(),
            description: String::new(),
            steps: vec![
                ScenarioStep {
                    step: Step::ExpectBalance {
                        account: "voter1".into(),
                        balance: TokenAmount::whole(1),
                    },
                    expect_error: None,
                },
                ScenarioStep {
                    step: Step::ExpectBalance {
                        account: "deployer".into(),
                        balance: TokenAmount::whole(1_000_000),
                    },
                    expect_error: None,
                },
            ],
        };
        let report = runner.run(&scenario);
        assert_eq!(report.failures(), 1);
        assert!(!report.steps[0].ok);
        assert!(report.steps[1].ok);
        assert_eq!(
            report.balances.get("deployer"),
            Some(&TokenAmount::whole(1_000_000))
        );
    }

    #[test]
    fn labels_resolve_to_configured_addresses() {
        let mut runner = ScenarioRunner::new(DeploymentConfig::default()).unwrap();
        let config = runner.system().config().clone();
        assert_eq!(runner.resolve("deployer").unwrap(), config.deployer);
        assert_eq!(runner.resolve("treasury").unwrap(), config.timelock_address);
        assert_eq!(
            runner.resolve("0x0000000000000000000000000000000000000000").unwrap(),
            Address::ZERO
        );
        assert!(runner.resolve("0x12").is_err());
        assert_eq!(runner.resolve("alice").unwrap(), Address::from_label("alice"));
    }
}
