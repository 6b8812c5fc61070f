//! The delay gate.

use std::collections::BTreeMap;

use civic_types::{Action, Address, ChainContext, OperationId};
use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::error::TimelockError;
use crate::event::TimelockEvent;
use crate::handler::ActionHandler;
use crate::operation::{hash_operation, OperationState, QueuedAction, Salt};
use crate::role::{Role, RoleBindings};

/// State captured before a dispatch so a failed one can be undone.
struct Rollback {
    roles: RoleBindings,
    operations: BTreeMap<OperationId, QueuedAction>,
    min_delay_secs: u64,
    events_len: usize,
}

/// Holds approved actions until their delay has elapsed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DelayGate {
    roles: RoleBindings,
    operations: BTreeMap<OperationId, QueuedAction>,
    min_delay_secs: u64,
    #[serde(skip)]
    events: Vec<TimelockEvent>,
}

impl DelayGate {
    /// Deploy a gate. `deployer` becomes Admin unless the config names one.
    pub fn new(config: &GateConfig, deployer: Address) -> Self {
        let admin = config.admin.unwrap_or(deployer);
        let mut gate = Self {
            roles: RoleBindings::new(),
            operations: BTreeMap::new(),
            min_delay_secs: config.min_delay_secs,
            events: Vec::new(),
        };
        gate.bind(Role::Admin, admin, deployer);
        for proposer in &config.proposers {
            gate.bind(Role::Proposer, *proposer, deployer);
        }
        for executor in &config.executors {
            gate.bind(Role::Executor, *executor, deployer);
        }
        tracing::debug!(
            %admin,
            min_delay_secs = gate.min_delay_secs,
            "delay gate deployed"
        );
        gate
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// `getMinDelay`.
    pub fn min_delay(&self) -> u64 {
        self.min_delay_secs
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    pub fn roles(&self) -> &RoleBindings {
        &self.roles
    }

    pub fn operation(&self, id: &OperationId) -> Option<&QueuedAction> {
        self.operations.get(id)
    }

    pub fn operation_state(&self, id: &OperationId) -> OperationState {
        self.operations
            .get(id)
            .map_or(OperationState::Unscheduled, |op| op.state)
    }

    pub fn is_operation_pending(&self, id: &OperationId) -> bool {
        self.operation_state(id) == OperationState::Scheduled
    }

    pub fn is_operation_ready(&self, id: &OperationId, ctx: &ChainContext) -> bool {
        self.operations
            .get(id)
            .is_some_and(|op| op.is_ready(ctx.timestamp))
    }

    pub fn is_operation_done(&self, id: &OperationId) -> bool {
        self.operation_state(id) == OperationState::Executed
    }

    pub fn operations(&self) -> impl Iterator<Item = &QueuedAction> {
        self.operations.values()
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Queue `action` to become executable `delay_secs` from now.
    pub fn schedule(
        &mut self,
        ctx: &ChainContext,
        caller: Address,
        action: &Action,
        salt: Salt,
        delay_secs: u64,
    ) -> Result<OperationId, TimelockError> {
        self.require(Role::Proposer, &caller)?;
        if delay_secs < self.min_delay_secs {
            return Err(TimelockError::DelayTooShort {
                requested: delay_secs,
                minimum: self.min_delay_secs,
            });
        }
        let id = hash_operation(action, &salt);
        let state = self.operation_state(&id).transition(OperationState::Scheduled, id)?;
        let ready_at = ctx
            .timestamp
            .checked_add_secs(delay_secs)
            .ok_or(TimelockError::Overflow)?;

        self.operations.insert(
            id,
            QueuedAction {
                id,
                action: action.clone(),
                salt,
                scheduled_at: ctx.timestamp,
                ready_at,
                state,
            },
        );
        self.events.push(TimelockEvent::CallScheduled {
            id,
            action: action.clone(),
            ready_at,
        });
        tracing::info!(%id, %caller, %ready_at, "operation scheduled");
        Ok(id)
    }

    /// Execute a ready operation through `handler`.
    ///
    /// The operation is marked executed before dispatch, so a nested
    /// `execute` of the same operation fails with `AlreadyExecuted`. If the
    /// handler fails, the gate is restored to its state before the call,
    /// except that operations executed by nested calls stay executed: their
    /// side effects have already happened.
    pub fn execute(
        &mut self,
        ctx: &ChainContext,
        caller: Address,
        action: &Action,
        salt: Salt,
        handler: &mut dyn ActionHandler,
    ) -> Result<OperationId, TimelockError> {
        self.require(Role::Executor, &caller)?;
        let id = hash_operation(action, &salt);
        let op = self
            .operations
            .get(&id)
            .ok_or(TimelockError::UnknownOperation(id))?;
        let next = op.state.transition(OperationState::Executed, id)?;
        if !op.ready_at.has_arrived(ctx.timestamp) {
            return Err(TimelockError::NotReady {
                id,
                ready_at: op.ready_at,
            });
        }

        let rollback = self.checkpoint();
        if let Some(op) = self.operations.get_mut(&id) {
            op.state = next;
        }

        if let Err(e) = handler.dispatch(self, ctx, action) {
            self.restore(rollback, id);
            tracing::warn!(%id, error = %e, "dispatch failed, operation left scheduled");
            return Err(TimelockError::DispatchFailed {
                id,
                reason: e.to_string(),
            });
        }

        self.events.push(TimelockEvent::CallExecuted {
            id,
            action: action.clone(),
        });
        tracing::info!(%id, %caller, "operation executed");
        Ok(id)
    }

    /// Cancel a scheduled operation. Canceled operations stay canceled.
    pub fn cancel(&mut self, caller: Address, id: OperationId) -> Result<(), TimelockError> {
        self.require(Role::Admin, &caller)?;
        let op = self
            .operations
            .get_mut(&id)
            .ok_or(TimelockError::UnknownOperation(id))?;
        op.state = op.state.transition(OperationState::Canceled, id)?;
        self.events.push(TimelockEvent::Cancelled { id });
        tracing::info!(%id, %caller, "operation canceled");
        Ok(())
    }

    // ── Administration ───────────────────────────────────────────────────

    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        self.require(Role::Admin, &caller)?;
        self.bind(role, account, caller);
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), TimelockError> {
        self.require(Role::Admin, &caller)?;
        if role == Role::Admin && caller == account {
            return Err(TimelockError::SelfRevocation);
        }
        self.unbind(role, account, caller);
        Ok(())
    }

    /// Give up one of `caller`'s own roles. This is the only way an Admin
    /// can drop its own Admin role.
    pub fn renounce_role(&mut self, caller: Address, role: Role) -> Result<(), TimelockError> {
        if !self.roles.revoke(role, &caller) {
            return Err(TimelockError::Unauthorized(role));
        }
        self.events.push(TimelockEvent::RoleRevoked {
            role,
            account: caller,
            sender: caller,
        });
        tracing::info!(%caller, %role, "role renounced");
        Ok(())
    }

    /// Hand the Admin role from `caller` to `new_admin`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), TimelockError> {
        self.require(Role::Admin, &caller)?;
        if new_admin.is_zero() {
            return Err(TimelockError::ZeroAdmin);
        }
        if new_admin == caller {
            return Ok(());
        }
        self.bind(Role::Admin, new_admin, caller);
        self.unbind(Role::Admin, caller, caller);
        self.events.push(TimelockEvent::OwnershipTransferred {
            previous: caller,
            new: new_admin,
        });
        Ok(())
    }

    /// Change the minimum delay. Already scheduled operations keep their
    /// ready time.
    pub fn update_min_delay(&mut self, caller: Address, secs: u64) -> Result<(), TimelockError> {
        self.require(Role::Admin, &caller)?;
        let old_secs = std::mem::replace(&mut self.min_delay_secs, secs);
        self.events.push(TimelockEvent::MinDelayChanged {
            old_secs,
            new_secs: secs,
        });
        tracing::info!(old_secs, new_secs = secs, "minimum delay changed");
        Ok(())
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<TimelockEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn require(&self, role: Role, caller: &Address) -> Result<(), TimelockError> {
        if self.roles.has_role(role, caller) {
            Ok(())
        } else {
            tracing::debug!(%caller, %role, "unauthorized gate call");
            Err(TimelockError::Unauthorized(role))
        }
    }

    fn bind(&mut self, role: Role, account: Address, sender: Address) {
        if self.roles.grant(role, account) {
            self.events.push(TimelockEvent::RoleGranted {
                role,
                account,
                sender,
            });
        }
    }

    fn unbind(&mut self, role: Role, account: Address, sender: Address) {
        if self.roles.revoke(role, &account) {
            self.events.push(TimelockEvent::RoleRevoked {
                role,
                account,
                sender,
            });
        }
    }

    fn checkpoint(&self) -> Rollback {
        Rollback {
            roles: self.roles.clone(),
            operations: self.operations.clone(),
            min_delay_secs: self.min_delay_secs,
            events_len: self.events.len(),
        }
    }

    /// Undo everything since `rollback` was taken, apart from operations a
    /// nested call ran to completion. `failed` is the operation whose
    /// dispatch failed and goes back to its previous state.
    fn restore(&mut self, rollback: Rollback, failed: OperationId) {
        let ran: Vec<QueuedAction> = self
            .operations
            .values()
            .filter(|op| op.id != failed && op.state == OperationState::Executed)
            .filter(|op| {
                rollback
                    .operations
                    .get(&op.id)
                    .map_or(true, |before| before.state != OperationState::Executed)
            })
            .cloned()
            .collect();
        let since = self.events.len().min(rollback.events_len);
        let nested: Vec<TimelockEvent> = self
            .events
            .split_off(since)
            .into_iter()
            .filter(|e| {
                matches!(e, TimelockEvent::CallExecuted { id, .. } if ran.iter().any(|op| op.id == *id))
            })
            .collect();

        self.roles = rollback.roles;
        self.operations = rollback.operations;
        self.min_delay_secs = rollback.min_delay_secs;
        for op in ran {
            tracing::debug!(id = %op.id, "keeping nested execution");
            self.operations.insert(op.id, op);
        }
        self.events.extend(nested);
    }
}
