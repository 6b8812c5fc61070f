//! The voting ledger: balances, delegation and voting-power checkpoints.

use std::collections::BTreeMap;

use civic_types::{Address, BlockNumber, ChainContext, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointHistory;
use crate::config::{DelegationMode, LedgerConfig};
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::snapshot::LedgerSnapshot;

/// A pending change to one delegate's voting power: `(delegate, previous, new)`.
type PowerUpdate = (Address, u128, u128);

/// Fixed-supply token ledger with delegated, checkpointed voting power.
///
/// Every mutating call validates and computes all new values before it
/// writes anything, so a failed call leaves the ledger exactly as it was.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotingLedger {
    name: String,
    symbol: String,
    max_supply: TokenAmount,
    total_supply: TokenAmount,
    mode: DelegationMode,
    balances: BTreeMap<Address, u128>,
    /// Recorded delegations. Holders missing here follow `mode`.
    delegates: BTreeMap<Address, Address>,
    checkpoints: BTreeMap<Address, CheckpointHistory>,
    total_supply_checkpoints: CheckpointHistory,
    #[serde(skip)]
    events: Vec<LedgerEvent>,
}

impl VotingLedger {
    /// Deploy the ledger, minting the whole supply to `deployer` at `ctx.block`.
    pub fn deploy(
        config: &LedgerConfig,
        deployer: Address,
        ctx: &ChainContext,
    ) -> Result<Self, LedgerError> {
        if deployer.is_zero() {
            return Err(LedgerError::ZeroAddress("deployer"));
        }
        if config.max_supply == 0 {
            return Err(LedgerError::InvalidConfig("max_supply must be non-zero".into()));
        }
        if config.name.trim().is_empty() || config.symbol.trim().is_empty() {
            return Err(LedgerError::InvalidConfig("name and symbol are required".into()));
        }
        let supply = TokenAmount::whole(config.max_supply);

        let mut ledger = Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            max_supply: supply,
            total_supply: supply,
            mode: config.delegation_mode,
            balances: BTreeMap::new(),
            delegates: BTreeMap::new(),
            checkpoints: BTreeMap::new(),
            total_supply_checkpoints: CheckpointHistory::new(),
            events: Vec::new(),
        };

        ledger.balances.insert(deployer, supply.raw());
        ledger.total_supply_checkpoints.push(ctx.block, supply.raw())?;
        ledger.events.push(LedgerEvent::Transfer {
            from: Address::ZERO,
            to: deployer,
            amount: supply,
        });
        if let Some(delegate) = ledger.delegate_of(&deployer) {
            ledger.apply_power_updates(ctx.block, vec![(delegate, 0, supply.raw())])?;
        }

        tracing::debug!(
            name = %ledger.name,
            symbol = %ledger.symbol,
            supply = %supply,
            deployer = %deployer,
            "voting ledger deployed"
        );
        Ok(ledger)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u32 {
        TokenAmount::DECIMALS
    }

    /// The supply minted at deployment (`s_maxSupply`).
    pub fn max_supply(&self) -> TokenAmount {
        self.max_supply
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    pub fn delegation_mode(&self) -> DelegationMode {
        self.mode
    }

    pub fn balance_of(&self, account: &Address) -> TokenAmount {
        TokenAmount::from_raw(self.balances.get(account).copied().unwrap_or(0))
    }

    /// The account whose voting power includes `account`'s balance, if any.
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.delegate_of(account)
    }

    /// Current voting power held by `account` as a delegate.
    pub fn get_votes(&self, account: &Address) -> TokenAmount {
        TokenAmount::from_raw(self.checkpoints.get(account).map_or(0, |h| h.latest()))
    }

    /// Voting power `account` held at the end of `block`.
    ///
    /// `block` must be strictly before the current block: the current block
    /// can still change, and a tally must never read a moving value.
    pub fn get_past_votes(
        &self,
        account: &Address,
        block: BlockNumber,
        ctx: &ChainContext,
    ) -> Result<TokenAmount, LedgerError> {
        ensure_finalized(block, ctx)?;
        Ok(TokenAmount::from_raw(
            self.checkpoints.get(account).map_or(0, |h| h.upper_lookup(block)),
        ))
    }

    /// Total supply at the end of `block`, with the same finality rule as
    /// [`get_past_votes`](Self::get_past_votes).
    pub fn get_past_total_supply(
        &self,
        block: BlockNumber,
        ctx: &ChainContext,
    ) -> Result<TokenAmount, LedgerError> {
        ensure_finalized(block, ctx)?;
        Ok(TokenAmount::from_raw(
            self.total_supply_checkpoints.upper_lookup(block),
        ))
    }

    pub fn checkpoints(&self, account: &Address) -> Option<&CheckpointHistory> {
        self.checkpoints.get(account)
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.checkpoints.get(account).map_or(0, |h| h.len())
    }

    /// Holders with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (Address, TokenAmount)> + '_ {
        self.balances
            .iter()
            .map(|(a, b)| (*a, TokenAmount::from_raw(*b)))
    }

    /// Delegates with non-zero current voting power, in address order.
    pub fn voting_powers(&self) -> impl Iterator<Item = (Address, TokenAmount)> + '_ {
        self.checkpoints
            .iter()
            .filter(|(_, h)| h.latest() > 0)
            .map(|(a, h)| (*a, TokenAmount::from_raw(h.latest())))
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Move `amount` from `from` to `to`, moving the matching voting power
    /// from `from`'s delegate to `to`'s delegate in the same call.
    pub fn transfer(
        &mut self,
        ctx: &ChainContext,
        from: Address,
        to: Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        if from.is_zero() {
            return Err(LedgerError::ZeroAddress("sender"));
        }
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress("recipient"));
        }
        let from_balance = self.balance_of(&from);
        if amount > from_balance {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: from_balance,
            });
        }

        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_to = if from == to {
            from_balance
        } else {
            self.balance_of(&to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?
        };
        let updates = self.plan_power_move(
            self.delegate_of(&from),
            self.delegate_of(&to),
            amount,
            ctx.block,
        )?;

        if from != to {
            self.set_balance(from, new_from);
            self.set_balance(to, new_to);
        }
        self.apply_power_updates(ctx.block, updates)?;
        self.events.push(LedgerEvent::Transfer { from, to, amount });

        tracing::debug!(%from, %to, %amount, block = ctx.block, "transfer");
        Ok(())
    }

    /// Point `holder`'s voting power at `new_delegate`.
    ///
    /// Moves the holder's whole current balance from the old delegate's
    /// checkpoints to the new one's. Re-delegating to the current delegate
    /// is a no-op.
    pub fn delegate(
        &mut self,
        ctx: &ChainContext,
        holder: Address,
        new_delegate: Address,
    ) -> Result<(), LedgerError> {
        if holder.is_zero() {
            return Err(LedgerError::ZeroAddress("delegator"));
        }
        if new_delegate.is_zero() {
            return Err(LedgerError::ZeroAddress("delegatee"));
        }
        let current = self.delegate_of(&holder);
        if current == Some(new_delegate) {
            return Ok(());
        }

        let balance = self.balance_of(&holder);
        let updates = self.plan_power_move(current, Some(new_delegate), balance, ctx.block)?;

        self.delegates.insert(holder, new_delegate);
        self.apply_power_updates(ctx.block, updates)?;
        self.events.push(LedgerEvent::DelegateChanged {
            delegator: holder,
            from_delegate: current,
            to_delegate: new_delegate,
        });

        tracing::debug!(
            %holder,
            from = ?current,
            to = %new_delegate,
            power = %balance,
            block = ctx.block,
            "delegate changed"
        );
        Ok(())
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Invariants & persistence ─────────────────────────────────────────

    /// Check conservation of balances and of voting power.
    ///
    /// Balances always sum to total supply. Voting power sums to total
    /// supply in implicit mode and to at most total supply in explicit mode.
    pub fn check_invariants(&self) -> Result<(), LedgerError> {
        let balances = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or(LedgerError::Overflow)?;
        if balances != self.total_supply.raw() {
            return Err(LedgerError::Snapshot(format!(
                "balances sum to {} but total supply is {}",
                TokenAmount::from_raw(balances),
                self.total_supply
            )));
        }

        let power = self
            .checkpoints
            .values()
            .try_fold(0u128, |acc, h| acc.checked_add(h.latest()))
            .ok_or(LedgerError::Overflow)?;
        let consistent = match self.mode {
            DelegationMode::Implicit => power == self.total_supply.raw(),
            DelegationMode::Explicit => power <= self.total_supply.raw(),
        };
        if !consistent {
            return Err(LedgerError::Snapshot(format!(
                "voting power sums to {} against total supply {}",
                TokenAmount::from_raw(power),
                self.total_supply
            )));
        }
        Ok(())
    }

    /// Capture the full ledger state as of `ctx.block`.
    pub fn snapshot(&self, ctx: &ChainContext) -> Result<LedgerSnapshot, LedgerError> {
        LedgerSnapshot::capture(self, ctx.block)
    }

    /// Rebuild a ledger from a snapshot, verifying its digest and invariants.
    pub fn restore(snapshot: &LedgerSnapshot) -> Result<Self, LedgerError> {
        snapshot.restore()
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn delegate_of(&self, account: &Address) -> Option<Address> {
        match self.delegates.get(account) {
            Some(delegate) => Some(*delegate),
            None => match self.mode {
                DelegationMode::Implicit => Some(*account),
                DelegationMode::Explicit => None,
            },
        }
    }

    fn set_balance(&mut self, account: Address, amount: TokenAmount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount.raw());
        }
    }

    /// Compute the checkpoint writes for moving `amount` of power from `src`
    /// to `dst` without touching state.
    fn plan_power_move(
        &self,
        src: Option<Address>,
        dst: Option<Address>,
        amount: TokenAmount,
        block: BlockNumber,
    ) -> Result<Vec<PowerUpdate>, LedgerError> {
        let mut updates = Vec::with_capacity(2);
        if src == dst || amount.is_zero() {
            return Ok(updates);
        }
        if let Some(src) = src {
            self.ensure_writable(&src, block)?;
            let previous = self.get_votes(&src).raw();
            let next = previous
                .checked_sub(amount.raw())
                .ok_or(LedgerError::Overflow)?;
            updates.push((src, previous, next));
        }
        if let Some(dst) = dst {
            self.ensure_writable(&dst, block)?;
            let previous = self.get_votes(&dst).raw();
            let next = previous
                .checked_add(amount.raw())
                .ok_or(LedgerError::Overflow)?;
            updates.push((dst, previous, next));
        }
        Ok(updates)
    }

    fn ensure_writable(&self, account: &Address, block: BlockNumber) -> Result<(), LedgerError> {
        if let Some(last) = self.checkpoints.get(account).and_then(|h| h.entries().last()) {
            if last.block > block {
                return Err(LedgerError::NonMonotonicCheckpoint {
                    latest: last.block,
                    attempted: block,
                });
            }
        }
        Ok(())
    }

    fn apply_power_updates(
        &mut self,
        block: BlockNumber,
        updates: Vec<PowerUpdate>,
    ) -> Result<(), LedgerError> {
        for (delegate, previous, current) in updates {
            self.checkpoints
                .entry(delegate)
                .or_default()
                .push(block, current)?;
            self.events.push(LedgerEvent::DelegateVotesChanged {
                delegate,
                previous: TokenAmount::from_raw(previous),
                current: TokenAmount::from_raw(current),
            });
        }
        Ok(())
    }
}

fn ensure_finalized(block: BlockNumber, ctx: &ChainContext) -> Result<(), LedgerError> {
    if block >= ctx.block {
        return Err(LedgerError::FutureLookup {
            requested: block,
            current: ctx.block,
        });
    }
    Ok(())
}
