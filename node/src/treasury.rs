//! Treasury dispatch: executed actions move tokens out of the gate's account.

use civic_ledger::VotingLedger;
use civic_timelock::{ActionHandler, DelayGate, DispatchError};
use civic_types::{Action, Address, ChainContext};

/// Performs an action as a ledger transfer of `action.value` from the
/// treasury (the gate's own account) to `action.target`.
///
/// Actions with zero value move nothing; their call data is only logged.
pub struct TreasuryHandler<'a> {
    ledger: &'a mut VotingLedger,
    treasury: Address,
}

impl<'a> TreasuryHandler<'a> {
    pub fn new(ledger: &'a mut VotingLedger, treasury: Address) -> Self {
        Self { ledger, treasury }
    }
}

impl ActionHandler for TreasuryHandler<'_> {
    fn dispatch(
        &mut self,
        _gate: &mut DelayGate,
        ctx: &ChainContext,
        action: &Action,
    ) -> Result<(), DispatchError> {
        if action.value.is_zero() {
            tracing::debug!(
                target_account = %action.target,
                calldata = %hex::encode(&action.calldata),
                "zero-value action dispatched"
            );
            return Ok(());
        }
        self.ledger
            .transfer(ctx, self.treasury, action.target, action.value)
            .map_err(|e| DispatchError::new(e.to_string()))?;
        tracing::info!(
            treasury = %self.treasury,
            to = %action.target,
            amount = %action.value,
            "treasury payout"
        );
        Ok(())
    }
}
