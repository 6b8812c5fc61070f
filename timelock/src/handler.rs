//! The seam between the gate and whatever an action actually does.

use civic_types::{Action, ChainContext};
use thiserror::Error;

use crate::gate::DelayGate;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct DispatchError(pub String);

impl DispatchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Performs the effect of an executed action.
///
/// The gate hands itself to the handler so that an action may call back into
/// it. Any such call sees the operation already marked executed. Returning an
/// error rolls back every change made to the gate during the dispatch.
pub trait ActionHandler {
    fn dispatch(
        &mut self,
        gate: &mut DelayGate,
        ctx: &ChainContext,
        action: &Action,
    ) -> Result<(), DispatchError>;
}

/// Accepts every action without side effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl ActionHandler for NoopHandler {
    fn dispatch(
        &mut self,
        _gate: &mut DelayGate,
        _ctx: &ChainContext,
        _action: &Action,
    ) -> Result<(), DispatchError> {
        Ok(())
    }
}
