//! Nullable action handler.

use civic_timelock::{ActionHandler, DelayGate, DispatchError};
use civic_types::{Action, ChainContext};

/// Records dispatched actions instead of performing them.
///
/// Can be told to fail the next dispatch to exercise rollback paths.
#[derive(Clone, Debug, Default)]
pub struct RecordingHandler {
    dispatched: Vec<Action>,
    fail_next: Option<String>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next dispatch fail with `reason`.
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    pub fn dispatched(&self) -> &[Action] {
        &self.dispatched
    }
}

impl ActionHandler for RecordingHandler {
    fn dispatch(
        &mut self,
        _gate: &mut DelayGate,
        _ctx: &ChainContext,
        action: &Action,
    ) -> Result<(), DispatchError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(DispatchError::new(reason));
        }
        self.dispatched.push(action.clone());
        Ok(())
    }
}
