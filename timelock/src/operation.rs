//! Queued operations and their lifecycle.

use civic_types::hash::blake2b_256_fields;
use civic_types::{Action, OperationId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::TimelockError;

/// Caller-chosen value that distinguishes otherwise identical actions.
pub type Salt = [u8; 32];

/// Identity of a scheduled operation: its action and salt.
pub fn hash_operation(action: &Action, salt: &Salt) -> OperationId {
    let [target, value, calldata] = action.hash_fields();
    OperationId::new(blake2b_256_fields(&[&target, &value, &calldata, salt]))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    Unscheduled,
    Scheduled,
    Executed,
    Canceled,
}

impl OperationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Canceled)
    }

    /// Move to `next`, or explain why operation `id` cannot.
    ///
    /// Only `Unscheduled -> Scheduled`, `Scheduled -> Executed` and
    /// `Scheduled -> Canceled` are allowed.
    pub fn transition(self, next: Self, id: OperationId) -> Result<Self, TimelockError> {
        match (self, next) {
            (Self::Unscheduled, Self::Scheduled)
            | (Self::Scheduled, Self::Executed)
            | (Self::Scheduled, Self::Canceled) => Ok(next),
            (Self::Scheduled, _) => Err(TimelockError::AlreadyQueued(id)),
            (Self::Executed, _) => Err(TimelockError::AlreadyExecuted(id)),
            (Self::Canceled, _) => Err(TimelockError::OperationCanceled(id)),
            (Self::Unscheduled, _) => Err(TimelockError::UnknownOperation(id)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub id: OperationId,
    pub action: Action,
    pub salt: Salt,
    pub scheduled_at: Timestamp,
    pub ready_at: Timestamp,
    pub state: OperationState,
}

impl QueuedAction {
    pub fn is_ready(&self, now: Timestamp) -> bool {
        self.state == OperationState::Scheduled && self.ready_at.has_arrived(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_types::{Address, TokenAmount};

    fn id() -> OperationId {
        OperationId::new([7; 32])
    }

    #[test]
    fn hash_depends_on_every_field() {
        let action = Action::transfer(Address::from_label("a"), TokenAmount::whole(1));
        let base = hash_operation(&action, &[0; 32]);
        assert_eq!(base, hash_operation(&action.clone(), &[0; 32]));
        assert_ne!(base, hash_operation(&action, &[1; 32]));

        let mut other = action.clone();
        other.calldata = vec![1];
        assert_ne!(base, hash_operation(&other, &[0; 32]));

        let other = Action::transfer(Address::from_label("a"), TokenAmount::whole(2));
        assert_ne!(base, hash_operation(&other, &[0; 32]));
    }

    #[test]
    fn legal_transitions() {
        use OperationState::*;
        assert_eq!(Unscheduled.transition(Scheduled, id()).unwrap(), Scheduled);
        assert_eq!(Scheduled.transition(Executed, id()).unwrap(), Executed);
        assert_eq!(Scheduled.transition(Canceled, id()).unwrap(), Canceled);
    }

    #[test]
    fn illegal_transitions_name_the_conflict() {
        use OperationState::*;
        assert!(matches!(
            Scheduled.transition(Scheduled, id()),
            Err(TimelockError::AlreadyQueued(_))
        ));
        assert!(matches!(
            Executed.transition(Scheduled, id()),
            Err(TimelockError::AlreadyExecuted(_))
        ));
        assert!(matches!(
            Canceled.transition(Executed, id()),
            Err(TimelockError::OperationCanceled(_))
        ));
        assert!(matches!(
            Unscheduled.transition(Executed, id()),
            Err(TimelockError::UnknownOperation(_))
        ));
        assert!(Executed.is_terminal() && Canceled.is_terminal());
        assert!(!Scheduled.is_terminal());
    }
}
