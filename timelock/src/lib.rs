//! Delay gate for the Civic governance engine.
//!
//! Approved actions are scheduled here and may only be executed once a
//! minimum delay has elapsed. Who may schedule, execute and cancel is decided
//! by three roles (Admin, Proposer, Executor). The gate owns the treasury
//! identity: every governed effect is dispatched from it through an
//! [`ActionHandler`].

pub mod config;
pub mod error;
pub mod event;
pub mod gate;
pub mod handler;
pub mod operation;
pub mod role;

pub use config::GateConfig;
pub use error::TimelockError;
pub use event::TimelockEvent;
pub use gate::DelayGate;
pub use handler::{ActionHandler, DispatchError, NoopHandler};
pub use operation::{hash_operation, OperationState, QueuedAction, Salt};
pub use role::{Role, RoleBindings};
