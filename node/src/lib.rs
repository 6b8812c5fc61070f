//! Civic node: composes the governance engines into one deployable system.
//!
//! The node is the host side of the engines. It:
//! - Deploys the ledger, delay gate and governor from one TOML config
//! - Wires the governor in as the gate's proposer
//! - Executes actions as treasury transfers out of the gate's account
//! - Fans component events out to subscribers
//! - Replays JSON scenarios against a deterministic chain

pub mod config;
pub mod error;
pub mod event_bus;
pub mod scenario;
pub mod system;
pub mod treasury;

pub use config::DeploymentConfig;
pub use error::NodeError;
pub use event_bus::{EventBus, SystemEvent};
pub use scenario::{Scenario, ScenarioReport, ScenarioRunner, ScenarioStep, Step, StepOutcome};
pub use system::GovernanceSystem;
pub use treasury::TreasuryHandler;
