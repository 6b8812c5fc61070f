//! Deployment parameters for the delay gate.

use civic_types::Address;
use serde::{Deserialize, Serialize};

/// Two days, in seconds.
pub const DEFAULT_MIN_DELAY_SECS: u64 = 172_800;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Initial Admin. The deployer when unset.
    #[serde(default)]
    pub admin: Option<Address>,

    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: u64,

    #[serde(default)]
    pub proposers: Vec<Address>,

    /// `Address::ZERO` here lets anyone execute.
    #[serde(default)]
    pub executors: Vec<Address>,
}

fn default_min_delay_secs() -> u64 {
    DEFAULT_MIN_DELAY_SECS
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            admin: None,
            min_delay_secs: default_min_delay_secs(),
            proposers: Vec::new(),
            executors: Vec::new(),
        }
    }
}
