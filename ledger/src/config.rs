//! Deployment parameters for the voting ledger.

use serde::{Deserialize, Serialize};

/// How a holder that never called `delegate` is counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationMode {
    /// Undelegated holders are their own delegate. Voting power tracks
    /// balances from genesis and always sums to total supply.
    #[default]
    Implicit,
    /// Undelegated balances count for nobody until the holder delegates,
    /// possibly to itself.
    Explicit,
}

/// Ledger configuration, fixed at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Whole tokens minted once to the deployer.
    #[serde(default = "default_max_supply")]
    pub max_supply: u64,

    #[serde(default)]
    pub delegation_mode: DelegationMode,
}

fn default_name() -> String {
    "Governance Token".to_string()
}

fn default_symbol() -> String {
    "GT".to_string()
}

fn default_max_supply() -> u64 {
    1_000_000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            max_supply: default_max_supply(),
            delegation_mode: DelegationMode::default(),
        }
    }
}
