//! Deployment configuration with TOML file support.

use std::path::Path;

use civic_governance::GovernorConfig;
use civic_ledger::LedgerConfig;
use civic_timelock::GateConfig;
use civic_types::Address;
use civic_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::NodeError;

/// Everything needed to deploy a governance system.
///
/// Can be loaded from a TOML file via [`DeploymentConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The defaults reproduce the
/// reference deployment: 1,000,000 GT, a two-day delay, 20% quorum, a
/// 604800-block voting period and a one-block voting delay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Receives the whole supply and, unless `[timelock] admin` is set, the
    /// gate's Admin role.
    #[serde(default = "default_deployer")]
    pub deployer: Address,

    /// Identity the governor uses when calling the gate.
    #[serde(default = "default_governor_address")]
    pub governor_address: Address,

    /// The gate's own account, which holds the treasury.
    #[serde(default = "default_timelock_address")]
    pub timelock_address: Address,

    /// Seconds per block when replaying scenarios.
    #[serde(default = "default_block_time_secs")]
    pub block_time_secs: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub timelock: GateConfig,

    #[serde(default)]
    pub governor: GovernorConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_deployer() -> Address {
    Address::from_label("deployer")
}

fn default_governor_address() -> Address {
    Address::from_label("governor")
}

fn default_timelock_address() -> Address {
    Address::from_label("timelock")
}

fn default_block_time_secs() -> u64 {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DeploymentConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Check cross-component constraints the individual sections cannot.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.deployer.is_zero() {
            return Err(NodeError::Config("deployer cannot be the zero address".into()));
        }
        if self.governor_address == self.timelock_address {
            return Err(NodeError::Config(
                "governor and timelock must have distinct addresses".into(),
            ));
        }
        self.governor
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            deployer: default_deployer(),
            governor_address: default_governor_address(),
            timelock_address: default_timelock_address(),
            block_time_secs: default_block_time_secs(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            ledger: LedgerConfig::default(),
            timelock: GateConfig::default(),
            governor: GovernorConfig::default(),
        }
    }
}
