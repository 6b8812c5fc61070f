//! Governor parameters.

use civic_types::TokenAmount;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Share of past total supply that must participate, 0..=100.
    #[serde(default = "default_quorum_percentage")]
    pub quorum_percentage: u8,

    /// Voting window length, in blocks.
    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    /// Blocks between creation and the opening of the vote. At least one,
    /// so the snapshot block is final once voting opens.
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,

    /// Past votes a proposer needs. Zero lets anyone propose.
    #[serde(default)]
    pub proposal_threshold: TokenAmount,

    /// How long a queued proposal stays executable after it becomes ready.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
}

fn default_quorum_percentage() -> u8 {
    20
}

fn default_voting_period() -> u64 {
    604_800
}

fn default_voting_delay() -> u64 {
    1
}

fn default_grace_period_secs() -> u64 {
    14 * 24 * 60 * 60
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            quorum_percentage: default_quorum_percentage(),
            voting_period: default_voting_period(),
            voting_delay: default_voting_delay(),
            proposal_threshold: TokenAmount::ZERO,
            grace_period_secs: default_grace_period_secs(),
        }
    }
}

impl GovernorConfig {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.quorum_percentage > 100 {
            return Err(GovernanceError::InvalidConfig(format!(
                "quorum_percentage {} exceeds 100",
                self.quorum_percentage
            )));
        }
        if self.voting_period == 0 {
            return Err(GovernanceError::InvalidConfig(
                "voting_period must be non-zero".into(),
            ));
        }
        if self.voting_delay == 0 {
            return Err(GovernanceError::InvalidConfig(
                "voting_delay must be at least one block".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let config: GovernorConfig = toml::from_str("").unwrap();
        assert_eq!(config, GovernorConfig::default());
        assert_eq!(config.quorum_percentage, 20);
        assert_eq!(config.voting_period, 604_800);
        assert_eq!(config.voting_delay, 1);
        assert_eq!(config.grace_period_secs, 1_209_600);
        config.validate().unwrap();
    }

    #[test]
    fn threshold_parses_as_decimal() {
        let config: GovernorConfig = toml::from_str(r#"proposal_threshold = "2.5""#).unwrap();
        assert_eq!(config.proposal_threshold.raw(), 2_500_000_000_000_000_000);
    }

    #[test]
    fn validation_rejects_out_of_range() {
        for bad in [
            GovernorConfig { quorum_percentage: 101, ..GovernorConfig::default() },
            GovernorConfig { voting_period: 0, ..GovernorConfig::default() },
            GovernorConfig { voting_delay: 0, ..GovernorConfig::default() },
        ] {
            assert!(matches!(bad.validate(), Err(GovernanceError::InvalidConfig(_))));
        }
    }
}
