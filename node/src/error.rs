use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] civic_ledger::LedgerError),

    #[error("timelock error: {0}")]
    Timelock(#[from] civic_timelock::TimelockError),

    #[error("governance error: {0}")]
    Governance(#[from] civic_governance::GovernanceError),

    #[error("config error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    pub fn kind(&self) -> civic_types::ErrorKind {
        use civic_types::ErrorKind;
        match self {
            Self::Ledger(e) => e.kind(),
            Self::Timelock(e) => e.kind(),
            Self::Governance(e) => e.kind(),
            Self::Config(_) | Self::Io(_) => ErrorKind::Configuration,
            Self::Scenario(_) => ErrorKind::Validation,
        }
    }
}
