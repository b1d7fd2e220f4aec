//! Error types for recurrence-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Unsupported repeat rule: {0}")]
    UnsupportedRule(String),

    #[error("Invalid repeat rule arguments: {0}")]
    InvalidRuleArguments(String),

    #[error("Computation bound exceeded: {0}")]
    ComputationBoundExceeded(String),

    #[error("Next date not found: {0}")]
    NotFound(String),

    #[error("Invalid search limits: {0}")]
    InvalidConfig(String),
}

impl RecurrenceError {
    /// True when the failure was caused by caller input (bad date or rule),
    /// false when a search bound or configuration is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateFormat(_) | Self::UnsupportedRule(_) | Self::InvalidRuleArguments(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RecurrenceError>;
