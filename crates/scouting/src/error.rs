//! Scouting error model.

use thiserror::Error;

use scoutflow_core::DomainError;

use crate::status::ScoutStatus;

pub type ScoutResult<T> = Result<T, ScoutError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoutError {
    /// Malformed input (identifier, message, policy). Never persist the value.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The operation is not allowed in the aggregate's current state. The
    /// aggregate is left exactly as it was.
    #[error("business rule violated (status {status}): {reason}")]
    BusinessRuleViolation { status: ScoutStatus, reason: String },
}

impl ScoutError {
    pub fn rule(status: ScoutStatus, reason: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            status,
            reason: reason.into(),
        }
    }

    /// Status observed when a business rule rejected the operation.
    pub fn status(&self) -> Option<ScoutStatus> {
        match self {
            Self::BusinessRuleViolation { status, .. } => Some(*status),
            Self::Validation(_) => None,
        }
    }

    pub fn is_business_rule_violation(&self) -> bool {
        matches!(self, Self::BusinessRuleViolation { .. })
    }
}
