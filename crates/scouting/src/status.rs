use core::str::FromStr;

use serde::{Deserialize, Serialize};

use scoutflow_core::DomainError;

/// Scout status lifecycle.
///
/// ```text
/// DRAFT ──send──▶ SENT ──mark_as_read──▶ READ ──respond──▶ RESPONDED
///   │               │                      └────decline──▶ DECLINED
///   └────cancel─────┴──▶ CANCELLED ──delete──▶ DELETED
/// ```
///
/// `Expired` exists for reporting; no transition assigns it. Expiry is
/// evaluated lazily against the scout's `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoutStatus {
    Draft,
    Sent,
    Read,
    Responded,
    Declined,
    Cancelled,
    Expired,
    Deleted,
}

impl ScoutStatus {
    pub const ALL: [ScoutStatus; 8] = [
        ScoutStatus::Draft,
        ScoutStatus::Sent,
        ScoutStatus::Read,
        ScoutStatus::Responded,
        ScoutStatus::Declined,
        ScoutStatus::Cancelled,
        ScoutStatus::Expired,
        ScoutStatus::Deleted,
    ];

    /// Stable persistence code.
    pub fn code(self) -> &'static str {
        match self {
            ScoutStatus::Draft => "DRAFT",
            ScoutStatus::Sent => "SENT",
            ScoutStatus::Read => "READ",
            ScoutStatus::Responded => "RESPONDED",
            ScoutStatus::Declined => "DECLINED",
            ScoutStatus::Cancelled => "CANCELLED",
            ScoutStatus::Expired => "EXPIRED",
            ScoutStatus::Deleted => "DELETED",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ScoutStatus::Draft => "Draft",
            ScoutStatus::Sent => "Sent",
            ScoutStatus::Read => "Read",
            ScoutStatus::Responded => "Responded",
            ScoutStatus::Declined => "Declined",
            ScoutStatus::Cancelled => "Cancelled",
            ScoutStatus::Expired => "Expired",
            ScoutStatus::Deleted => "Deleted",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScoutStatus::Draft => "Created but not yet sent to the candidate",
            ScoutStatus::Sent => "Delivered to the candidate",
            ScoutStatus::Read => "Opened by the candidate",
            ScoutStatus::Responded => "The candidate replied with interest",
            ScoutStatus::Declined => "The candidate declined the offer",
            ScoutStatus::Cancelled => "Withdrawn by the recruiter",
            ScoutStatus::Expired => "The validity window has passed",
            ScoutStatus::Deleted => "Logically deleted",
        }
    }

    /// Statuses still awaiting an outcome.
    pub fn active_statuses() -> [ScoutStatus; 3] {
        [ScoutStatus::Draft, ScoutStatus::Sent, ScoutStatus::Read]
    }

    pub fn is_active(self) -> bool {
        matches!(self, ScoutStatus::Draft | ScoutStatus::Sent | ScoutStatus::Read)
    }

    /// Only deletion leaves these statuses.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScoutStatus::Responded
                | ScoutStatus::Declined
                | ScoutStatus::Cancelled
                | ScoutStatus::Deleted
        )
    }

    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| DomainError::validation(format!("unknown scout status code: {code}")))
    }
}

impl core::fmt::Display for ScoutStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ScoutStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}
