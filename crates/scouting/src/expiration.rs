//! Expiration policy for scouts.
//!
//! A policy is stateless: given a reference time it deterministically yields
//! the end of the validity window. Extension *eligibility* is described here
//! (`extendable`, `max_extensions`) but the number of extensions already used
//! is tracked by the scout itself.

use core::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use scoutflow_core::{DomainError, DomainResult, ValueObject};

/// Kind of policy, one per hiring situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationType {
    Standard,
    Urgent,
    Executive,
    Internship,
    Freelance,
    Custom,
}

impl ExpirationType {
    pub fn code(self) -> &'static str {
        match self {
            ExpirationType::Standard => "STANDARD",
            ExpirationType::Urgent => "URGENT",
            ExpirationType::Executive => "EXECUTIVE",
            ExpirationType::Internship => "INTERNSHIP",
            ExpirationType::Freelance => "FREELANCE",
            ExpirationType::Custom => "CUSTOM",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ExpirationType::Standard => "Standard",
            ExpirationType::Urgent => "Urgent",
            ExpirationType::Executive => "Executive",
            ExpirationType::Internship => "Internship",
            ExpirationType::Freelance => "Freelance",
            ExpirationType::Custom => "Custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExpirationType::Standard => "Default window for ordinary scouts",
            ExpirationType::Urgent => "Short window for urgent openings",
            ExpirationType::Executive => "Long window for executive and management roles",
            ExpirationType::Internship => "Window for internship programmes",
            ExpirationType::Freelance => "Window for freelance engagements",
            ExpirationType::Custom => "Individually configured window",
        }
    }
}

impl core::fmt::Display for ExpirationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ExpirationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STANDARD" => Ok(ExpirationType::Standard),
            "URGENT" => Ok(ExpirationType::Urgent),
            "EXECUTIVE" => Ok(ExpirationType::Executive),
            "INTERNSHIP" => Ok(ExpirationType::Internship),
            "FREELANCE" => Ok(ExpirationType::Freelance),
            "CUSTOM" => Ok(ExpirationType::Custom),
            other => Err(DomainError::validation(format!(
                "unknown expiration type: {other}"
            ))),
        }
    }
}

/// Calendar unit of a policy duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    /// Calendar months; the day is clamped to the end of shorter months.
    Months,
}

/// Expiration policy value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScoutExpiration")]
pub struct ScoutExpiration {
    expiration_type: ExpirationType,
    duration_value: u32,
    duration_unit: DurationUnit,
    extendable: bool,
    max_extensions: u32,
    warning_threshold_hours: u32,
}

impl ValueObject for ScoutExpiration {}

#[derive(Deserialize)]
struct RawScoutExpiration {
    expiration_type: ExpirationType,
    duration_value: u32,
    duration_unit: DurationUnit,
    extendable: bool,
    max_extensions: u32,
    warning_threshold_hours: u32,
}

impl TryFrom<RawScoutExpiration> for ScoutExpiration {
    type Error = DomainError;

    fn try_from(raw: RawScoutExpiration) -> Result<Self, Self::Error> {
        let policy = Self::custom(
            raw.duration_value,
            raw.duration_unit,
            raw.extendable,
            raw.max_extensions,
            raw.warning_threshold_hours,
        )?;
        Ok(Self {
            expiration_type: raw.expiration_type,
            ..policy
        })
    }
}

impl ScoutExpiration {
    /// Preset policy for a named type. `Custom` falls back to the standard window.
    pub fn for_type(expiration_type: ExpirationType) -> Self {
        let (duration_value, extendable, max_extensions, warning_threshold_hours) =
            match expiration_type {
                ExpirationType::Standard | ExpirationType::Custom => (14, true, 2, 48),
                ExpirationType::Urgent => (3, false, 0, 12),
                ExpirationType::Executive => (30, true, 3, 72),
                ExpirationType::Internship => (21, true, 1, 48),
                ExpirationType::Freelance => (7, true, 1, 24),
            };

        Self {
            expiration_type,
            duration_value,
            duration_unit: DurationUnit::Days,
            extendable,
            max_extensions,
            warning_threshold_hours,
        }
    }

    pub fn standard() -> Self {
        Self::for_type(ExpirationType::Standard)
    }

    pub fn urgent() -> Self {
        Self::for_type(ExpirationType::Urgent)
    }

    pub fn executive() -> Self {
        Self::for_type(ExpirationType::Executive)
    }

    pub fn internship() -> Self {
        Self::for_type(ExpirationType::Internship)
    }

    pub fn freelance() -> Self {
        Self::for_type(ExpirationType::Freelance)
    }

    /// Individually configured policy. The duration must be positive.
    pub fn custom(
        duration_value: u32,
        duration_unit: DurationUnit,
        extendable: bool,
        max_extensions: u32,
        warning_threshold_hours: u32,
    ) -> DomainResult<Self> {
        if duration_value == 0 {
            return Err(DomainError::validation(
                "expiration duration must be positive",
            ));
        }

        Ok(Self {
            expiration_type: ExpirationType::Custom,
            duration_value,
            duration_unit,
            extendable,
            max_extensions: if extendable { max_extensions } else { 0 },
            warning_threshold_hours,
        })
    }

    /// Same policy with a different warning threshold.
    pub fn with_warning_threshold_hours(mut self, hours: u32) -> Self {
        self.warning_threshold_hours = hours;
        self
    }

    pub fn expiration_type(&self) -> ExpirationType {
        self.expiration_type
    }

    pub fn duration_value(&self) -> u32 {
        self.duration_value
    }

    pub fn duration_unit(&self) -> DurationUnit {
        self.duration_unit
    }

    pub fn is_extendable(&self) -> bool {
        self.extendable
    }

    pub fn max_extensions(&self) -> u32 {
        self.max_extensions
    }

    pub fn warning_threshold_hours(&self) -> u32 {
        self.warning_threshold_hours
    }

    /// `reference + duration`. Saturates at the latest representable instant.
    pub fn calculate_expiration_date(&self, reference: DateTime<Utc>) -> DateTime<Utc> {
        let value = i64::from(self.duration_value);
        let computed = match self.duration_unit {
            DurationUnit::Minutes => reference.checked_add_signed(Duration::minutes(value)),
            DurationUnit::Hours => reference.checked_add_signed(Duration::hours(value)),
            DurationUnit::Days => reference.checked_add_signed(Duration::days(value)),
            DurationUnit::Weeks => reference.checked_add_signed(Duration::weeks(value)),
            DurationUnit::Months => reference.checked_add_months(Months::new(self.duration_value)),
        };
        computed.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether another extension is allowed after `used` extensions.
    pub fn can_extend(&self, used: u32) -> bool {
        self.extendable && used < self.max_extensions
    }

    /// Start of the "expiring soon" window for a scout expiring at `expires_at`.
    pub fn warning_starts_at(&self, expires_at: DateTime<Utc>) -> DateTime<Utc> {
        expires_at
            .checked_sub_signed(Duration::hours(i64::from(self.warning_threshold_hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_in_warning_period(&self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now >= self.warning_starts_at(expires_at) && now <= expires_at
    }
}

impl Default for ScoutExpiration {
    fn default() -> Self {
        Self::standard()
    }
}
