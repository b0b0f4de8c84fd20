//! Environment-driven configuration.

use anyhow::Context;

use crate::expiration::{ExpirationType, ScoutExpiration};

pub const DEFAULT_EXPIRATION_VAR: &str = "SCOUT_DEFAULT_EXPIRATION";
pub const WARNING_HOURS_VAR: &str = "SCOUT_EXPIRY_WARNING_HOURS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoutingConfig {
    /// Policy used when a scout is created without an explicit one.
    pub default_expiration: ExpirationType,
    /// Overrides the policy's own warning threshold when set.
    pub warning_threshold_hours: Option<u32>,
}

impl Default for ScoutingConfig {
    fn default() -> Self {
        Self {
            default_expiration: ExpirationType::Standard,
            warning_threshold_hours: None,
        }
    }
}

impl ScoutingConfig {
    /// Read from the process environment. Malformed values fall back to the
    /// defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Strict variant of [`ScoutingConfig::from_env`].
    pub fn try_from_env() -> anyhow::Result<Self> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let default_expiration = match lookup(DEFAULT_EXPIRATION_VAR) {
            Some(raw) => raw.parse::<ExpirationType>().unwrap_or_else(|err| {
                tracing::warn!(%err, value = %raw, "{DEFAULT_EXPIRATION_VAR} ignored");
                defaults.default_expiration
            }),
            None => defaults.default_expiration,
        };

        let warning_threshold_hours = lookup(WARNING_HOURS_VAR).and_then(|raw| {
            raw.trim()
                .parse::<u32>()
                .inspect_err(|err| tracing::warn!(%err, value = %raw, "{WARNING_HOURS_VAR} ignored"))
                .ok()
        });

        Self {
            default_expiration,
            warning_threshold_hours,
        }
    }

    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEFAULT_EXPIRATION_VAR) {
            config.default_expiration = raw
                .parse::<ExpirationType>()
                .with_context(|| format!("invalid {DEFAULT_EXPIRATION_VAR}: {raw:?}"))?;
        }
        if let Some(raw) = lookup(WARNING_HOURS_VAR) {
            let hours = raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid {WARNING_HOURS_VAR}: {raw:?}"))?;
            config.warning_threshold_hours = Some(hours);
        }

        Ok(config)
    }

    /// The policy applied when none is supplied.
    pub fn default_policy(&self) -> ScoutExpiration {
        let policy = ScoutExpiration::for_type(self.default_expiration);
        match self.warning_threshold_hours {
            Some(hours) => policy.with_warning_threshold_hours(hours),
            None => policy,
        }
    }
}
