//! Strongly-typed identifiers used across the domain.
//!
//! Two families live here:
//!
//! - **UUID newtypes** (`CandidateId`, `JobOfferId`, `CompanyId`, `TemplateId`):
//!   references to entities owned by other bounded contexts.
//! - **String-backed ids** (`RecruiterId`, `ScoutId`): the persisted text is kept
//!   verbatim so that `from(s).value() == s` always holds. `ScoutId` additionally
//!   accepts legacy, non-UUID identifiers.

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Length of the canonical hyphenated UUID form (`8-4-4-4-12`).
const HYPHENATED_UUID_LEN: usize = 36;

static LEGACY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("legacy id pattern is valid")
});

/// Strict check: only the hyphenated form is accepted (no braces, URNs or the
/// 32-digit simple form).
fn is_hyphenated_uuid(s: &str) -> bool {
    s.len() == HYPHENATED_UUID_LEN && Uuid::try_parse(s).is_ok()
}

/// Identifier of a candidate (job seeker).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(Uuid);

/// Identifier of a job offer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobOfferId(Uuid);

/// Identifier of a hiring company.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(Uuid);

/// Identifier of a scout message template.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(CandidateId, "CandidateId");
impl_uuid_newtype!(JobOfferId, "JobOfferId");
impl_uuid_newtype!(CompanyId, "CompanyId");
impl_uuid_newtype!(TemplateId, "TemplateId");

/// Identifier of a recruiter. Always a hyphenated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecruiterId(String);

impl RecruiterId {
    /// Generate a fresh random (v4) recruiter id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Rebuild a recruiter id from its persisted form.
    pub fn from(id: &str) -> DomainResult<Self> {
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("RecruiterId: must not be blank"));
        }
        if !is_hyphenated_uuid(id) {
            return Err(DomainError::invalid_id(format!(
                "RecruiterId: expected a UUID, got {id:?}"
            )));
        }
        Ok(Self(id.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RecruiterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecruiterId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from(s)
    }
}

impl TryFrom<String> for RecruiterId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from(&value)
    }
}

impl From<RecruiterId> for String {
    fn from(value: RecruiterId) -> Self {
        value.0
    }
}

/// Identifier of a scout.
///
/// Newly generated ids look like `SCT-<uuid>`. Ids imported from older systems
/// may be a bare UUID or any `[A-Za-z0-9_-]+` token; those are accepted as-is.
/// Ordering is lexicographic on the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScoutId(String);

impl ScoutId {
    /// Fixed prefix carried by every id this system generates.
    pub const PREFIX: &'static str = "SCT-";

    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4()))
    }

    /// Rebuild a scout id from its persisted form.
    pub fn from(id: &str) -> DomainResult<Self> {
        Self::validate(id)?;
        Ok(Self(id.to_string()))
    }

    /// Normalize an id received from a foreign system: the prefix is added when
    /// missing and the result must then pass [`ScoutId::from`].
    pub fn from_external(external_id: &str) -> DomainResult<Self> {
        if external_id.starts_with(Self::PREFIX) {
            Self::from(external_id)
        } else {
            Self::from(&format!("{}{}", Self::PREFIX, external_id))
        }
    }

    /// Parse a comma-separated list. Blank entries are skipped; the first
    /// invalid entry fails the whole batch.
    pub fn parse_multiple(ids: &str) -> DomainResult<Vec<Self>> {
        ids.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::from)
            .collect()
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn has_prefix(&self) -> bool {
        self.0.starts_with(Self::PREFIX)
    }

    /// The id without the `SCT-` prefix (unchanged for legacy ids).
    pub fn without_prefix(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }

    fn validate(id: &str) -> DomainResult<()> {
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("ScoutId: must not be blank"));
        }

        if let Some(uuid_part) = id.strip_prefix(Self::PREFIX) {
            if !is_hyphenated_uuid(uuid_part) {
                return Err(DomainError::invalid_id(format!(
                    "ScoutId: malformed prefixed id {id:?}"
                )));
            }
            return Ok(());
        }

        if is_hyphenated_uuid(id) || LEGACY_ID.is_match(id) {
            Ok(())
        } else {
            Err(DomainError::invalid_id(format!(
                "ScoutId: invalid characters in {id:?}"
            )))
        }
    }
}

impl core::fmt::Display for ScoutId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ScoutId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from(s)
    }
}

impl TryFrom<String> for ScoutId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl From<ScoutId> for String {
    fn from(value: ScoutId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_UUID: &str = "3f2b8c1e-9a4d-4e6f-8b7a-1c2d3e4f5a6b";

    #[test]
    fn recruiter_id_requires_hyphenated_uuid() {
        assert!(RecruiterId::from(SAMPLE_UUID).is_ok());
        assert!(RecruiterId::from("").is_err());
        assert!(RecruiterId::from("   ").is_err());
        assert!(RecruiterId::from("not-a-uuid").is_err());
        // Simple (unhyphenated) and braced forms are rejected.
        assert!(RecruiterId::from("3f2b8c1e9a4d4e6f8b7a1c2d3e4f5a6b").is_err());
        assert!(RecruiterId::from("{3f2b8c1e-9a4d-4e6f-8b7a-1c2d3e4f5a6b}").is_err());
    }

    #[test]
    fn recruiter_id_errors_are_validation_kind() {
        let err = RecruiterId::from("nope").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn generated_recruiter_id_round_trips() {
        let id = RecruiterId::generate();
        assert_eq!(RecruiterId::from(id.value()).unwrap(), id);
    }

    #[test]
    fn generated_scout_id_is_prefixed_and_round_trips() {
        let id = ScoutId::generate();
        assert!(id.has_prefix());
        assert!(id.value().starts_with("SCT-"));
        assert_eq!(ScoutId::from(id.value()).unwrap(), id);
        assert!(is_hyphenated_uuid(id.without_prefix()));
    }

    #[test]
    fn scout_id_accepts_bare_uuid_and_legacy_tokens() {
        let bare = ScoutId::from(SAMPLE_UUID).unwrap();
        assert!(!bare.has_prefix());
        assert_eq!(bare.without_prefix(), SAMPLE_UUID);

        let legacy = ScoutId::from("legacy_scout-0042").unwrap();
        assert_eq!(legacy.value(), "legacy_scout-0042");
        assert_eq!(legacy.without_prefix(), "legacy_scout-0042");
    }

    #[test]
    fn scout_id_rejects_blank_bad_prefix_and_bad_characters() {
        assert!(ScoutId::from("").is_err());
        assert!(ScoutId::from("  ").is_err());
        assert!(ScoutId::from("SCT-not-a-uuid").is_err());
        assert!(ScoutId::from("SCT-").is_err());
        assert!(ScoutId::from("has space").is_err());
        assert!(ScoutId::from("semi;colon").is_err());
    }

    #[test]
    fn from_external_adds_prefix_when_missing() {
        let id = ScoutId::from_external(SAMPLE_UUID).unwrap();
        assert_eq!(id.value(), format!("SCT-{SAMPLE_UUID}"));

        let already = ScoutId::from_external(&format!("SCT-{SAMPLE_UUID}")).unwrap();
        assert_eq!(already, id);

        // The normalized form must still be a valid prefixed id.
        assert!(ScoutId::from_external("legacy_42").is_err());
    }

    #[test]
    fn parse_multiple_skips_blank_entries() {
        let ids = ScoutId::parse_multiple("a,b, ,c").unwrap();
        let values: Vec<&str> = ids.iter().map(ScoutId::value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_multiple_fails_on_first_invalid_entry() {
        let err = ScoutId::parse_multiple("a, b c ,d").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("b c")));
    }

    #[test]
    fn parse_multiple_of_empty_input_is_empty() {
        assert!(ScoutId::parse_multiple("").unwrap().is_empty());
        assert!(ScoutId::parse_multiple(" , ,").unwrap().is_empty());
    }

    #[test]
    fn scout_ids_sort_lexicographically() {
        let mut ids = vec![
            ScoutId::from("c").unwrap(),
            ScoutId::from("a").unwrap(),
            ScoutId::from("b").unwrap(),
        ];
        ids.sort();
        let values: Vec<&str> = ids.iter().map(ScoutId::value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn serde_rejects_malformed_ids() {
        let ok: ScoutId = serde_json::from_str("\"legacy-1\"").unwrap();
        assert_eq!(ok.value(), "legacy-1");
        assert!(serde_json::from_str::<ScoutId>("\"bad id\"").is_err());
        assert!(serde_json::from_str::<RecruiterId>("\"legacy-1\"").is_err());

        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, "\"legacy-1\"");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any hyphenated UUID round-trips through `RecruiterId::from` verbatim.
        #[test]
        fn recruiter_id_preserves_input(bytes in any::<[u8; 16]>(), upper in any::<bool>()) {
            let mut s = Uuid::from_bytes(bytes).hyphenated().to_string();
            if upper {
                s = s.to_uppercase();
            }
            let id = RecruiterId::from(&s).unwrap();
            prop_assert_eq!(id.value(), s.as_str());
        }

        /// Property: every legacy token is accepted as-is.
        #[test]
        fn legacy_scout_ids_are_accepted(s in "[a-zA-Z0-9_-]{1,40}") {
            prop_assume!(!s.starts_with(ScoutId::PREFIX));
            let id = ScoutId::from(&s).unwrap();
            prop_assert_eq!(id.value(), s.as_str());
        }
    }
}
