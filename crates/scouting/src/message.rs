//! Scout message content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scoutflow_core::{DomainError, DomainResult, ValueObject};

/// Closing line used when the recruiter does not supply one.
pub const DEFAULT_CALL_TO_ACTION: &str =
    "If this opportunity interests you, we would be glad to hear back from you.";

/// Message content of a scout (value object).
///
/// Invariants: the subject is never blank and every text field is trimmed.
/// Instances are immutable; use [`ScoutMessage::revise`] to derive an edited copy.
/// Deserialization goes through the same validation as [`ScoutMessageBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScoutMessage")]
pub struct ScoutMessage {
    subject: String,
    body: String,
    personalized_greeting: Option<String>,
    company_introduction: Option<String>,
    position_description: Option<String>,
    benefits: Option<String>,
    call_to_action: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ValueObject for ScoutMessage {}

/// Wire shape of [`ScoutMessage`], checked before it becomes a message.
#[derive(Deserialize)]
struct RawScoutMessage {
    subject: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    personalized_greeting: Option<String>,
    #[serde(default)]
    company_introduction: Option<String>,
    #[serde(default)]
    position_description: Option<String>,
    #[serde(default)]
    benefits: Option<String>,
    #[serde(default)]
    call_to_action: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawScoutMessage> for ScoutMessage {
    type Error = DomainError;

    fn try_from(raw: RawScoutMessage) -> Result<Self, Self::Error> {
        ScoutMessageBuilder {
            subject: raw.subject,
            body: raw.body,
            personalized_greeting: raw.personalized_greeting,
            company_introduction: raw.company_introduction,
            position_description: raw.position_description,
            benefits: raw.benefits,
            call_to_action: raw.call_to_action,
            created_at: Some(raw.created_at),
        }
        .build(raw.updated_at)
    }
}

impl ScoutMessage {
    /// Subject + body only; every optional section unset.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::builder(subject, body).build(now)
    }

    pub fn builder(subject: impl Into<String>, body: impl Into<String>) -> ScoutMessageBuilder {
        ScoutMessageBuilder {
            subject: subject.into(),
            body: body.into(),
            personalized_greeting: None,
            company_introduction: None,
            position_description: None,
            benefits: None,
            call_to_action: None,
            created_at: None,
        }
    }

    /// Builder pre-filled with this message's content. The built copy keeps the
    /// existing `created_at` and takes `updated_at` from `build`.
    pub fn revise(&self) -> ScoutMessageBuilder {
        ScoutMessageBuilder {
            subject: self.subject.clone(),
            body: self.body.clone(),
            personalized_greeting: self.personalized_greeting.clone(),
            company_introduction: self.company_introduction.clone(),
            position_description: self.position_description.clone(),
            benefits: self.benefits.clone(),
            call_to_action: Some(self.call_to_action.clone()),
            created_at: Some(self.created_at),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn personalized_greeting(&self) -> Option<&str> {
        self.personalized_greeting.as_deref()
    }

    pub fn company_introduction(&self) -> Option<&str> {
        self.company_introduction.as_deref()
    }

    pub fn position_description(&self) -> Option<&str> {
        self.position_description.as_deref()
    }

    pub fn benefits(&self) -> Option<&str> {
        self.benefits.as_deref()
    }

    pub fn call_to_action(&self) -> &str {
        &self.call_to_action
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Full text as delivered to the candidate: greeting, body, optional
    /// sections, then the call to action, separated by blank lines.
    pub fn compose(&self) -> String {
        [
            self.personalized_greeting.as_deref(),
            Some(self.body.as_str()),
            self.company_introduction.as_deref(),
            self.position_description.as_deref(),
            self.benefits.as_deref(),
            Some(self.call_to_action.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

/// Builder for [`ScoutMessage`]; validation happens in [`ScoutMessageBuilder::build`].
#[derive(Debug, Clone)]
pub struct ScoutMessageBuilder {
    subject: String,
    body: String,
    personalized_greeting: Option<String>,
    company_introduction: Option<String>,
    position_description: Option<String>,
    benefits: Option<String>,
    call_to_action: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl ScoutMessageBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn personalized_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.personalized_greeting = Some(greeting.into());
        self
    }

    pub fn company_introduction(mut self, intro: impl Into<String>) -> Self {
        self.company_introduction = Some(intro.into());
        self
    }

    pub fn position_description(mut self, description: impl Into<String>) -> Self {
        self.position_description = Some(description.into());
        self
    }

    pub fn benefits(mut self, benefits: impl Into<String>) -> Self {
        self.benefits = Some(benefits.into());
        self
    }

    pub fn call_to_action(mut self, call_to_action: impl Into<String>) -> Self {
        self.call_to_action = Some(call_to_action.into());
        self
    }

    pub fn build(self, now: DateTime<Utc>) -> DomainResult<ScoutMessage> {
        let subject = self.subject.trim().to_string();
        if subject.is_empty() {
            return Err(DomainError::validation("scout subject is required"));
        }

        let call_to_action = self
            .call_to_action
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CALL_TO_ACTION.to_string());

        Ok(ScoutMessage {
            subject,
            body: self.body.trim().to_string(),
            personalized_greeting: trimmed(self.personalized_greeting),
            company_introduction: trimmed(self.company_introduction),
            position_description: trimmed(self.position_description),
            benefits: trimmed(self.benefits),
            call_to_action,
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn blank_subject_is_rejected() {
        for subject in ["", "   ", "\t\n"] {
            let err = ScoutMessage::new(subject, "body", now()).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn text_fields_are_trimmed_and_absent_fields_stay_unset() {
        let message = ScoutMessage::builder("  Backend role  ", "\n Hello there \n")
            .benefits("  Remote first ")
            .build(now())
            .unwrap();

        assert_eq!(message.subject(), "Backend role");
        assert_eq!(message.body(), "Hello there");
        assert_eq!(message.benefits(), Some("Remote first"));
        assert_eq!(message.personalized_greeting(), None);
        assert_eq!(message.company_introduction(), None);
        assert_eq!(message.position_description(), None);
        assert_eq!(message.created_at(), now());
        assert_eq!(message.updated_at(), now());
    }

    #[test]
    fn call_to_action_defaults_when_missing_or_blank() {
        let defaulted = ScoutMessage::new("Subject", "Body", now()).unwrap();
        assert_eq!(defaulted.call_to_action(), DEFAULT_CALL_TO_ACTION);

        let blank = ScoutMessage::builder("Subject", "Body")
            .call_to_action("   ")
            .build(now())
            .unwrap();
        assert_eq!(blank.call_to_action(), DEFAULT_CALL_TO_ACTION);

        let custom = ScoutMessage::builder("Subject", "Body")
            .call_to_action(" Book a call ")
            .build(now())
            .unwrap();
        assert_eq!(custom.call_to_action(), "Book a call");
    }

    #[test]
    fn revise_produces_a_new_instance_and_keeps_created_at() {
        let original = ScoutMessage::new("Subject", "Body", now()).unwrap();
        let later = now() + Duration::hours(3);

        let revised = original.revise().subject("New subject").build(later).unwrap();

        assert_eq!(original.subject(), "Subject");
        assert_eq!(revised.subject(), "New subject");
        assert_eq!(revised.body(), "Body");
        assert_eq!(revised.created_at(), now());
        assert_eq!(revised.updated_at(), later);
    }

    #[test]
    fn revise_still_validates_subject() {
        let original = ScoutMessage::new("Subject", "Body", now()).unwrap();
        assert!(original.revise().subject(" ").build(now()).is_err());
    }

    #[test]
    fn compose_joins_present_sections_in_order() {
        let message = ScoutMessage::builder("Subject", "We saw your profile.")
            .personalized_greeting("Hi Sam,")
            .position_description("Senior Rust engineer")
            .call_to_action("Reply to chat.")
            .build(now())
            .unwrap();

        assert_eq!(
            message.compose(),
            "Hi Sam,\n\nWe saw your profile.\n\nSenior Rust engineer\n\nReply to chat."
        );
    }

    #[test]
    fn serde_round_trip_preserves_the_message() {
        let message = ScoutMessage::builder("Subject", "Body")
            .benefits("Remote")
            .build(now())
            .unwrap()
            .revise()
            .build(now() + Duration::days(1))
            .unwrap();

        let json = serde_json::to_string(&message).unwrap();
        let back: ScoutMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn deserializing_a_blank_subject_is_rejected() {
        let json = serde_json::json!({
            "subject": "   ",
            "body": "Body",
            "call_to_action": "Reply",
            "created_at": now(),
            "updated_at": now(),
        });
        let err = serde_json::from_value::<ScoutMessage>(json).unwrap_err();
        assert!(err.to_string().contains("scout subject is required"));
    }

    #[test]
    fn deserializing_normalizes_untrimmed_text() {
        let json = serde_json::json!({
            "subject": "  Subject ",
            "body": " Body ",
            "call_to_action": " ",
            "created_at": now(),
            "updated_at": now() + Duration::hours(1),
        });
        let message: ScoutMessage = serde_json::from_value(json).unwrap();
        assert_eq!(message.subject(), "Subject");
        assert_eq!(message.body(), "Body");
        assert_eq!(message.call_to_action(), DEFAULT_CALL_TO_ACTION);
        assert_eq!(message.created_at(), now());
        assert_eq!(message.updated_at(), now() + Duration::hours(1));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any subject with visible text survives construction trimmed.
        #[test]
        fn subject_is_always_trimmed_and_non_blank(
            pad_left in "[ \t]{0,4}",
            core in "[A-Za-z0-9][A-Za-z0-9 ]{0,40}[A-Za-z0-9]|[A-Za-z0-9]",
            pad_right in "[ \t]{0,4}",
        ) {
            let raw = format!("{pad_left}{core}{pad_right}");
            let message = ScoutMessage::new(raw, "", now()).unwrap();
            prop_assert_eq!(message.subject(), core.as_str());
            prop_assert!(!message.subject().trim().is_empty());
        }
    }
}
