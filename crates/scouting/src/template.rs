//! Reusable scout message templates.
//!
//! Templates are never hard-deleted; they are deactivated. Text templates may
//! contain `{{placeholder}}` markers filled in by [`ScoutTemplate::render`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use scoutflow_core::{CompanyId, DomainError, DomainResult, Entity, RecruiterId, TemplateId};

use crate::message::{DEFAULT_CALL_TO_ACTION, ScoutMessage};

/// `{{ key }}` marker; surrounding whitespace inside the braces is ignored.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder pattern is valid")
});

/// Template category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    General,
    Engineering,
    Sales,
    Executive,
    NewGraduate,
    Internship,
}

/// Text templates for each message section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContent {
    pub subject: String,
    pub body: String,
    pub personalized_greeting: Option<String>,
    pub company_introduction: Option<String>,
    pub position_description: Option<String>,
    pub benefits: Option<String>,
    pub call_to_action: Option<String>,
}

impl TemplateContent {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            personalized_greeting: None,
            company_introduction: None,
            position_description: None,
            benefits: None,
            call_to_action: None,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.subject.trim().is_empty() {
            return Err(DomainError::validation("template subject is required"));
        }
        Ok(())
    }
}

/// Entity: ScoutTemplate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutTemplate {
    id: TemplateId,
    company_id: CompanyId,
    created_by: RecruiterId,
    name: String,
    description: String,
    category: TemplateCategory,
    subject_template: String,
    body_template: String,
    personalized_greeting_template: Option<String>,
    company_introduction_template: Option<String>,
    position_description_template: Option<String>,
    benefits_template: Option<String>,
    call_to_action_template: String,
    is_active: bool,
    is_shared: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    usage_count: u64,
    /// Fraction of uses that led to a positive response, within 0.0..=1.0.
    success_rate: f64,
}

impl ScoutTemplate {
    /// New active, unshared template with no usage history.
    pub fn create(
        company_id: CompanyId,
        created_by: RecruiterId,
        name: impl Into<String>,
        description: impl Into<String>,
        category: TemplateCategory,
        content: TemplateContent,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = validated_name(name.into())?;
        content.validate()?;

        let mut template = Self {
            id: TemplateId::new(),
            company_id,
            created_by,
            name,
            description: description.into().trim().to_string(),
            category,
            subject_template: String::new(),
            body_template: String::new(),
            personalized_greeting_template: None,
            company_introduction_template: None,
            position_description_template: None,
            benefits_template: None,
            call_to_action_template: String::new(),
            is_active: true,
            is_shared: false,
            created_at: now,
            updated_at: now,
            usage_count: 0,
            success_rate: 0.0,
        };
        template.apply_content(content);
        Ok(template)
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn created_by(&self) -> &RecruiterId {
        &self.created_by
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> TemplateCategory {
        self.category
    }

    pub fn subject_template(&self) -> &str {
        &self.subject_template
    }

    pub fn body_template(&self) -> &str {
        &self.body_template
    }

    pub fn call_to_action_template(&self) -> &str {
        &self.call_to_action_template
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_shared(&self) -> bool {
        self.is_shared
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn usage_count(&self) -> u64 {
        self.usage_count
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        category: TemplateCategory,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_active()?;
        let name = validated_name(name.into())?;

        self.name = name;
        self.description = description.into().trim().to_string();
        self.category = category;
        self.updated_at = now;
        Ok(())
    }

    pub fn update_content(&mut self, content: TemplateContent, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;
        content.validate()?;

        self.apply_content(content);
        self.updated_at = now;
        Ok(())
    }

    pub fn activate(&mut self, now: DateTime<Utc>) {
        if !self.is_active {
            self.is_active = true;
            self.updated_at = now;
        }
    }

    /// Soft delete. Deactivation also withdraws sharing.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        if self.is_active {
            self.is_active = false;
            self.is_shared = false;
            self.updated_at = now;
        }
    }

    /// Make the template visible to the rest of the company.
    pub fn share(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;
        self.is_shared = true;
        self.updated_at = now;
        Ok(())
    }

    pub fn unshare(&mut self, now: DateTime<Utc>) {
        self.is_shared = false;
        self.updated_at = now;
    }

    /// Count one use; `success` means the resulting scout got a positive reply.
    pub fn record_usage(&mut self, success: bool, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;

        let successes = self.success_rate * self.usage_count as f64 + f64::from(u8::from(success));
        self.usage_count += 1;
        self.success_rate = (successes / self.usage_count as f64).clamp(0.0, 1.0);
        self.updated_at = now;
        Ok(())
    }

    /// Fill every `{{key}}` marker from `values` and build a message.
    ///
    /// Markers without a value are left in place. Inactive templates refuse.
    pub fn render(
        &self,
        values: &BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> DomainResult<ScoutMessage> {
        self.ensure_active()?;

        let fill = |text: &str| render_placeholders(text, values);
        let mut builder = ScoutMessage::builder(fill(&self.subject_template), fill(&self.body_template))
            .call_to_action(fill(&self.call_to_action_template));

        if let Some(t) = &self.personalized_greeting_template {
            builder = builder.personalized_greeting(fill(t));
        }
        if let Some(t) = &self.company_introduction_template {
            builder = builder.company_introduction(fill(t));
        }
        if let Some(t) = &self.position_description_template {
            builder = builder.position_description(fill(t));
        }
        if let Some(t) = &self.benefits_template {
            builder = builder.benefits(fill(t));
        }

        builder.build(now)
    }

    fn apply_content(&mut self, content: TemplateContent) {
        self.subject_template = content.subject.trim().to_string();
        self.body_template = content.body.trim().to_string();
        self.personalized_greeting_template = content.personalized_greeting;
        self.company_introduction_template = content.company_introduction;
        self.position_description_template = content.position_description;
        self.benefits_template = content.benefits;
        self.call_to_action_template = content
            .call_to_action
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CALL_TO_ACTION.to_string());
    }

    fn ensure_active(&self) -> DomainResult<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::invariant(format!(
                "template {} is inactive",
                self.id
            )))
        }
    }
}

impl Entity for ScoutTemplate {
    type Id = TemplateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl PartialEq for ScoutTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

fn validated_name(name: String) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("template name is required"));
    }
    Ok(name.to_string())
}

fn render_placeholders(text: &str, values: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
    }

    fn content() -> TemplateContent {
        TemplateContent {
            subject: "{{position}} at {{company}}".to_string(),
            body: "We were impressed by your work on {{project}}.".to_string(),
            personalized_greeting: Some("Hello {{ name }},".to_string()),
            company_introduction: None,
            position_description: None,
            benefits: Some("Flexible hours".to_string()),
            call_to_action: None,
        }
    }

    fn template() -> ScoutTemplate {
        ScoutTemplate::create(
            CompanyId::new(),
            RecruiterId::generate(),
            "  Engineering outreach ",
            "Default engineering scout",
            TemplateCategory::Engineering,
            content(),
            t0(),
        )
        .unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn create_starts_active_unshared_and_unused() {
        let template = template();
        assert_eq!(template.name(), "Engineering outreach");
        assert!(template.is_active());
        assert!(!template.is_shared());
        assert_eq!(template.usage_count(), 0);
        assert_eq!(template.success_rate(), 0.0);
        assert_eq!(template.call_to_action_template(), DEFAULT_CALL_TO_ACTION);
    }

    #[test]
    fn create_requires_name_and_subject() {
        let blank_name = ScoutTemplate::create(
            CompanyId::new(),
            RecruiterId::generate(),
            " ",
            "",
            TemplateCategory::General,
            content(),
            t0(),
        );
        assert!(matches!(blank_name, Err(DomainError::Validation(_))));

        let blank_subject = ScoutTemplate::create(
            CompanyId::new(),
            RecruiterId::generate(),
            "Name",
            "",
            TemplateCategory::General,
            TemplateContent::new("  ", "body"),
            t0(),
        );
        assert!(matches!(blank_subject, Err(DomainError::Validation(_))));
    }

    #[test]
    fn render_fills_known_placeholders() {
        let message = template()
            .render(
                &values(&[
                    ("position", "Rust engineer"),
                    ("company", "Acme"),
                    ("name", "Kim"),
                ]),
                t0(),
            )
            .unwrap();

        assert_eq!(message.subject(), "Rust engineer at Acme");
        assert_eq!(message.personalized_greeting(), Some("Hello Kim,"));
        // Unknown markers survive untouched.
        assert_eq!(message.body(), "We were impressed by your work on {{project}}.");
        assert_eq!(message.benefits(), Some("Flexible hours"));
        assert_eq!(message.call_to_action(), DEFAULT_CALL_TO_ACTION);
    }

    #[test]
    fn render_fails_when_subject_renders_blank() {
        let mut template = template();
        template
            .update_content(TemplateContent::new("{{subject}}", "body"), t0())
            .unwrap();
        assert!(template.render(&values(&[("subject", "   ")]), t0()).is_err());
    }

    #[test]
    fn unterminated_marker_is_kept_verbatim() {
        assert_eq!(
            render_placeholders("Hi {{name", &values(&[("name", "x")])),
            "Hi {{name"
        );
    }

    #[test]
    fn repeated_and_padded_markers_are_all_filled() {
        assert_eq!(
            render_placeholders(
                "{{name}} / {{  name  }} / {{other}} / {{}}",
                &values(&[("name", "Kim")])
            ),
            "Kim / Kim / {{other}} / {{}}"
        );
    }

    #[test]
    fn inactive_template_refuses_edits_usage_and_rendering() {
        let mut template = template();
        template.share(t0()).unwrap();
        template.deactivate(t0() + Duration::days(1));
        assert!(!template.is_active());
        assert!(!template.is_shared());

        assert!(matches!(
            template.record_usage(true, t0()),
            Err(DomainError::InvariantViolation(_))
        ));
        assert!(template.share(t0()).is_err());
        assert!(template.update_content(content(), t0()).is_err());
        assert!(
            template
                .update_details("x", "y", TemplateCategory::Sales, t0())
                .is_err()
        );
        assert!(template.render(&BTreeMap::new(), t0()).is_err());

        template.activate(t0() + Duration::days(2));
        assert!(template.record_usage(false, t0()).is_ok());
        assert_eq!(template.updated_at(), t0());
    }

    #[test]
    fn usage_tracks_running_success_rate() {
        let mut template = template();
        template.record_usage(true, t0()).unwrap();
        template.record_usage(false, t0()).unwrap();
        template.record_usage(true, t0()).unwrap();
        template.record_usage(true, t0()).unwrap();

        assert_eq!(template.usage_count(), 4);
        assert!((template.success_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn update_details_touches_timestamp() {
        let mut template = template();
        let later = t0() + Duration::hours(5);
        template
            .update_details("Sales outreach", " For AE roles ", TemplateCategory::Sales, later)
            .unwrap();
        assert_eq!(template.name(), "Sales outreach");
        assert_eq!(template.description(), "For AE roles");
        assert_eq!(template.category(), TemplateCategory::Sales);
        assert_eq!(template.updated_at(), later);
        assert_eq!(template.created_at(), t0());
    }

    #[test]
    fn templates_are_equal_by_identity() {
        let a = template();
        let mut b = a.clone();
        b.record_usage(true, t0()).unwrap();
        assert_eq!(a, b);
        assert!(a.same_identity_as(&b));
        assert_ne!(a, template());
    }
}
