use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scoutflow_core::{AggregateRoot, CandidateId, JobOfferId, RecruiterId, ScoutId};

use crate::error::{ScoutError, ScoutResult};
use crate::event::{ScoutCreated, ScoutEvent, ScoutStatusChanged};
use crate::expiration::ScoutExpiration;
use crate::message::ScoutMessage;
use crate::status::ScoutStatus;

/// Aggregate root: Scout.
///
/// Every mutator checks its precondition first and only then touches state, so
/// a rejected call leaves status, timestamps, version and the event queue
/// exactly as they were.
///
/// Equality is identity: two scouts are equal iff their ids match.
#[derive(Debug, Clone)]
pub struct Scout {
    id: ScoutId,
    recruiter_id: RecruiterId,
    candidate_id: CandidateId,
    job_offer_id: JobOfferId,
    message: ScoutMessage,
    status: ScoutStatus,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
    responded_at: Option<DateTime<Utc>>,
    extension_count: u32,
    version: u64,
    events: Vec<ScoutEvent>,
}

/// Persisted form of a scout (everything except the pending event queue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutSnapshot {
    pub id: ScoutId,
    pub recruiter_id: RecruiterId,
    pub candidate_id: CandidateId,
    pub job_offer_id: JobOfferId,
    pub message: ScoutMessage,
    pub status: ScoutStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub extension_count: u32,
    pub version: u64,
}

impl Scout {
    /// Create a new draft scout.
    ///
    /// The expiry is computed from `now` using `expiration_policy`, and a single
    /// `ScoutCreated` event is queued.
    pub fn create(
        recruiter_id: RecruiterId,
        candidate_id: CandidateId,
        job_offer_id: JobOfferId,
        message: ScoutMessage,
        expiration_policy: &ScoutExpiration,
        now: DateTime<Utc>,
    ) -> Self {
        let id = ScoutId::generate();

        let mut scout = Self {
            id: id.clone(),
            recruiter_id: recruiter_id.clone(),
            candidate_id,
            job_offer_id,
            message,
            status: ScoutStatus::Draft,
            created_at: now,
            expires_at: expiration_policy.calculate_expiration_date(now),
            read_at: None,
            responded_at: None,
            extension_count: 0,
            version: 0,
            events: Vec::new(),
        };

        scout.record(ScoutEvent::ScoutCreated(ScoutCreated {
            scout_id: id,
            recruiter_id,
            candidate_id,
            job_offer_id,
            occurred_at: now,
        }));

        tracing::debug!(scout_id = %scout.id, expires_at = %scout.expires_at, "scout created");
        scout
    }

    /// Rebuild from storage. The input is trusted; nothing is re-validated and
    /// the event queue starts empty.
    pub fn reconstitute(snapshot: ScoutSnapshot) -> Self {
        Self {
            id: snapshot.id,
            recruiter_id: snapshot.recruiter_id,
            candidate_id: snapshot.candidate_id,
            job_offer_id: snapshot.job_offer_id,
            message: snapshot.message,
            status: snapshot.status,
            created_at: snapshot.created_at,
            expires_at: snapshot.expires_at,
            read_at: snapshot.read_at,
            responded_at: snapshot.responded_at,
            extension_count: snapshot.extension_count,
            version: snapshot.version,
            events: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> ScoutSnapshot {
        ScoutSnapshot {
            id: self.id.clone(),
            recruiter_id: self.recruiter_id.clone(),
            candidate_id: self.candidate_id,
            job_offer_id: self.job_offer_id,
            message: self.message.clone(),
            status: self.status,
            created_at: self.created_at,
            expires_at: self.expires_at,
            read_at: self.read_at,
            responded_at: self.responded_at,
            extension_count: self.extension_count,
            version: self.version,
        }
    }

    pub fn scout_id(&self) -> &ScoutId {
        &self.id
    }

    pub fn recruiter_id(&self) -> &RecruiterId {
        &self.recruiter_id
    }

    pub fn candidate_id(&self) -> CandidateId {
        self.candidate_id
    }

    pub fn job_offer_id(&self) -> JobOfferId {
        self.job_offer_id
    }

    pub fn status(&self) -> ScoutStatus {
        self.status
    }

    pub fn message(&self) -> &ScoutMessage {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Number of extensions applied so far.
    pub fn extension_count(&self) -> u32 {
        self.extension_count
    }

    /// Strictly after `expires_at`. Recomputed on every call; no status is
    /// ever set to `Expired` by this check.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the scout is in the "expiring soon" window of `policy`.
    pub fn is_in_warning_period(&self, policy: &ScoutExpiration, now: DateTime<Utc>) -> bool {
        policy.is_in_warning_period(self.expires_at, now)
    }

    /// DRAFT → SENT.
    pub fn send(&mut self, now: DateTime<Utc>) -> ScoutResult<&mut Self> {
        self.ensure_status(&[ScoutStatus::Draft], "only draft scouts can be sent")?;

        self.transition_to(ScoutStatus::Sent, now);
        Ok(self)
    }

    /// SENT → READ, stamping `read_at`.
    pub fn mark_as_read(&mut self, now: DateTime<Utc>) -> ScoutResult<&mut Self> {
        self.ensure_status(&[ScoutStatus::Sent], "only sent scouts can be marked as read")?;
        self.ensure_not_expired(now, "an expired scout cannot be marked as read")?;

        self.read_at = Some(now);
        self.transition_to(ScoutStatus::Read, now);
        Ok(self)
    }

    /// READ → RESPONDED, stamping `responded_at`.
    pub fn respond(&mut self, now: DateTime<Utc>) -> ScoutResult<&mut Self> {
        self.ensure_status(&[ScoutStatus::Read], "only read scouts can be responded to")?;
        self.ensure_not_expired(now, "an expired scout cannot be responded to")?;

        self.responded_at = Some(now);
        self.transition_to(ScoutStatus::Responded, now);
        Ok(self)
    }

    /// READ → DECLINED, stamping `responded_at`.
    pub fn decline(&mut self, now: DateTime<Utc>) -> ScoutResult<&mut Self> {
        self.ensure_status(&[ScoutStatus::Read], "only read scouts can be declined")?;
        self.ensure_not_expired(now, "an expired scout cannot be declined")?;

        self.responded_at = Some(now);
        self.transition_to(ScoutStatus::Declined, now);
        Ok(self)
    }

    /// DRAFT | SENT → CANCELLED.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> ScoutResult<&mut Self> {
        self.ensure_status(
            &[ScoutStatus::Draft, ScoutStatus::Sent],
            "only draft or sent scouts can be cancelled",
        )?;

        self.transition_to(ScoutStatus::Cancelled, now);
        Ok(self)
    }

    /// CANCELLED (or any expired scout) → DELETED.
    pub fn delete(&mut self, now: DateTime<Utc>) -> ScoutResult<&mut Self> {
        if self.status == ScoutStatus::Deleted {
            return Err(self.reject("scout is already deleted"));
        }
        if self.status != ScoutStatus::Cancelled && !self.is_expired(now) {
            return Err(self.reject("only cancelled or expired scouts can be deleted"));
        }

        self.transition_to(ScoutStatus::Deleted, now);
        Ok(self)
    }

    /// Replace the message while still a draft. No event is recorded.
    pub fn update_message(&mut self, message: ScoutMessage) -> ScoutResult<&mut Self> {
        self.ensure_status(&[ScoutStatus::Draft], "the message can only change while in draft")?;

        self.message = message;
        self.version += 1;
        tracing::debug!(scout_id = %self.id, "scout message updated");
        Ok(self)
    }

    /// Push the expiry to `policy.calculate_expiration_date(now)`.
    ///
    /// Only SENT, unexpired scouts whose policy still allows an extension
    /// qualify. If the recomputed expiry is not strictly later than the current
    /// one, nothing changes and the call still succeeds.
    pub fn extend_expiration(
        &mut self,
        policy: &ScoutExpiration,
        now: DateTime<Utc>,
    ) -> ScoutResult<&mut Self> {
        self.ensure_status(&[ScoutStatus::Sent], "only sent scouts can be extended")?;
        self.ensure_not_expired(now, "an expired scout cannot be extended")?;
        if !policy.can_extend(self.extension_count) {
            return Err(self.reject(format!(
                "expiration policy {} allows no further extension ({} used)",
                policy.expiration_type(),
                self.extension_count
            )));
        }

        let new_expiry = policy.calculate_expiration_date(now);
        if new_expiry > self.expires_at {
            tracing::debug!(
                scout_id = %self.id,
                from = %self.expires_at,
                to = %new_expiry,
                "scout expiration extended"
            );
            self.expires_at = new_expiry;
            self.extension_count += 1;
            self.version += 1;
        } else {
            tracing::debug!(scout_id = %self.id, "extension would not move expiry later; ignored");
        }
        Ok(self)
    }

    fn ensure_status(&self, allowed: &[ScoutStatus], reason: &str) -> ScoutResult<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(self.reject(reason))
        }
    }

    fn ensure_not_expired(&self, now: DateTime<Utc>, reason: &str) -> ScoutResult<()> {
        if self.is_expired(now) {
            Err(self.reject(reason))
        } else {
            Ok(())
        }
    }

    fn reject(&self, reason: impl Into<String>) -> ScoutError {
        let err = ScoutError::rule(self.status, reason);
        tracing::debug!(scout_id = %self.id, error = %err, "scout transition rejected");
        err
    }

    fn transition_to(&mut self, new_status: ScoutStatus, now: DateTime<Utc>) {
        let old_status = self.status;
        self.status = new_status;
        self.record(ScoutEvent::ScoutStatusChanged(ScoutStatusChanged {
            scout_id: self.id.clone(),
            old_status,
            new_status,
            occurred_at: now,
        }));
        tracing::debug!(scout_id = %self.id, from = %old_status, to = %new_status, "scout status changed");
    }

    fn record(&mut self, event: ScoutEvent) {
        self.events.push(event);
        self.version += 1;
    }
}

impl AggregateRoot for Scout {
    type Id = ScoutId;
    type Event = ScoutEvent;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn domain_events(&self) -> Vec<Self::Event> {
        self.events.clone()
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }

    fn take_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.events)
    }
}

impl PartialEq for Scout {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Scout {}

impl core::hash::Hash for Scout {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
