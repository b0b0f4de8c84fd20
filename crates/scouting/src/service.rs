//! Application service: one unit of work per scout operation.
//!
//! Each use case loads the aggregate, runs exactly one transition, persists the
//! new state under an optimistic version check, then drains the queued events
//! onto the bus. Envelopes the bus refuses travel back in
//! [`ServiceError::Publish`] so nothing stored goes unannounced.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use scoutflow_core::{
    AggregateRoot, CandidateId, Clock, ExpectedVersion, JobOfferId, RecruiterId, ScoutId,
};
use scoutflow_events::{EventBus, EventEnvelope};

use crate::config::ScoutingConfig;
use crate::error::{ScoutError, ScoutResult};
use crate::event::ScoutEvent;
use crate::expiration::ScoutExpiration;
use crate::message::ScoutMessage;
use crate::scout::{Scout, ScoutSnapshot};

/// Aggregate type name stamped on envelopes.
pub const SCOUT_AGGREGATE_TYPE: &str = "scout";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored version differs from the one the caller loaded.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    #[error("repository lock poisoned")]
    Poisoned,
}

/// Persistence port for scouts.
pub trait ScoutRepository: Send + Sync {
    fn load(&self, id: &ScoutId) -> Result<Option<Scout>, RepositoryError>;

    /// Store `scout` if the currently stored version matches `expected`
    /// (a scout that was never stored counts as version 0).
    fn save(&self, scout: &Scout, expected: ExpectedVersion) -> Result<(), RepositoryError>;
}

/// In-memory repository.
///
/// Intended for tests/dev. Stores snapshots, so pending events never leak
/// into storage.
#[derive(Debug, Default)]
pub struct InMemoryScoutRepository {
    scouts: RwLock<HashMap<ScoutId, ScoutSnapshot>>,
}

impl InMemoryScoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scouts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoutRepository for InMemoryScoutRepository {
    fn load(&self, id: &ScoutId) -> Result<Option<Scout>, RepositoryError> {
        let scouts = self.scouts.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(scouts.get(id).cloned().map(Scout::reconstitute))
    }

    fn save(&self, scout: &Scout, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut scouts = self.scouts.write().map_err(|_| RepositoryError::Poisoned)?;

        let current = scouts.get(scout.scout_id()).map(|s| s.version).unwrap_or(0);
        expected
            .check(current)
            .map_err(|e| RepositoryError::Concurrency(e.to_string()))?;

        scouts.insert(scout.scout_id().clone(), scout.snapshot());
        Ok(())
    }
}

impl<R> ScoutRepository for Arc<R>
where
    R: ScoutRepository + ?Sized,
{
    fn load(&self, id: &ScoutId) -> Result<Option<Scout>, RepositoryError> {
        (**self).load(id)
    }

    fn save(&self, scout: &Scout, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).save(scout, expected)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Scout(#[from] ScoutError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("scout not found: {0}")]
    NotFound(ScoutId),

    /// State was persisted but some events could not be published. `pending`
    /// holds every envelope not yet delivered, in order; hand them back to
    /// [`ScoutService::publish_pending`] once the bus recovers.
    #[error("event publication failed for scout {scout_id}: {reason}")]
    Publish {
        scout_id: ScoutId,
        pending: Vec<EventEnvelope<ScoutEvent>>,
        reason: String,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Scout use cases over a repository, an event bus, and a clock.
pub struct ScoutService<R, B> {
    repository: R,
    bus: B,
    clock: Arc<dyn Clock>,
    config: ScoutingConfig,
}

impl<R, B> ScoutService<R, B>
where
    R: ScoutRepository,
    B: EventBus<EventEnvelope<ScoutEvent>>,
{
    pub fn new(repository: R, bus: B, clock: Arc<dyn Clock>, config: ScoutingConfig) -> Self {
        Self {
            repository,
            bus,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ScoutingConfig {
        &self.config
    }

    /// Create and store a draft scout. Without a policy, the configured
    /// default applies.
    #[tracing::instrument(skip_all, fields(recruiter_id = %recruiter_id))]
    pub fn create_scout(
        &self,
        recruiter_id: RecruiterId,
        candidate_id: CandidateId,
        job_offer_id: JobOfferId,
        message: ScoutMessage,
        policy: Option<&ScoutExpiration>,
    ) -> ServiceResult<Scout> {
        let default_policy;
        let policy = match policy {
            Some(p) => p,
            None => {
                default_policy = self.config.default_policy();
                &default_policy
            }
        };

        let mut scout = Scout::create(
            recruiter_id,
            candidate_id,
            job_offer_id,
            message,
            policy,
            self.clock.now(),
        );
        self.commit(&mut scout, ExpectedVersion::Exact(0))?;

        tracing::info!(scout_id = %scout.scout_id(), "scout created");
        Ok(scout)
    }

    pub fn get(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.repository
            .load(id)?
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    #[tracing::instrument(skip(self), fields(scout_id = %id))]
    pub fn send(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.execute(id, |scout, now| scout.send(now).map(drop))
    }

    #[tracing::instrument(skip(self), fields(scout_id = %id))]
    pub fn mark_as_read(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.execute(id, |scout, now| scout.mark_as_read(now).map(drop))
    }

    #[tracing::instrument(skip(self), fields(scout_id = %id))]
    pub fn respond(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.execute(id, |scout, now| scout.respond(now).map(drop))
    }

    #[tracing::instrument(skip(self), fields(scout_id = %id))]
    pub fn decline(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.execute(id, |scout, now| scout.decline(now).map(drop))
    }

    #[tracing::instrument(skip(self), fields(scout_id = %id))]
    pub fn cancel(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.execute(id, |scout, now| scout.cancel(now).map(drop))
    }

    #[tracing::instrument(skip(self), fields(scout_id = %id))]
    pub fn delete(&self, id: &ScoutId) -> ServiceResult<Scout> {
        self.execute(id, |scout, now| scout.delete(now).map(drop))
    }

    #[tracing::instrument(skip(self, message), fields(scout_id = %id))]
    pub fn update_message(&self, id: &ScoutId, message: ScoutMessage) -> ServiceResult<Scout> {
        self.execute(id, |scout, _| scout.update_message(message).map(drop))
    }

    #[tracing::instrument(skip(self, policy), fields(scout_id = %id))]
    pub fn extend_expiration(
        &self,
        id: &ScoutId,
        policy: Option<&ScoutExpiration>,
    ) -> ServiceResult<Scout> {
        let policy = policy.cloned().unwrap_or_else(|| self.config.default_policy());
        self.execute(id, |scout, now| scout.extend_expiration(&policy, now).map(drop))
    }

    fn execute<F>(&self, id: &ScoutId, op: F) -> ServiceResult<Scout>
    where
        F: FnOnce(&mut Scout, DateTime<Utc>) -> ScoutResult<()>,
    {
        let mut scout = self.get(id)?;
        let expected = ExpectedVersion::Exact(scout.version());

        op(&mut scout, self.clock.now())?;
        self.commit(&mut scout, expected)?;
        Ok(scout)
    }

    /// Retry envelopes left over from a failed publication.
    #[tracing::instrument(skip_all, fields(scout_id = %scout_id, pending = pending.len()))]
    pub fn publish_pending(
        &self,
        scout_id: &ScoutId,
        pending: Vec<EventEnvelope<ScoutEvent>>,
    ) -> ServiceResult<()> {
        self.publish_all(scout_id, pending)
    }

    /// Persist, then drain the queue onto the bus. Envelopes the bus refuses
    /// are returned in the error.
    fn commit(&self, scout: &mut Scout, expected: ExpectedVersion) -> ServiceResult<()> {
        self.repository.save(scout, expected)?;

        let events = scout.take_events();
        let count = events.len() as u64;
        let envelopes = events
            .into_iter()
            .enumerate()
            .map(|(idx, event)| {
                let sequence_number = (scout.version() + 1 + idx as u64).saturating_sub(count);
                EventEnvelope::wrap(
                    scout.scout_id().value(),
                    SCOUT_AGGREGATE_TYPE,
                    sequence_number,
                    event,
                )
            })
            .collect();

        self.publish_all(scout.scout_id(), envelopes)?;
        tracing::debug!(scout_id = %scout.scout_id(), published = count, "scout committed");
        Ok(())
    }

    fn publish_all(
        &self,
        scout_id: &ScoutId,
        envelopes: Vec<EventEnvelope<ScoutEvent>>,
    ) -> ServiceResult<()> {
        let mut remaining = envelopes.into_iter();
        while let Some(envelope) = remaining.next() {
            if let Err(e) = self.bus.publish(envelope.clone()) {
                tracing::error!(scout_id = %scout_id, error = %e, "event publication failed");
                let pending = std::iter::once(envelope).chain(remaining).collect();
                return Err(ServiceError::Publish {
                    scout_id: scout_id.clone(),
                    pending,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }
}
