//! Events recorded by the scout aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scoutflow_core::{CandidateId, JobOfferId, RecruiterId, ScoutId};
use scoutflow_events::Event;

use crate::status::ScoutStatus;

/// Event: ScoutCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutCreated {
    pub scout_id: ScoutId,
    pub recruiter_id: RecruiterId,
    pub candidate_id: CandidateId,
    pub job_offer_id: JobOfferId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ScoutStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutStatusChanged {
    pub scout_id: ScoutId,
    pub old_status: ScoutStatus,
    pub new_status: ScoutStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ScoutEvent {
    ScoutCreated(ScoutCreated),
    ScoutStatusChanged(ScoutStatusChanged),
}

impl ScoutEvent {
    pub fn scout_id(&self) -> &ScoutId {
        match self {
            ScoutEvent::ScoutCreated(e) => &e.scout_id,
            ScoutEvent::ScoutStatusChanged(e) => &e.scout_id,
        }
    }
}

impl Event for ScoutEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ScoutEvent::ScoutCreated(_) => "scouting.scout.created",
            ScoutEvent::ScoutStatusChanged(_) => "scouting.scout.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ScoutEvent::ScoutCreated(e) => e.occurred_at,
            ScoutEvent::ScoutStatusChanged(e) => e.occurred_at,
        }
    }
}
