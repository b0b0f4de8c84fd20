//! Scouting domain module.
//!
//! Recruiters send *scouts* (job-offer messages) to candidates. This crate holds
//! the scout aggregate and its status state machine, the expiration policy,
//! message and template types, and the application service that drives one
//! transition per unit of work. Domain logic here is deterministic: every
//! operation receives `now` from the caller.

pub mod config;
pub mod error;
pub mod event;
pub mod expiration;
pub mod message;
pub mod scout;
pub mod service;
pub mod status;
pub mod template;

pub use config::ScoutingConfig;
pub use error::{ScoutError, ScoutResult};
pub use event::{ScoutCreated, ScoutEvent, ScoutStatusChanged};
pub use expiration::{DurationUnit, ExpirationType, ScoutExpiration};
pub use message::{DEFAULT_CALL_TO_ACTION, ScoutMessage, ScoutMessageBuilder};
pub use scout::{Scout, ScoutSnapshot};
pub use service::{
    InMemoryScoutRepository, RepositoryError, ScoutRepository, ScoutService, ServiceError,
    ServiceResult,
};
pub use status::ScoutStatus;
pub use template::{ScoutTemplate, TemplateCategory, TemplateContent};

pub use scoutflow_core::{AggregateRoot, ScoutId, RecruiterId};
