//! Aggregate root trait for domain models that queue their own events.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// An aggregate mutates itself in place and records what happened in an
/// internal, append-only queue. The owning application service persists the new
/// state, dispatches the queued events, and only then clears the queue.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Event type recorded by this aggregate.
    type Event: Clone + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Bumped once per accepted mutation; used for optimistic concurrency at the
    /// persistence boundary.
    fn version(&self) -> u64;

    /// Snapshot (copy) of the events recorded since the last clear.
    fn domain_events(&self) -> Vec<Self::Event>;

    /// Forget all recorded events.
    fn clear_events(&mut self);

    /// Drain the recorded events, leaving the queue empty.
    fn take_events(&mut self) -> Vec<Self::Event> {
        let events = self.domain_events();
        self.clear_events();
        events
    }
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for first inserts, migrations, etc.).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
