use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// Envelope for a dispatched event, carrying stream metadata.
///
/// Built by the application service after the aggregate has been persisted:
/// - `aggregate_id` is the textual id of the emitting aggregate (scout ids are
///   not UUIDs, so this is kept as a string).
/// - `sequence_number` is the aggregate version the event brought it to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    aggregate_id: String,
    aggregate_type: String,

    /// Monotonically increasing position in the aggregate stream.
    sequence_number: u64,

    event_type: String,
    occurred_at: DateTime<Utc>,

    payload: E,
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap `payload` with a fresh event id; type and timestamp come from the event.
    pub fn wrap(
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            sequence_number,
            event_type: payload.event_type().to_string(),
            occurred_at: payload.occurred_at(),
            payload,
        }
    }
}

impl<E> EventEnvelope<E> {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Pinged {
        at: DateTime<Utc>,
    }

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn wrap_copies_event_metadata() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let envelope = EventEnvelope::wrap("SCT-1", "scout", 7, Pinged { at });

        assert_eq!(envelope.aggregate_id(), "SCT-1");
        assert_eq!(envelope.aggregate_type(), "scout");
        assert_eq!(envelope.sequence_number(), 7);
        assert_eq!(envelope.event_type(), "test.pinged");
        assert_eq!(envelope.occurred_at(), at);
        assert_eq!(envelope.into_payload(), Pinged { at });
    }

    #[test]
    fn each_envelope_gets_its_own_id() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let a = EventEnvelope::wrap("SCT-1", "scout", 1, Pinged { at });
        let b = EventEnvelope::wrap("SCT-1", "scout", 1, Pinged { at });
        assert_ne!(a.event_id(), b.event_id());
    }
}
