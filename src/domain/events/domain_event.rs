//! # Domain Event Trait
//!
//! Base trait for events emitted by a quote session.
//!
//! Events are immutable records of what happened. The engine hands them to
//! a sink and never reads them back.

use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{EventId, ServiceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for all domain events.
///
/// # Required Methods
///
/// - [`event_id`](DomainEvent::event_id) - Unique identifier for this event
/// - [`service_id`](DomainEvent::service_id) - The service this event relates to
/// - [`timestamp`](DomainEvent::timestamp) - When the event occurred
/// - [`event_name`](DomainEvent::event_name) - Human-readable event name
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the unique identifier for this event.
    fn event_id(&self) -> EventId;

    /// Returns the service this event relates to.
    fn service_id(&self) -> &ServiceId;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Timestamp;

    /// Returns the human-readable name of this event.
    fn event_name(&self) -> &'static str;
}

/// Common metadata for all domain events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The service this event relates to.
    pub service_id: ServiceId,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates new event metadata with a generated event ID.
    #[must_use]
    pub fn new(service_id: ServiceId) -> Self {
        Self {
            event_id: EventId::new_v4(),
            service_id,
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn event_metadata_new() {
        let metadata = EventMetadata::new(ServiceId::new("drain_service"));
        assert_eq!(metadata.service_id.as_str(), "drain_service");
        assert!(metadata.timestamp.timestamp_millis() > 0);
    }

    #[test]
    fn event_metadata_serde_roundtrip() {
        let metadata = EventMetadata::new(ServiceId::new("window_cleaning"));
        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"eventId\""));
        let deserialized: EventMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, deserialized);
    }
}
