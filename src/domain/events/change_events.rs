//! # Change Events
//!
//! Audit records of user overrides of price-relevant values.
//!
//! A [`ChangeRecord`] is emitted by the quote session whenever a tracked
//! numeric field receives a value different from the one in effect
//! immediately before the edit. Records are handed to a change sink and are
//! not retained by the engine.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::AreaField;
//! use service_quote::domain::events::ChangeRecord;
//! use service_quote::domain::value_objects::{AreaKey, ServiceId};
//! use rust_decimal::Decimal;
//!
//! let record = ChangeRecord::for_area_field(
//!     ServiceId::new("power_washing"),
//!     AreaKey::new("dumpster"),
//!     AreaField::WorkerRate,
//!     Decimal::from(200),
//!     Decimal::from(240),
//! );
//! assert_eq!(record.field_display_name, "Worker Rate");
//! ```

use crate::domain::entities::area_state::AreaField;
use crate::domain::events::domain_event::{DomainEvent, EventMetadata};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{AreaKey, EventId, Frequency, ServiceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Field name used for contract-length edits.
pub const CONTRACT_MONTHS_FIELD: &str = "contractMonths";

/// One user override of a price-relevant value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Event metadata.
    #[serde(flatten)]
    pub metadata: EventMetadata,
    /// Area the field belongs to; `None` for quote-level fields.
    pub area_key: Option<AreaKey>,
    /// Machine field name.
    pub field_name: String,
    /// Human-readable field name.
    pub field_display_name: String,
    /// Value in effect before the edit.
    pub original_value: Decimal,
    /// Value in effect after the edit.
    pub new_value: Decimal,
    /// Per-unit context: the quantity driving the area's strategy.
    pub quantity: Option<Decimal>,
    /// Visit frequency in effect.
    pub frequency: Option<Frequency>,
}

impl ChangeRecord {
    /// Creates a record for an area field edit.
    #[must_use]
    pub fn for_area_field(
        service_id: ServiceId,
        area_key: AreaKey,
        field: AreaField,
        original_value: Decimal,
        new_value: Decimal,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(service_id),
            area_key: Some(area_key),
            field_name: field.key().to_string(),
            field_display_name: field.display_name().to_string(),
            original_value,
            new_value,
            quantity: None,
            frequency: None,
        }
    }

    /// Creates a record for a contract-length edit.
    #[must_use]
    pub fn for_contract_months(service_id: ServiceId, original: u32, new: u32) -> Self {
        Self {
            metadata: EventMetadata::new(service_id),
            area_key: None,
            field_name: CONTRACT_MONTHS_FIELD.to_string(),
            field_display_name: "Contract Months".to_string(),
            original_value: Decimal::from(original),
            new_value: Decimal::from(new),
            quantity: None,
            frequency: None,
        }
    }

    /// Attaches the per-unit quantity context.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Option<Decimal>) -> Self {
        self.quantity = quantity;
        self
    }

    /// Attaches the frequency in effect.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Signed difference between new and original value.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.new_value - self.original_value
    }
}

impl DomainEvent for ChangeRecord {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn service_id(&self) -> &ServiceId {
        &self.metadata.service_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_name(&self) -> &'static str {
        "ChangeRecord"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record() -> ChangeRecord {
        ChangeRecord::for_area_field(
            ServiceId::new("power_washing"),
            AreaKey::new("patio"),
            AreaField::InsideSqFt,
            Decimal::from(1000),
            Decimal::from(1200),
        )
    }

    #[test]
    fn area_field_record_carries_names() {
        let record = record();
        assert_eq!(record.field_name, "insideSqFt");
        assert_eq!(record.field_display_name, "Inside Sq Ft");
        assert_eq!(record.delta(), Decimal::from(200));
        assert_eq!(record.event_name(), "ChangeRecord");
    }

    #[test]
    fn contract_months_record_has_no_area() {
        let record = ChangeRecord::for_contract_months(ServiceId::new("drain_service"), 12, 24)
            .with_frequency(Frequency::Quarterly);
        assert!(record.area_key.is_none());
        assert_eq!(record.field_name, CONTRACT_MONTHS_FIELD);
        assert_eq!(record.frequency, Some(Frequency::Quarterly));
    }

    #[test]
    fn serializes_flat_camel_case() {
        let record = record().with_quantity(Some(Decimal::from(1200)));
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert!(json.get("eventId").is_some());
        assert!(json.get("timestamp").is_some());
        assert_eq!(json["fieldName"], "insideSqFt");
        assert_eq!(json["serviceId"], "power_washing");

        let back: ChangeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
