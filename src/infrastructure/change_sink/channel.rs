//! # Channel Change Sink
//!
//! [`ChangeSink`] forwarding records to a tokio unbounded channel.
//!
//! The sending side never blocks; a consumer task drains the receiver and
//! persists records in batches.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::AreaField;
//! use service_quote::domain::events::ChangeRecord;
//! use service_quote::domain::value_objects::{AreaKey, ServiceId};
//! use service_quote::infrastructure::change_sink::{ChangeSink, ChannelChangeSink};
//! use rust_decimal::Decimal;
//!
//! let (sink, mut receiver) = ChannelChangeSink::channel();
//! sink.record(ChangeRecord::for_area_field(
//!     ServiceId::new("drain_service"),
//!     AreaKey::new("grease_trap"),
//!     AreaField::Quantity,
//!     Decimal::ONE,
//!     Decimal::from(2),
//! ));
//! assert!(receiver.try_recv().is_ok());
//! ```

use crate::domain::events::{ChangeRecord, DomainEvent};
use crate::infrastructure::change_sink::traits::ChangeSink;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Change sink backed by an unbounded mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelChangeSink {
    sender: UnboundedSender<ChangeRecord>,
}

impl ChannelChangeSink {
    /// Wraps an existing sender.
    #[must_use]
    pub fn new(sender: UnboundedSender<ChangeRecord>) -> Self {
        Self { sender }
    }

    /// Creates a sink and its receiving end.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<ChangeRecord>) {
        let (sender, receiver) = unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Returns true if the receiving end was dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl ChangeSink for ChannelChangeSink {
    fn record(&self, change: ChangeRecord) {
        let event_id = change.event_id();
        if self.sender.send(change).is_err() {
            tracing::warn!(event_id = %event_id, "change receiver dropped, discarding record");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::AreaField;
    use crate::domain::value_objects::{AreaKey, ServiceId};
    use rust_decimal::Decimal;

    fn change(value: i64) -> ChangeRecord {
        ChangeRecord::for_area_field(
            ServiceId::new("window_cleaning"),
            AreaKey::new("storefront"),
            AreaField::Hours,
            Decimal::ZERO,
            Decimal::from(value),
        )
    }

    #[tokio::test]
    async fn delivers_in_order() {
        let (sink, mut receiver) = ChannelChangeSink::channel();
        sink.record(change(1));
        sink.record(change(2));

        assert_eq!(receiver.recv().await.unwrap().new_value, Decimal::from(1));
        assert_eq!(receiver.recv().await.unwrap().new_value, Decimal::from(2));
    }

    #[test]
    fn dropped_receiver_does_not_fail_sender() {
        let (sink, receiver) = ChannelChangeSink::channel();
        drop(receiver);
        assert!(sink.is_closed());
        sink.record(change(3));
    }
}
