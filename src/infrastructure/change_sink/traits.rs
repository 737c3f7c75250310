//! # Change Sink Trait
//!
//! Port through which quote sessions emit change records.
//!
//! Recording is fire-and-forget: it never blocks, never fails towards the
//! caller and requires no acknowledgement. Batching and persistence belong
//! to the consumer.

use crate::domain::events::ChangeRecord;
use std::fmt;

/// Receives change records from quote sessions.
pub trait ChangeSink: Send + Sync + fmt::Debug {
    /// Records one change.
    fn record(&self, change: ChangeRecord);
}
