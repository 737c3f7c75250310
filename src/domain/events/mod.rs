//! # Domain Events
//!
//! Events emitted by quote sessions for audit and versioning.
//!
//! - [`ChangeRecord`]: a user override of a price-relevant value

pub mod change_events;
pub mod domain_event;

pub use change_events::{CONTRACT_MONTHS_FIELD, ChangeRecord};
pub use domain_event::{DomainEvent, EventMetadata};
