//! # Domain Layer
//!
//! Pure pricing model: no I/O, no clocks other than event timestamps.
//!
//! - [`value_objects`]: money, identifiers, enums and checked arithmetic
//! - [`entities`]: configuration documents, area state, service schemas, results
//! - [`events`]: change records emitted to the audit sink
//! - [`services`]: strategy evaluators, minimum/trip enforcement, billing conversion

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
