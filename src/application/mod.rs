//! # Application Layer
//!
//! Orchestrates domain pricing with the configuration and change-tracking
//! ports.
//!
//! - [`services`]: configuration resolver, quote aggregator, quote session
//! - [`error`]: rejected session edits

pub mod error;
pub mod services;

pub use error::{SessionError, SessionResult};
