//! # service-quote
//!
//! Configurable, multi-strategy price quote engine for commercial service
//! contracts (drain service, power washing, window cleaning, ...).
//!
//! The engine turns a sparse set of user inputs (areas enabled, quantities,
//! billing frequency, overrides) plus a resolved pricing configuration into a
//! per-visit price, a monthly recurring amount and a contract-lifetime total.
//!
//! # Layers
//!
//! - [`domain`]: value objects, entities, events and the pure pricing services
//!   (strategy evaluators, minimum/trip enforcement, billing conversion)
//! - [`application`]: the configuration resolver, the quote aggregator and the
//!   single-writer quote session
//! - [`infrastructure`]: adapters for the ports (HTTP config fetch, in-memory
//!   pricing cache, change sinks), settings and logging
//!
//! # Examples
//!
//! ```
//! use service_quote::application::services::QuoteAggregator;
//! use service_quote::domain::entities::{catalog, EffectiveConfig, QuoteRequest};
//!
//! let schema = catalog::power_washing();
//! let config = EffectiveConfig::from_fallback(&schema);
//! let request = QuoteRequest::from_schema(&schema, &config);
//!
//! let result = QuoteAggregator::new().aggregate(&request, &config);
//! assert!(result.per_visit_price.is_zero());
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
