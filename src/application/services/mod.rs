//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ConfigResolver`]: three-tier configuration resolution, last resolver wins
//! - [`QuoteAggregator`]: prices a quote request against a configuration
//! - [`QuoteSession`]: single-writer form state with change tracking

pub mod config_resolver;
pub mod quote_aggregation;
pub mod quote_session;

pub use config_resolver::{ConfigResolver, GenerationTicket, Resolution};
pub use quote_aggregation::{AggregationConfig, QuoteAggregator};
pub use quote_session::QuoteSession;
