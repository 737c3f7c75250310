//! # Domain Entities
//!
//! Configuration documents, service schemas and quote form state.
//!
//! ## Configuration
//!
//! - [`ServiceConfig`]: versioned, partial rate document from the config service
//! - [`EffectiveConfig`]: fully resolved rate card for one computation
//!
//! ## Quoting
//!
//! - [`ServiceSchema`]: per-service parametrization of the engine
//! - [`AreaState`]: per-area form state
//! - [`QuoteRequest`] / [`QuoteResult`]: aggregator input and output

pub mod area_state;
pub mod catalog;
pub mod effective_config;
pub mod quote;
pub mod service_config;
pub mod service_schema;

pub use area_state::{AreaField, AreaRates, AreaState, RateOverrides};
pub use effective_config::{
    CoreRates, DEFAULT_CONTRACT_MONTHS, EffectiveConfig, PresetPrice, RateCard,
    SquareFootageRates,
};
pub use quote::{AreaLine, BillingTerms, QuoteRequest, QuoteResult};
pub use service_config::{BillingConversion, RateTree, ServiceConfig};
pub use service_schema::{AreaDefinition, SchemaRegistry, ServiceSchema};
