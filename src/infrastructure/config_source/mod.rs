//! # Configuration Sources
//!
//! Ports and adapters for reading pricing configuration documents.
//!
//! ## Adapters
//!
//! - [`HttpConfigFetcher`]: config service REST API
//! - [`InMemoryConfigFetcher`]: scripted fetcher for offline use and tests
//! - [`InMemoryPricingContext`]: shared services context cache

pub mod http;
pub mod in_memory;
pub mod traits;

pub use http::HttpConfigFetcher;
pub use in_memory::{FetchOutcome, InMemoryConfigFetcher, InMemoryPricingContext};
pub use traits::{ConfigFetcher, FetchError, FetchResult, PricingContext};
