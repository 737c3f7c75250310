//! # Configuration Source Traits
//!
//! Ports through which the configuration resolver reads pricing documents.
//!
//! - [`ConfigFetcher`]: asynchronous fetch of the active document from the
//!   config service
//! - [`PricingContext`]: synchronous shared cache of previously loaded
//!   documents, possibly inactive
//!
//! The resolver treats "empty", "inactive" and "error" from the fetcher
//! uniformly as "fall through to the next tier".

use crate::domain::entities::service_config::ServiceConfig;
use crate::domain::value_objects::ServiceId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for configuration fetches.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Request timed out.
    #[error("config fetch timeout: {0}")]
    Timeout(String),

    /// Network or connection error.
    #[error("config fetch connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status other than not found.
    #[error("config service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("config fetch protocol error: {0}")]
    Protocol(String),

    /// Client could not be constructed.
    #[error("config fetch internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if a manual refresh may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Protocol(_) | Self::Internal(_) => false,
        }
    }
}

/// Result type for configuration fetches.
pub type FetchResult<T> = Result<T, FetchError>;

/// Fetches the active configuration document of a service.
#[async_trait]
pub trait ConfigFetcher: Send + Sync + fmt::Debug {
    /// Fetches the active document.
    ///
    /// Returns `Ok(None)` when the service has no active document.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the config service cannot be reached
    /// or answers with something unusable.
    async fn fetch_active(&self, service_id: &ServiceId) -> FetchResult<Option<ServiceConfig>>;

    /// Returns the name of this fetcher.
    fn name(&self) -> &'static str;
}

/// Shared cache of previously loaded configuration documents.
pub trait PricingContext: Send + Sync + fmt::Debug {
    /// Returns the cached document for a service, active or not.
    fn cached_pricing_for_service(&self, service_id: &ServiceId) -> Option<ServiceConfig>;

    /// Stores a freshly fetched document, replacing any previous one.
    fn store(&self, config: ServiceConfig);
}
