//! # Application Errors
//!
//! Error types for quote session edits.
//!
//! Pricing itself never fails: configuration problems degrade to a lower
//! tier and invalid numbers are clamped. The only rejected operations are
//! edits addressing something the service schema does not define.
//!
//! # Examples
//!
//! ```
//! use service_quote::application::error::SessionError;
//! use service_quote::domain::value_objects::{AreaKey, PricingType};
//!
//! let err = SessionError::unsupported_strategy(AreaKey::new("skylights"), PricingType::PerWorker);
//! assert!(err.to_string().contains("skylights"));
//! ```

use crate::domain::value_objects::{AreaKey, PricingType};
use thiserror::Error;

/// Rejected quote session edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The area is not part of the service form.
    #[error("unknown area: {0}")]
    UnknownArea(AreaKey),

    /// The area does not accept the pricing strategy.
    #[error("area {area} does not support {pricing_type} pricing")]
    UnsupportedStrategy {
        /// Area key.
        area: AreaKey,
        /// Rejected strategy.
        pricing_type: PricingType,
    },
}

impl SessionError {
    /// Creates an unknown area error.
    #[must_use]
    pub fn unknown_area(area: AreaKey) -> Self {
        Self::UnknownArea(area)
    }

    /// Creates an unsupported strategy error.
    #[must_use]
    pub fn unsupported_strategy(area: AreaKey, pricing_type: PricingType) -> Self {
        Self::UnsupportedStrategy { area, pricing_type }
    }
}

/// Result type for session edits.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            SessionError::unknown_area(AreaKey::new("roof")).to_string(),
            "unknown area: roof"
        );
        assert_eq!(
            SessionError::unsupported_strategy(AreaKey::new("skylights"), PricingType::PerHour)
                .to_string(),
            "area skylights does not support PER_HOUR pricing"
        );
    }
}
