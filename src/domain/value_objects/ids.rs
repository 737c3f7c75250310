//! # Identifiers
//!
//! Strongly typed identifiers for services, areas and events.
//!
//! - [`ServiceId`], [`AreaKey`]: string-based, normalized to lowercase
//! - [`EventId`]: UUID v4 for emitted change records

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, trimmed and lowercased.
            #[must_use]
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(value.as_ref().trim().to_lowercase())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_id!(
    /// Key of a service type (e.g. `power_washing`) in the config service.
    ServiceId
);

string_id!(
    /// Key of a priceable area or line item within a service (e.g. `patio`).
    AreaKey
);

/// Identifier of an emitted domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generates a new random event identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn get(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_are_normalized() {
        assert_eq!(ServiceId::new("  Power_Washing "), ServiceId::new("power_washing"));
        assert_eq!(AreaKey::from("Patio").as_str(), "patio");
    }

    #[test]
    fn event_ids_are_unique() {
        assert_ne!(EventId::new_v4(), EventId::new_v4());
    }
}
