//! # Service Configuration Document
//!
//! Server-owned, versioned pricing configuration as fetched from the config
//! service or held by the shared services context.
//!
//! Every leaf of the [`RateTree`] is optional: a remote document may be
//! partially populated, and missing leaves are filled from lower-priority
//! sources when the [`EffectiveConfig`](super::EffectiveConfig) is built.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "serviceId": "power_washing",
//!   "version": 7,
//!   "isActive": true,
//!   "config": {
//!     "coreRates": { "workerRate": "210", "minimumVisit": "475" },
//!     "areaSpecificPricing": { "patio": { "basePrice": "300", "addons": { "sealant": "100" } } },
//!     "billingConversions": { "weekly": { "monthlyMultiplier": "4.33" } }
//!   }
//! }
//! ```

use crate::domain::value_objects::ServiceId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Core per-visit rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialCoreRates {
    /// Rate charged per worker.
    pub worker_rate: Option<Decimal>,
    /// Rate charged per hour.
    pub hourly_rate: Option<Decimal>,
    /// Floor applied to labour costs and to the quote subtotal.
    pub minimum_visit: Option<Decimal>,
    /// Trip charge added to labour visits; zero when not modeled.
    pub trip_charge: Option<Decimal>,
    /// Labour subtotal at or above which the trip charge is waived.
    pub trip_waive_threshold: Option<Decimal>,
}

/// Square-footage rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSquareFootageRates {
    /// Flat fee added once when any square footage is priced.
    pub fixed_fee: Option<Decimal>,
    /// Rate per inside square foot.
    pub inside_rate: Option<Decimal>,
    /// Rate per outside square foot.
    pub outside_rate: Option<Decimal>,
}

/// Package pricing for one area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialPresetPrice {
    /// Package price when no variant is selected.
    pub base_price: Option<Decimal>,
    /// Sub-selector prices replacing the base price (e.g. `large`).
    pub variants: BTreeMap<String, Decimal>,
    /// Additive surcharges (e.g. `sealant`).
    pub addons: BTreeMap<String, Decimal>,
}

/// Billing conversion entry for one frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingConversion {
    /// Explicit monthly-equivalent multiplier.
    pub monthly_multiplier: Option<Decimal>,
    /// Explicit visits-per-year multiplier.
    pub annual_multiplier: Option<Decimal>,
    /// Cycle length metadata used to derive both multipliers.
    pub cycle_months: Option<Decimal>,
}

impl BillingConversion {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monthly_multiplier.is_none()
            && self.annual_multiplier.is_none()
            && self.cycle_months.is_none()
    }
}

/// Service-specific rate tree with optional leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateTree {
    /// Core per-visit rates.
    pub core_rates: PartialCoreRates,
    /// Square-footage rates.
    pub square_footage: PartialSquareFootageRates,
    /// Package prices keyed by area key.
    pub area_specific_pricing: BTreeMap<String, PartialPresetPrice>,
    /// Billing conversions keyed by frequency label.
    pub billing_conversions: BTreeMap<String, BillingConversion>,
    /// Default contract length in months.
    pub default_contract_months: Option<u32>,
}

impl RateTree {
    /// Returns true if the tree carries no usable leaf.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Versioned configuration document for one service.
///
/// Immutable once fetched; a newer document supersedes it, it is never
/// patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Service key.
    pub service_id: ServiceId,
    /// Document version assigned by the config service.
    #[serde(default)]
    pub version: u32,
    /// Whether this is the active document for the service.
    #[serde(default)]
    pub is_active: bool,
    /// Rate tree.
    #[serde(rename = "config", alias = "rates", default)]
    pub rates: RateTree,
}

impl ServiceConfig {
    /// Creates an active document.
    #[must_use]
    pub fn active(service_id: ServiceId, version: u32, rates: RateTree) -> Self {
        Self {
            service_id,
            version,
            is_active: true,
            rates,
        }
    }

    /// Returns a copy marked inactive.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns true if the document can serve as the primary tier.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.rates.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_document() {
        let json = r#"{
            "serviceId": "Power_Washing",
            "version": 3,
            "isActive": true,
            "config": {
                "coreRates": { "workerRate": "210" },
                "billingConversions": { "Weekly": { "monthlyMultiplier": 4.3 } }
            }
        }"#;

        let config: ServiceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.service_id, ServiceId::new("power_washing"));
        assert_eq!(config.rates.core_rates.worker_rate, Some(Decimal::from(210)));
        assert!(config.rates.core_rates.minimum_visit.is_none());
        assert!(config.rates.billing_conversions.contains_key("Weekly"));
        assert!(config.is_usable());
    }

    #[test]
    fn empty_or_inactive_is_not_usable() {
        let empty = ServiceConfig::active(ServiceId::new("drain"), 1, RateTree::default());
        assert!(!empty.is_usable());

        let mut rates = RateTree::default();
        rates.core_rates.hourly_rate = Some(Decimal::from(90));
        let inactive = ServiceConfig::active(ServiceId::new("drain"), 1, rates).deactivated();
        assert!(!inactive.is_usable());
    }
}
