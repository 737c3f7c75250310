//! # Quote Request and Result
//!
//! Input and output of the quote aggregator.
//!
//! A [`QuoteRequest`] bundles the area states of one service form with the
//! quote-level [`BillingTerms`] and the all-inclusive flag. A
//! [`QuoteResult`] is derived only: it is recomputed whenever the request or
//! the effective configuration changes and is never stored.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::{catalog, EffectiveConfig, QuoteRequest};
//! use service_quote::domain::value_objects::Frequency;
//!
//! let schema = catalog::drain_service();
//! let config = EffectiveConfig::from_fallback(&schema);
//! let request = QuoteRequest::from_schema(&schema, &config);
//!
//! assert_eq!(request.areas().len(), schema.areas().len());
//! assert_eq!(request.terms().frequency, Frequency::Monthly);
//! ```

use crate::domain::entities::area_state::AreaState;
use crate::domain::entities::effective_config::{EffectiveConfig, DEFAULT_CONTRACT_MONTHS};
use crate::domain::entities::service_schema::ServiceSchema;
use crate::domain::value_objects::{AreaKey, ConfigTier, Frequency, Money, PricingType, ServiceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quote-level billing terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingTerms {
    /// Visit frequency.
    pub frequency: Frequency,
    /// Contract length in months; `None` uses the configured default.
    pub contract_months: Option<u32>,
}

impl Default for BillingTerms {
    fn default() -> Self {
        Self {
            frequency: Frequency::Monthly,
            contract_months: None,
        }
    }
}

impl BillingTerms {
    /// Creates terms with an explicit contract length.
    #[must_use]
    pub const fn new(frequency: Frequency, contract_months: u32) -> Self {
        Self {
            frequency,
            contract_months: Some(contract_months),
        }
    }

    /// Contract length, falling back to `default` when unset or zero.
    #[must_use]
    pub fn contract_months_or(&self, default: u32) -> u32 {
        match self.contract_months {
            Some(months) if months > 0 => months,
            _ if default > 0 => default,
            _ => DEFAULT_CONTRACT_MONTHS,
        }
    }
}

/// Everything the aggregator needs besides the effective configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    service_id: ServiceId,
    areas: Vec<AreaState>,
    terms: BillingTerms,
    all_inclusive: bool,
}

impl QuoteRequest {
    /// Creates an empty request for a service.
    #[must_use]
    pub fn new(service_id: ServiceId) -> Self {
        Self {
            service_id,
            ..Self::default()
        }
    }

    /// Creates the default form state for a schema: one area per definition
    /// and the configured default contract length.
    #[must_use]
    pub fn from_schema(schema: &ServiceSchema, config: &EffectiveConfig) -> Self {
        Self {
            service_id: schema.service_id().clone(),
            areas: schema
                .areas()
                .iter()
                .map(|definition| AreaState::from_definition(definition, config))
                .collect(),
            terms: BillingTerms {
                frequency: Frequency::Monthly,
                contract_months: Some(config.default_contract_months()),
            },
            all_inclusive: false,
        }
    }

    /// Adds an area, replacing any area with the same key.
    #[must_use]
    pub fn with_area(mut self, area: AreaState) -> Self {
        match self.areas.iter_mut().find(|a| a.key() == area.key()) {
            Some(existing) => *existing = area,
            None => self.areas.push(area),
        }
        self
    }

    /// Sets the billing terms.
    #[must_use]
    pub fn with_terms(mut self, terms: BillingTerms) -> Self {
        self.terms = terms;
        self
    }

    /// Marks the quote as all-inclusive (trip charge waived).
    #[must_use]
    pub fn all_inclusive(mut self, all_inclusive: bool) -> Self {
        self.all_inclusive = all_inclusive;
        self
    }

    /// Returns the service key.
    #[inline]
    #[must_use]
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Returns the areas in form order.
    #[inline]
    #[must_use]
    pub fn areas(&self) -> &[AreaState] {
        &self.areas
    }

    /// Looks up an area.
    #[must_use]
    pub fn area(&self, key: &AreaKey) -> Option<&AreaState> {
        self.areas.iter().find(|a| a.key() == key)
    }

    /// Looks up an area for mutation.
    pub fn area_mut(&mut self, key: &AreaKey) -> Option<&mut AreaState> {
        self.areas.iter_mut().find(|a| a.key() == key)
    }

    /// Re-prices the form against a newly resolved configuration.
    ///
    /// Every area's rate snapshot is refreshed; enablement, quantities and
    /// rate overrides are kept. With `clear_custom`, custom amounts are
    /// removed as well. Returns the number of custom amounts cleared.
    pub fn apply_config(&mut self, config: &EffectiveConfig, clear_custom: bool) -> usize {
        let mut cleared = 0;
        for area in &mut self.areas {
            area.refresh_rates(config);
            if clear_custom && area.clear_custom_amount() {
                cleared += 1;
            }
        }
        cleared
    }

    /// Returns the billing terms.
    #[inline]
    #[must_use]
    pub const fn terms(&self) -> &BillingTerms {
        &self.terms
    }

    /// Returns the billing terms for mutation.
    pub fn terms_mut(&mut self) -> &mut BillingTerms {
        &mut self.terms
    }

    /// Returns whether the quote is all-inclusive.
    #[inline]
    #[must_use]
    pub const fn is_all_inclusive(&self) -> bool {
        self.all_inclusive
    }

    /// Sets the all-inclusive flag.
    pub fn set_all_inclusive(&mut self, all_inclusive: bool) {
        self.all_inclusive = all_inclusive;
    }
}

/// Priced contribution of one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaLine {
    /// Area key.
    pub key: AreaKey,
    /// Area display label.
    pub label: String,
    /// Strategy that produced the cost; `Custom` when a custom amount won.
    pub pricing_type: PricingType,
    /// Cost before the area minimum.
    pub raw_cost: Money,
    /// Final contribution to the subtotal.
    pub cost: Money,
    /// Whether the area minimum lifted the cost.
    pub minimum_applied: bool,
    /// Whether the cost is labour (subject to minimums and trip charge).
    pub is_labour: bool,
}

/// Derived price breakdown of one quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    /// Service key.
    pub service_id: ServiceId,
    /// Price of one visit, including the whole-quote minimum and trip charge.
    pub per_visit_price: Money,
    /// Sum of area contributions before the whole-quote minimum.
    pub subtotal: Money,
    /// Monthly-equivalent recurring amount.
    pub monthly_recurring: Money,
    /// Contract-lifetime total.
    pub contract_total: Money,
    /// Visits over the contract.
    pub visits_in_contract: Decimal,
    /// Visit frequency used.
    pub frequency: Frequency,
    /// Contract length used.
    pub contract_months: u32,
    /// Whether the whole-quote minimum lifted the subtotal.
    pub minimum_applied: bool,
    /// Trip charge added to the visit; zero when waived or not modeled.
    pub trip_charge: Money,
    /// Tier of the configuration used.
    pub config_tier: ConfigTier,
    /// Per-area contributions, enabled areas only.
    pub area_lines: Vec<AreaLine>,
    /// Human-readable breakdown lines.
    pub details_breakdown: Vec<String>,
}

impl QuoteResult {
    /// Returns true if pricing came from a degraded configuration tier.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.config_tier.is_degraded()
    }

    /// Returns the line for an area, if it was enabled.
    #[must_use]
    pub fn line(&self, key: &AreaKey) -> Option<&AreaLine> {
        self.area_lines.iter().find(|line| &line.key == key)
    }
}
