//! # Area State
//!
//! Per-area form state: enablement, selected pricing strategy and the
//! strategy-specific quantities and overrides.
//!
//! # Lifecycle
//!
//! ```text
//! from_definition ──► set_value / set_enabled / set_pricing_type ... ──► refresh_rates
//!   (form mount)          (user input, single writer)               (new config)
//! ```
//!
//! `refresh_rates` only replaces the rate snapshot: enablement, quantities,
//! user rate overrides and the custom amount survive a configuration
//! refresh. Clearing the custom amount is a separate, explicit step.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::area_state::{AreaField, AreaState};
//! use service_quote::domain::value_objects::{AreaKey, PricingType};
//! use rust_decimal::Decimal;
//!
//! let mut area = AreaState::new(AreaKey::new("dumpster"), "Dumpster Pad")
//!     .enabled()
//!     .with_pricing_type(PricingType::PerWorker);
//!
//! area.set_value(AreaField::Workers, Decimal::new(-3, 0));
//! assert_eq!(area.workers(), Decimal::ZERO);
//! ```

use crate::domain::entities::effective_config::EffectiveConfig;
use crate::domain::entities::service_schema::AreaDefinition;
use crate::domain::value_objects::arithmetic::non_negative;
use crate::domain::value_objects::{AreaKey, PricingType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Price-relevant numeric field of an area.
///
/// Only these fields produce change records when edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AreaField {
    /// Number of workers.
    Workers,
    /// Number of hours.
    Hours,
    /// Inside square footage.
    InsideSqFt,
    /// Outside square footage.
    OutsideSqFt,
    /// Salesperson-entered price.
    CustomAmount,
    /// Number of preset units.
    Quantity,
    /// Per-worker rate override.
    WorkerRate,
    /// Hourly rate override.
    HourlyRate,
    /// Square-footage fixed fee override.
    FixedFee,
    /// Inside square-foot rate override.
    InsideRate,
    /// Outside square-foot rate override.
    OutsideRate,
}

impl AreaField {
    /// Machine name used in change records.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Workers => "workers",
            Self::Hours => "hours",
            Self::InsideSqFt => "insideSqFt",
            Self::OutsideSqFt => "outsideSqFt",
            Self::CustomAmount => "customAmount",
            Self::Quantity => "quantity",
            Self::WorkerRate => "workerRate",
            Self::HourlyRate => "hourlyRate",
            Self::FixedFee => "fixedFee",
            Self::InsideRate => "insideRate",
            Self::OutsideRate => "outsideRate",
        }
    }

    /// Human-readable name used in change records.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Workers => "Workers",
            Self::Hours => "Hours",
            Self::InsideSqFt => "Inside Sq Ft",
            Self::OutsideSqFt => "Outside Sq Ft",
            Self::CustomAmount => "Custom Amount",
            Self::Quantity => "Quantity",
            Self::WorkerRate => "Worker Rate",
            Self::HourlyRate => "Hourly Rate",
            Self::FixedFee => "Fixed Fee",
            Self::InsideRate => "Inside Rate",
            Self::OutsideRate => "Outside Rate",
        }
    }

    /// Returns true for fields stored as rate overrides.
    #[must_use]
    pub const fn is_rate(self) -> bool {
        matches!(
            self,
            Self::WorkerRate | Self::HourlyRate | Self::FixedFee | Self::InsideRate | Self::OutsideRate
        )
    }
}

impl fmt::Display for AreaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// User-entered rate overrides. `None` or zero means "use the configured rate".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateOverrides {
    /// Per-worker rate.
    pub worker_rate: Option<Decimal>,
    /// Hourly rate.
    pub hourly_rate: Option<Decimal>,
    /// Square-footage fixed fee.
    pub fixed_fee: Option<Decimal>,
    /// Inside square-foot rate.
    pub inside_rate: Option<Decimal>,
    /// Outside square-foot rate.
    pub outside_rate: Option<Decimal>,
}

impl RateOverrides {
    fn slot(&mut self, field: AreaField) -> Option<&mut Option<Decimal>> {
        match field {
            AreaField::WorkerRate => Some(&mut self.worker_rate),
            AreaField::HourlyRate => Some(&mut self.hourly_rate),
            AreaField::FixedFee => Some(&mut self.fixed_fee),
            AreaField::InsideRate => Some(&mut self.inside_rate),
            AreaField::OutsideRate => Some(&mut self.outside_rate),
            _ => None,
        }
    }

    /// Returns the override for a rate field, if set.
    #[must_use]
    pub fn get(&self, field: AreaField) -> Option<Decimal> {
        match field {
            AreaField::WorkerRate => self.worker_rate,
            AreaField::HourlyRate => self.hourly_rate,
            AreaField::FixedFee => self.fixed_fee,
            AreaField::InsideRate => self.inside_rate,
            AreaField::OutsideRate => self.outside_rate,
            _ => None,
        }
    }

    /// Returns true if no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Picks a set, nonzero override, else the configured rate.
#[inline]
#[must_use]
pub fn override_or(override_rate: Option<Decimal>, configured: Decimal) -> Decimal {
    match override_rate.map(non_negative) {
        Some(rate) if !rate.is_zero() => rate,
        _ => non_negative(configured),
    }
}

/// Snapshot of the configured rates relevant to one area.
///
/// Refreshed whenever a new effective configuration arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaRates {
    /// Configured per-worker rate.
    pub worker_rate: Decimal,
    /// Configured hourly rate.
    pub hourly_rate: Decimal,
    /// Configured fixed fee.
    pub fixed_fee: Decimal,
    /// Configured inside square-foot rate.
    pub inside_rate: Decimal,
    /// Configured outside square-foot rate.
    pub outside_rate: Decimal,
    /// Configured unit package price for the selected variant.
    pub preset_price: Decimal,
}

impl AreaRates {
    /// Reads the rates for an area from the effective configuration.
    #[must_use]
    pub fn from_config(key: &AreaKey, variant: Option<&str>, config: &EffectiveConfig) -> Self {
        let core = config.core();
        let sqft = config.square_footage();
        Self {
            worker_rate: core.worker_rate,
            hourly_rate: core.hourly_rate,
            fixed_fee: sqft.fixed_fee,
            inside_rate: sqft.inside_rate,
            outside_rate: sqft.outside_rate,
            preset_price: config
                .preset(key)
                .map_or(Decimal::ZERO, |p| p.unit_price(variant)),
        }
    }

    fn get(&self, field: AreaField) -> Decimal {
        match field {
            AreaField::WorkerRate => self.worker_rate,
            AreaField::HourlyRate => self.hourly_rate,
            AreaField::FixedFee => self.fixed_fee,
            AreaField::InsideRate => self.inside_rate,
            AreaField::OutsideRate => self.outside_rate,
            _ => Decimal::ZERO,
        }
    }
}

/// State of one priceable area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaState {
    key: AreaKey,
    label: String,
    enabled: bool,
    pricing_type: PricingType,
    workers: Decimal,
    hours: Decimal,
    inside_sq_ft: Decimal,
    outside_sq_ft: Decimal,
    custom_amount: Decimal,
    quantity: Decimal,
    variant: Option<String>,
    addons: BTreeSet<String>,
    overrides: RateOverrides,
    rates: AreaRates,
}

impl Default for AreaState {
    fn default() -> Self {
        Self::new(AreaKey::new(""), String::new())
    }
}

impl AreaState {
    /// Creates a disabled preset area with one unit and no quantities.
    #[must_use]
    pub fn new(key: AreaKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            enabled: false,
            pricing_type: PricingType::Preset,
            workers: Decimal::ZERO,
            hours: Decimal::ZERO,
            inside_sq_ft: Decimal::ZERO,
            outside_sq_ft: Decimal::ZERO,
            custom_amount: Decimal::ZERO,
            quantity: Decimal::ONE,
            variant: None,
            addons: BTreeSet::new(),
            overrides: RateOverrides::default(),
            rates: AreaRates::default(),
        }
    }

    /// Creates the default state for a schema area.
    #[must_use]
    pub fn from_definition(definition: &AreaDefinition, config: &EffectiveConfig) -> Self {
        let mut state = Self::new(definition.key().clone(), definition.label())
            .with_pricing_type(definition.default_pricing_type());
        state.enabled = definition.is_enabled_by_default();
        state.refresh_rates(config);
        state
    }

    /// Enables the area.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Sets the pricing strategy.
    #[must_use]
    pub fn with_pricing_type(mut self, pricing_type: PricingType) -> Self {
        self.pricing_type = pricing_type;
        self
    }

    /// Sets a numeric field (clamped).
    #[must_use]
    pub fn with_value(mut self, field: AreaField, value: Decimal) -> Self {
        self.set_value(field, value);
        self
    }

    /// Selects a preset variant.
    #[must_use]
    pub fn with_variant(mut self, variant: &str) -> Self {
        self.set_variant(Some(variant));
        self
    }

    /// Selects a preset add-on.
    #[must_use]
    pub fn with_addon(mut self, addon: &str) -> Self {
        self.set_addon(addon, true);
        self
    }

    /// Returns the area key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &AreaKey {
        &self.key
    }

    /// Returns the display label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether the area is enabled.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the selected strategy.
    #[inline]
    #[must_use]
    pub const fn pricing_type(&self) -> PricingType {
        self.pricing_type
    }

    /// Number of workers.
    #[must_use]
    pub fn workers(&self) -> Decimal {
        non_negative(self.workers)
    }

    /// Number of hours.
    #[must_use]
    pub fn hours(&self) -> Decimal {
        non_negative(self.hours)
    }

    /// Inside square footage.
    #[must_use]
    pub fn inside_sq_ft(&self) -> Decimal {
        non_negative(self.inside_sq_ft)
    }

    /// Outside square footage.
    #[must_use]
    pub fn outside_sq_ft(&self) -> Decimal {
        non_negative(self.outside_sq_ft)
    }

    /// Custom amount; zero means no override.
    #[must_use]
    pub fn custom_amount(&self) -> Decimal {
        non_negative(self.custom_amount)
    }

    /// Number of preset units.
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        non_negative(self.quantity)
    }

    /// Selected preset variant.
    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Selected preset add-ons.
    #[must_use]
    pub fn addons(&self) -> &BTreeSet<String> {
        &self.addons
    }

    /// User rate overrides.
    #[inline]
    #[must_use]
    pub const fn overrides(&self) -> &RateOverrides {
        &self.overrides
    }

    /// Snapshot of the configured rates.
    #[inline]
    #[must_use]
    pub const fn rates(&self) -> &AreaRates {
        &self.rates
    }

    /// Returns the value of a field currently in effect.
    ///
    /// For rate fields this is the override when set and nonzero, otherwise
    /// the configured rate snapshot.
    #[must_use]
    pub fn value(&self, field: AreaField) -> Decimal {
        match field {
            AreaField::Workers => self.workers(),
            AreaField::Hours => self.hours(),
            AreaField::InsideSqFt => self.inside_sq_ft(),
            AreaField::OutsideSqFt => self.outside_sq_ft(),
            AreaField::CustomAmount => self.custom_amount(),
            AreaField::Quantity => self.quantity(),
            rate => override_or(self.overrides.get(rate), self.rates.get(rate)),
        }
    }

    /// Sets a numeric field, clamping it to the accepted range.
    ///
    /// Setting a rate field to zero removes the override. Returns the value
    /// now in effect.
    pub fn set_value(&mut self, field: AreaField, value: Decimal) -> Decimal {
        let value = non_negative(value);
        match field {
            AreaField::Workers => self.workers = value,
            AreaField::Hours => self.hours = value,
            AreaField::InsideSqFt => self.inside_sq_ft = value,
            AreaField::OutsideSqFt => self.outside_sq_ft = value,
            AreaField::CustomAmount => self.custom_amount = value,
            AreaField::Quantity => self.quantity = value,
            rate => {
                if let Some(slot) = self.overrides.slot(rate) {
                    *slot = (!value.is_zero()).then_some(value);
                }
            }
        }
        self.value(field)
    }

    /// Enables or disables the area.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Selects the pricing strategy.
    pub fn set_pricing_type(&mut self, pricing_type: PricingType) {
        self.pricing_type = pricing_type;
    }

    /// Selects or clears the preset variant.
    pub fn set_variant(&mut self, variant: Option<&str>) {
        self.variant = variant
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());
    }

    /// Selects or deselects a preset add-on.
    pub fn set_addon(&mut self, addon: &str, selected: bool) {
        let addon = addon.trim().to_lowercase();
        if selected {
            self.addons.insert(addon);
        } else {
            self.addons.remove(&addon);
        }
    }

    /// Replaces the rate snapshot from a new effective configuration.
    ///
    /// Enablement, quantities, overrides and the custom amount are untouched.
    pub fn refresh_rates(&mut self, config: &EffectiveConfig) {
        self.rates = AreaRates::from_config(&self.key, self.variant.as_deref(), config);
    }

    /// Clears the custom amount. Returns true if one was set.
    pub fn clear_custom_amount(&mut self) -> bool {
        let had_custom = !self.custom_amount().is_zero();
        self.custom_amount = Decimal::ZERO;
        had_custom
    }

    /// Quantity driving the selected strategy, used as per-unit context in
    /// change records.
    #[must_use]
    pub fn driving_quantity(&self) -> Option<Decimal> {
        match self.pricing_type {
            PricingType::Preset => Some(self.quantity()),
            PricingType::PerWorker => Some(self.workers()),
            PricingType::PerHour => Some(self.hours()),
            PricingType::SquareFeet => Some(self.inside_sq_ft() + self.outside_sq_ft()),
            PricingType::Custom => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::catalog;

    fn patio() -> AreaState {
        AreaState::new(AreaKey::new("patio"), "Patio")
    }

    #[test]
    fn new_area_is_disabled_preset_with_one_unit() {
        let area = patio();
        assert!(!area.is_enabled());
        assert_eq!(area.pricing_type(), PricingType::Preset);
        assert_eq!(area.quantity(), Decimal::ONE);
        assert!(area.overrides().is_empty());
    }

    #[test]
    fn set_value_clamps_negative_input() {
        let mut area = patio();
        assert_eq!(area.set_value(AreaField::Hours, Decimal::from(-2)), Decimal::ZERO);
        assert_eq!(area.hours(), Decimal::ZERO);
    }

    #[test]
    fn rate_override_falls_back_to_snapshot_when_zero() {
        let schema = catalog::power_washing();
        let config = EffectiveConfig::from_fallback(&schema);
        let mut area = patio();
        area.refresh_rates(&config);

        assert_eq!(area.value(AreaField::WorkerRate), Decimal::from(200));

        area.set_value(AreaField::WorkerRate, Decimal::from(240));
        assert_eq!(area.value(AreaField::WorkerRate), Decimal::from(240));
        assert_eq!(area.overrides().worker_rate, Some(Decimal::from(240)));

        area.set_value(AreaField::WorkerRate, Decimal::ZERO);
        assert!(area.overrides().worker_rate.is_none());
        assert_eq!(area.value(AreaField::WorkerRate), Decimal::from(200));
    }

    #[test]
    fn refresh_rates_keeps_user_state() {
        let schema = catalog::power_washing();
        let config = EffectiveConfig::from_fallback(&schema);
        let mut area = AreaState::from_definition(
            schema.area(&AreaKey::new("patio")).unwrap(),
            &config,
        )
        .enabled()
        .with_value(AreaField::CustomAmount, Decimal::from(999))
        .with_value(AreaField::InsideRate, Decimal::new(75, 2));
        area.set_enabled(false);

        let mut rates = crate::domain::entities::RateTree::default();
        rates.area_specific_pricing.insert(
            "patio".to_string(),
            crate::domain::entities::service_config::PartialPresetPrice {
                base_price: Some(Decimal::from(350)),
                ..Default::default()
            },
        );
        let fresh = crate::domain::entities::ServiceConfig::active(
            schema.service_id().clone(),
            2,
            rates,
        );
        let refreshed = EffectiveConfig::from_layers(&schema, None, Some(&fresh));
        area.refresh_rates(&refreshed);

        assert!(!area.is_enabled());
        assert_eq!(area.rates().preset_price, Decimal::from(350));
        assert_eq!(area.custom_amount(), Decimal::from(999));
        assert_eq!(area.value(AreaField::InsideRate), Decimal::new(75, 2));
    }

    #[test]
    fn clear_custom_amount_reports_previous_state() {
        let mut area = patio().with_value(AreaField::CustomAmount, Decimal::from(50));
        assert!(area.clear_custom_amount());
        assert!(!area.clear_custom_amount());
    }

    #[test]
    fn variant_and_addons_are_normalized() {
        let mut area = patio().with_variant(" Large ").with_addon("Sealant");
        assert_eq!(area.variant(), Some("large"));
        assert!(area.addons().contains("sealant"));

        area.set_addon("SEALANT", false);
        assert!(area.addons().is_empty());
        area.set_variant(Some("  "));
        assert_eq!(area.variant(), None);
    }

    #[test]
    fn driving_quantity_follows_strategy() {
        let area = patio()
            .with_pricing_type(PricingType::SquareFeet)
            .with_value(AreaField::InsideSqFt, Decimal::from(600))
            .with_value(AreaField::OutsideSqFt, Decimal::from(400));
        assert_eq!(area.driving_quantity(), Some(Decimal::from(1000)));

        let custom = patio().with_pricing_type(PricingType::Custom);
        assert_eq!(custom.driving_quantity(), None);
    }

    #[test]
    fn rate_fields_are_overrides() {
        assert!(AreaField::FixedFee.is_rate());
        assert!(!AreaField::Quantity.is_rate());
    }
}
