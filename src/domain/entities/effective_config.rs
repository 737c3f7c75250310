//! # Effective Configuration
//!
//! Fully resolved rate table used for a quote computation.
//!
//! A [`RateCard`] has no optional leaves. The [`EffectiveConfig`] is built by
//! starting from the service schema's compiled-in fallback card and
//! overlaying, leaf by leaf, the cached document and then the freshly fetched
//! document:
//!
//! ```text
//! static fallback  <-  cached context  <-  fetched active
//! (lowest)                                 (highest)
//! ```
//!
//! A missing or negative leaf never overrides a lower tier, so a partially
//! populated remote document cannot produce an undefined price.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::{catalog, EffectiveConfig};
//! use service_quote::domain::value_objects::ConfigTier;
//!
//! let schema = catalog::power_washing();
//! let config = EffectiveConfig::from_fallback(&schema);
//! assert_eq!(config.tier(), ConfigTier::Static);
//! assert!(config.core().minimum_visit > rust_decimal::Decimal::ZERO);
//! ```

use crate::domain::entities::service_config::{BillingConversion, RateTree, ServiceConfig};
use crate::domain::entities::service_schema::ServiceSchema;
use crate::domain::value_objects::{AreaKey, ConfigTier, Frequency, ServiceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default contract length when neither config nor user supplies one.
pub const DEFAULT_CONTRACT_MONTHS: u32 = 12;

/// Resolved core per-visit rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreRates {
    /// Rate charged per worker.
    pub worker_rate: Decimal,
    /// Rate charged per hour.
    pub hourly_rate: Decimal,
    /// Minimum visit charge.
    pub minimum_visit: Decimal,
    /// Trip charge; zero when the service does not model one.
    pub trip_charge: Decimal,
    /// Labour subtotal at or above which the trip charge is waived; zero disables.
    pub trip_waive_threshold: Decimal,
}

/// Resolved square-footage rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareFootageRates {
    /// Flat fee added when any square footage is priced.
    pub fixed_fee: Decimal,
    /// Rate per inside square foot.
    pub inside_rate: Decimal,
    /// Rate per outside square foot.
    pub outside_rate: Decimal,
}

/// Resolved package pricing for one area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetPrice {
    /// Package price when no variant is selected.
    pub base_price: Decimal,
    /// Sub-selector prices replacing the base price.
    pub variants: BTreeMap<String, Decimal>,
    /// Additive surcharges.
    pub addons: BTreeMap<String, Decimal>,
}

impl PresetPrice {
    /// Creates a package with a base price only.
    #[must_use]
    pub fn base(base_price: Decimal) -> Self {
        Self {
            base_price,
            ..Self::default()
        }
    }

    /// Adds a variant price.
    #[must_use]
    pub fn with_variant(mut self, name: &str, price: Decimal) -> Self {
        self.variants.insert(name.to_lowercase(), price);
        self
    }

    /// Adds an additive surcharge.
    #[must_use]
    pub fn with_addon(mut self, name: &str, price: Decimal) -> Self {
        self.addons.insert(name.to_lowercase(), price);
        self
    }

    /// Unit price for the given variant, falling back to the base price for
    /// unknown or absent variants.
    #[must_use]
    pub fn unit_price(&self, variant: Option<&str>) -> Decimal {
        variant
            .and_then(|v| self.variants.get(&v.to_lowercase()))
            .copied()
            .unwrap_or(self.base_price)
    }

    /// Price of a named add-on; unknown add-ons cost nothing.
    #[must_use]
    pub fn addon_price(&self, addon: &str) -> Decimal {
        self.addons
            .get(&addon.to_lowercase())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Complete rate table with every leaf defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCard {
    /// Core per-visit rates.
    pub core: CoreRates,
    /// Square-footage rates.
    pub square_footage: SquareFootageRates,
    /// Package prices keyed by area.
    pub area_pricing: BTreeMap<AreaKey, PresetPrice>,
    /// Billing conversions keyed by frequency; absent entries use the static table.
    pub billing: BTreeMap<Frequency, BillingConversion>,
    /// Default contract length in months.
    pub default_contract_months: u32,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            core: CoreRates::default(),
            square_footage: SquareFootageRates::default(),
            area_pricing: BTreeMap::new(),
            billing: BTreeMap::new(),
            default_contract_months: DEFAULT_CONTRACT_MONTHS,
        }
    }
}

/// Replaces `slot` with `value` when it is present and non-negative.
fn apply_leaf(slot: &mut Decimal, value: Option<Decimal>) -> usize {
    match value {
        Some(v) if !v.is_sign_negative() => {
            *slot = v;
            1
        }
        _ => 0,
    }
}

fn apply_optional_leaf(slot: &mut Option<Decimal>, value: Option<Decimal>) -> usize {
    match value {
        Some(v) if !v.is_sign_negative() => {
            *slot = Some(v);
            1
        }
        _ => 0,
    }
}

fn apply_map(slot: &mut BTreeMap<String, Decimal>, values: &BTreeMap<String, Decimal>) -> usize {
    let mut applied = 0;
    for (name, price) in values {
        if !price.is_sign_negative() {
            slot.insert(name.to_lowercase(), *price);
            applied += 1;
        }
    }
    applied
}

impl RateCard {
    /// Overlays every present leaf of `tree` onto this card.
    ///
    /// Returns the number of leaves applied. Unknown frequency labels are
    /// skipped with a warning.
    pub fn overlay(&mut self, tree: &RateTree) -> usize {
        let mut applied = 0;

        let core = &tree.core_rates;
        applied += apply_leaf(&mut self.core.worker_rate, core.worker_rate);
        applied += apply_leaf(&mut self.core.hourly_rate, core.hourly_rate);
        applied += apply_leaf(&mut self.core.minimum_visit, core.minimum_visit);
        applied += apply_leaf(&mut self.core.trip_charge, core.trip_charge);
        applied += apply_leaf(
            &mut self.core.trip_waive_threshold,
            core.trip_waive_threshold,
        );

        let sqft = &tree.square_footage;
        applied += apply_leaf(&mut self.square_footage.fixed_fee, sqft.fixed_fee);
        applied += apply_leaf(&mut self.square_footage.inside_rate, sqft.inside_rate);
        applied += apply_leaf(&mut self.square_footage.outside_rate, sqft.outside_rate);

        for (key, preset) in &tree.area_specific_pricing {
            let slot = self.area_pricing.entry(AreaKey::new(key)).or_default();
            applied += apply_leaf(&mut slot.base_price, preset.base_price);
            applied += apply_map(&mut slot.variants, &preset.variants);
            applied += apply_map(&mut slot.addons, &preset.addons);
        }

        for (label, conversion) in &tree.billing_conversions {
            let Ok(frequency) = label.parse::<Frequency>() else {
                tracing::warn!(label = %label, "ignoring billing conversion for unknown frequency");
                continue;
            };
            let slot = self.billing.entry(frequency).or_default();
            applied += apply_optional_leaf(&mut slot.monthly_multiplier, conversion.monthly_multiplier);
            applied += apply_optional_leaf(&mut slot.annual_multiplier, conversion.annual_multiplier);
            applied += apply_optional_leaf(&mut slot.cycle_months, conversion.cycle_months);
        }

        if let Some(months) = tree.default_contract_months.filter(|m| *m > 0) {
            self.default_contract_months = months;
            applied += 1;
        }

        applied
    }
}

/// The resolved configuration for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    service_id: ServiceId,
    version: Option<u32>,
    tier: ConfigTier,
    rates: RateCard,
}

impl EffectiveConfig {
    /// Builds the effective configuration from up to three sources.
    ///
    /// `fetched` is only layered when it is active and non-empty; `cached`
    /// is layered regardless of its active flag. The reported tier is the
    /// highest-priority source that contributed.
    #[must_use]
    pub fn from_layers(
        schema: &ServiceSchema,
        cached: Option<&ServiceConfig>,
        fetched: Option<&ServiceConfig>,
    ) -> Self {
        let mut rates = schema.fallback().clone();
        let mut tier = ConfigTier::Static;
        let mut version = None;

        if let Some(doc) = cached.filter(|doc| !doc.rates.is_empty()) {
            rates.overlay(&doc.rates);
            tier = ConfigTier::Cached;
            version = Some(doc.version);
        }

        if let Some(doc) = fetched.filter(|doc| doc.is_usable()) {
            rates.overlay(&doc.rates);
            tier = ConfigTier::Remote;
            version = Some(doc.version);
        }

        Self {
            service_id: schema.service_id().clone(),
            version,
            tier,
            rates,
        }
    }

    /// Builds the configuration from the compiled-in fallback only.
    #[must_use]
    pub fn from_fallback(schema: &ServiceSchema) -> Self {
        Self::from_layers(schema, None, None)
    }

    /// Returns the service key.
    #[inline]
    #[must_use]
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Returns the version of the highest-priority document, if any.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> Option<u32> {
        self.version
    }

    /// Returns the source tier.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> ConfigTier {
        self.tier
    }

    /// Returns the full rate card.
    #[inline]
    #[must_use]
    pub const fn rates(&self) -> &RateCard {
        &self.rates
    }

    /// Returns the core rates.
    #[inline]
    #[must_use]
    pub const fn core(&self) -> &CoreRates {
        &self.rates.core
    }

    /// Returns the square-footage rates.
    #[inline]
    #[must_use]
    pub const fn square_footage(&self) -> &SquareFootageRates {
        &self.rates.square_footage
    }

    /// Returns the package pricing for an area.
    #[must_use]
    pub fn preset(&self, key: &AreaKey) -> Option<&PresetPrice> {
        self.rates.area_pricing.get(key)
    }

    /// Returns the configured billing conversion for a frequency.
    #[must_use]
    pub fn billing(&self, frequency: Frequency) -> Option<&BillingConversion> {
        self.rates.billing.get(&frequency)
    }

    /// Returns the default contract length.
    #[inline]
    #[must_use]
    pub const fn default_contract_months(&self) -> u32 {
        self.rates.default_contract_months
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::catalog;
    use crate::domain::entities::service_config::PartialPresetPrice;

    fn doc(rates: RateTree) -> ServiceConfig {
        ServiceConfig::active(ServiceId::new("power_washing"), 4, rates)
    }

    #[test]
    fn fallback_only_is_static() {
        let schema = catalog::power_washing();
        let config = EffectiveConfig::from_fallback(&schema);
        assert_eq!(config.tier(), ConfigTier::Static);
        assert_eq!(config.version(), None);
        assert_eq!(config.rates(), schema.fallback());
    }

    #[test]
    fn fetched_leaves_win_and_missing_leaves_fall_through() {
        let schema = catalog::power_washing();

        let mut cached = RateTree::default();
        cached.core_rates.worker_rate = Some(Decimal::from(180));
        cached.core_rates.hourly_rate = Some(Decimal::from(95));

        let mut fetched = RateTree::default();
        fetched.core_rates.worker_rate = Some(Decimal::from(220));

        let config =
            EffectiveConfig::from_layers(&schema, Some(&doc(cached)), Some(&doc(fetched)));

        assert_eq!(config.tier(), ConfigTier::Remote);
        assert_eq!(config.core().worker_rate, Decimal::from(220));
        assert_eq!(config.core().hourly_rate, Decimal::from(95));
        assert_eq!(
            config.core().minimum_visit,
            schema.fallback().core.minimum_visit
        );
    }

    #[test]
    fn inactive_fetched_is_ignored_but_inactive_cached_is_used() {
        let schema = catalog::power_washing();

        let mut rates = RateTree::default();
        rates.core_rates.minimum_visit = Some(Decimal::from(500));
        let inactive = doc(rates).deactivated();

        let config = EffectiveConfig::from_layers(&schema, None, Some(&inactive));
        assert_eq!(config.tier(), ConfigTier::Static);

        let config = EffectiveConfig::from_layers(&schema, Some(&inactive), None);
        assert_eq!(config.tier(), ConfigTier::Cached);
        assert_eq!(config.core().minimum_visit, Decimal::from(500));
    }

    #[test]
    fn negative_leaf_does_not_override() {
        let schema = catalog::power_washing();
        let mut rates = RateTree::default();
        rates.core_rates.worker_rate = Some(Decimal::from(-10));
        rates.core_rates.hourly_rate = Some(Decimal::from(150));

        let config = EffectiveConfig::from_layers(&schema, None, Some(&doc(rates)));
        assert_eq!(config.core().worker_rate, schema.fallback().core.worker_rate);
        assert_eq!(config.core().hourly_rate, Decimal::from(150));
    }

    #[test]
    fn area_pricing_merges_per_leaf() {
        let schema = catalog::power_washing();
        let patio = AreaKey::new("patio");
        let fallback_patio = schema.fallback().area_pricing.get(&patio).unwrap().clone();

        let mut rates = RateTree::default();
        rates.area_specific_pricing.insert(
            "Patio".to_string(),
            PartialPresetPrice {
                base_price: None,
                variants: BTreeMap::new(),
                addons: BTreeMap::from([("sealant".to_string(), Decimal::from(120))]),
            },
        );

        let config = EffectiveConfig::from_layers(&schema, None, Some(&doc(rates)));
        let merged = config.preset(&patio).unwrap();
        assert_eq!(merged.base_price, fallback_patio.base_price);
        assert_eq!(merged.addon_price("sealant"), Decimal::from(120));
    }

    #[test]
    fn billing_labels_are_normalized() {
        let schema = catalog::power_washing();
        let mut rates = RateTree::default();
        rates.billing_conversions.insert(
            "Bi-Weekly".to_string(),
            BillingConversion {
                monthly_multiplier: Some(Decimal::new(217, 2)),
                ..BillingConversion::default()
            },
        );
        rates
            .billing_conversions
            .insert("fortnight-ish".to_string(), BillingConversion::default());

        let config = EffectiveConfig::from_layers(&schema, None, Some(&doc(rates)));
        assert_eq!(
            config.billing(Frequency::Biweekly).unwrap().monthly_multiplier,
            Some(Decimal::new(217, 2))
        );
    }

    #[test]
    fn preset_unit_price_falls_back_to_base() {
        let preset = PresetPrice::base(Decimal::from(1500))
            .with_variant("large", Decimal::from(2500))
            .with_addon("degreaser", Decimal::from(75));

        assert_eq!(preset.unit_price(None), Decimal::from(1500));
        assert_eq!(preset.unit_price(Some("LARGE")), Decimal::from(2500));
        assert_eq!(preset.unit_price(Some("huge")), Decimal::from(1500));
        assert_eq!(preset.addon_price("degreaser"), Decimal::from(75));
        assert_eq!(preset.addon_price("glitter"), Decimal::ZERO);
    }
}
