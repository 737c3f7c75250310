//! # Billing Period Converter
//!
//! Maps a visit frequency to monthly and annual multipliers and turns a
//! per-visit price into monthly recurring and contract-lifetime figures.
//!
//! # Multiplier Resolution
//!
//! ```text
//! explicit config multiplier  ->  derived from config cycle months  ->  static table
//! ```
//!
//! # Contract Totals
//!
//! | Frequency                    | Contract total                         |
//! |------------------------------|----------------------------------------|
//! | quarterly, biannual, annual  | per-visit x ceil(months / cycle)       |
//! | one-time                     | per-visit                              |
//! | everything else              | monthly recurring x months             |
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::{catalog, BillingTerms, EffectiveConfig};
//! use service_quote::domain::services::billing::BillingConverter;
//! use service_quote::domain::value_objects::{Frequency, Money};
//!
//! let config = EffectiveConfig::from_fallback(&catalog::power_washing());
//! let converter = BillingConverter::new(&config);
//! let figures = converter.convert(Money::dollars(100), &BillingTerms::new(Frequency::Weekly, 12));
//!
//! assert_eq!(figures.monthly_recurring, Money::dollars(433));
//! assert_eq!(figures.contract_total, Money::dollars(5196));
//! ```

use crate::domain::entities::effective_config::EffectiveConfig;
use crate::domain::entities::quote::BillingTerms;
use crate::domain::value_objects::arithmetic::div_ceil;
use crate::domain::value_objects::{Frequency, Money};
use rust_decimal::Decimal;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Billing figures derived from a per-visit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingFigures {
    /// Monthly-equivalent recurring amount.
    pub monthly_recurring: Money,
    /// Contract-lifetime total.
    pub contract_total: Money,
    /// Visits over the contract.
    pub visits_in_contract: Decimal,
    /// Contract length used.
    pub contract_months: u32,
}

/// Frequency converter bound to one effective configuration.
#[derive(Debug, Clone, Copy)]
pub struct BillingConverter<'a> {
    config: &'a EffectiveConfig,
}

impl<'a> BillingConverter<'a> {
    /// Creates a converter reading conversions from `config`.
    #[must_use]
    pub const fn new(config: &'a EffectiveConfig) -> Self {
        Self { config }
    }

    fn configured_cycle(&self, frequency: Frequency) -> Option<Decimal> {
        self.config
            .billing(frequency)
            .and_then(|conversion| conversion.cycle_months)
            .filter(|months| *months > Decimal::ZERO)
    }

    /// Monthly-equivalent multiplier for a frequency.
    #[must_use]
    pub fn monthly_multiplier(&self, frequency: Frequency) -> Decimal {
        if let Some(explicit) = self
            .config
            .billing(frequency)
            .and_then(|conversion| conversion.monthly_multiplier)
        {
            return explicit;
        }
        self.configured_cycle(frequency)
            .and_then(|cycle| Decimal::ONE.checked_div(cycle))
            .unwrap_or_else(|| frequency.default_monthly_multiplier())
    }

    /// Visits-per-year multiplier for a frequency.
    #[must_use]
    pub fn annual_multiplier(&self, frequency: Frequency) -> Decimal {
        if let Some(explicit) = self
            .config
            .billing(frequency)
            .and_then(|conversion| conversion.annual_multiplier)
        {
            return explicit;
        }
        self.configured_cycle(frequency)
            .and_then(|cycle| MONTHS_PER_YEAR.checked_div(cycle))
            .unwrap_or_else(|| frequency.default_annual_multiplier())
    }

    /// Cycle length of a visit-based frequency, config first.
    #[must_use]
    pub fn cycle_months(&self, frequency: Frequency) -> Option<Decimal> {
        if !frequency.is_visit_based() {
            return None;
        }
        self.configured_cycle(frequency)
            .or_else(|| frequency.cycle_months().map(Decimal::from))
    }

    /// Number of visits over a contract.
    ///
    /// Visit-based frequencies round up to whole visits; one-time is a
    /// single visit; other frequencies scale the monthly multiplier.
    #[must_use]
    pub fn visits_in_contract(&self, frequency: Frequency, contract_months: u32) -> Decimal {
        let months = Decimal::from(contract_months);
        if frequency.is_one_time() {
            return Decimal::ONE;
        }
        match self.cycle_months(frequency) {
            Some(cycle) => div_ceil(months, cycle).unwrap_or(Decimal::ZERO),
            None => self
                .monthly_multiplier(frequency)
                .saturating_mul(months)
                .normalize(),
        }
    }

    /// Converts a per-visit price into billing figures.
    #[must_use]
    pub fn convert(&self, per_visit: Money, terms: &BillingTerms) -> BillingFigures {
        let frequency = terms.frequency;
        let contract_months = terms.contract_months_or(self.config.default_contract_months());
        let monthly_recurring = per_visit.times(self.monthly_multiplier(frequency));
        let visits_in_contract = self.visits_in_contract(frequency, contract_months);

        let contract_total = if frequency.is_one_time() {
            per_visit
        } else if frequency.is_visit_based() {
            per_visit.times(visits_in_contract)
        } else {
            monthly_recurring.times(Decimal::from(contract_months))
        };

        BillingFigures {
            monthly_recurring,
            contract_total,
            visits_in_contract,
            contract_months,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::catalog;
    use crate::domain::entities::service_config::{BillingConversion, RateTree, ServiceConfig};

    fn fallback() -> EffectiveConfig {
        EffectiveConfig::from_fallback(&catalog::power_washing())
    }

    fn with_conversion(label: &str, conversion: BillingConversion) -> EffectiveConfig {
        let schema = catalog::power_washing();
        let mut rates = RateTree::default();
        rates.billing_conversions.insert(label.to_string(), conversion);
        let doc = ServiceConfig::active(schema.service_id().clone(), 1, rates);
        EffectiveConfig::from_layers(&schema, None, Some(&doc))
    }

    mod multipliers {
        use super::*;

        #[test]
        fn static_table_applies_without_config() {
            let config = fallback();
            let converter = BillingConverter::new(&config);
            assert_eq!(converter.monthly_multiplier(Frequency::Weekly), Decimal::new(433, 2));
            assert_eq!(converter.monthly_multiplier(Frequency::OneTime), Decimal::ZERO);
            assert_eq!(converter.annual_multiplier(Frequency::Biweekly), Decimal::from(26));
        }

        #[test]
        fn explicit_multiplier_wins_over_cycle() {
            let config = with_conversion(
                "weekly",
                BillingConversion {
                    monthly_multiplier: Some(Decimal::new(4345, 3)),
                    annual_multiplier: None,
                    cycle_months: Some(Decimal::from(2)),
                },
            );
            let converter = BillingConverter::new(&config);
            assert_eq!(converter.monthly_multiplier(Frequency::Weekly), Decimal::new(4345, 3));
            assert_eq!(converter.annual_multiplier(Frequency::Weekly), Decimal::from(6));
        }

        #[test]
        fn cycle_months_derive_both_multipliers() {
            let config = with_conversion(
                "bimonthly",
                BillingConversion {
                    cycle_months: Some(Decimal::from(2)),
                    ..BillingConversion::default()
                },
            );
            let converter = BillingConverter::new(&config);
            assert_eq!(converter.monthly_multiplier(Frequency::Bimonthly), Decimal::new(5, 1));
            assert_eq!(converter.annual_multiplier(Frequency::Bimonthly), Decimal::from(6));
        }

        #[test]
        fn monthly_multiplier_is_monotonic_by_frequency() {
            let config = fallback();
            let converter = BillingConverter::new(&config);
            let ordered = [
                Frequency::Weekly,
                Frequency::Biweekly,
                Frequency::Monthly,
                Frequency::Bimonthly,
                Frequency::Quarterly,
                Frequency::Biannual,
                Frequency::Annual,
                Frequency::OneTime,
            ];
            let multipliers: Vec<Decimal> = ordered
                .iter()
                .map(|f| converter.monthly_multiplier(*f))
                .collect();
            assert!(multipliers.windows(2).all(|w| w.first() > w.last()));
        }
    }

    mod visits {
        use super::*;

        #[test]
        fn visit_based_rounds_up() {
            let config = fallback();
            let converter = BillingConverter::new(&config);
            assert_eq!(converter.visits_in_contract(Frequency::Quarterly, 12), Decimal::from(4));
            assert_eq!(converter.visits_in_contract(Frequency::Quarterly, 10), Decimal::from(4));
            assert_eq!(converter.visits_in_contract(Frequency::Biannual, 12), Decimal::from(2));
            assert_eq!(converter.visits_in_contract(Frequency::Annual, 18), Decimal::from(2));
        }

        #[test]
        fn one_time_is_single_visit() {
            let config = fallback();
            let converter = BillingConverter::new(&config);
            assert_eq!(converter.visits_in_contract(Frequency::OneTime, 36), Decimal::ONE);
        }

        #[test]
        fn smooth_frequencies_scale_monthly_multiplier() {
            let config = fallback();
            let converter = BillingConverter::new(&config);
            assert_eq!(
                converter.visits_in_contract(Frequency::Weekly, 12),
                Decimal::new(5196, 2)
            );
        }
    }

    mod contract_total {
        use super::*;

        #[test]
        fn weekly_uses_monthly_recurring() {
            let config = fallback();
            let figures = BillingConverter::new(&config)
                .convert(Money::dollars(100), &BillingTerms::new(Frequency::Weekly, 12));
            assert_eq!(figures.monthly_recurring.to_string(), "$433.00");
            assert_eq!(figures.contract_total.to_string(), "$5,196.00");
        }

        #[test]
        fn quarterly_uses_visits() {
            let config = fallback();
            let figures = BillingConverter::new(&config)
                .convert(Money::dollars(300), &BillingTerms::new(Frequency::Quarterly, 12));
            assert_eq!(figures.visits_in_contract, Decimal::from(4));
            assert_eq!(figures.contract_total, Money::dollars(1200));
            assert_eq!(figures.monthly_recurring, Money::new(Decimal::new(9990, 2)));
        }

        #[test]
        fn one_time_contract_is_one_visit() {
            let config = fallback();
            let figures = BillingConverter::new(&config)
                .convert(Money::dollars(250), &BillingTerms::new(Frequency::OneTime, 12));
            assert_eq!(figures.monthly_recurring, Money::ZERO);
            assert_eq!(figures.contract_total, Money::dollars(250));
        }

        #[test]
        fn missing_contract_months_use_config_default() {
            let config = fallback();
            let terms = BillingTerms {
                frequency: Frequency::Monthly,
                contract_months: None,
            };
            let figures = BillingConverter::new(&config).convert(Money::dollars(100), &terms);
            assert_eq!(figures.contract_months, 12);
            assert_eq!(figures.contract_total, Money::dollars(1200));
        }
    }
}
