//! # Quote Aggregation
//!
//! Turns a [`QuoteRequest`] and an [`EffectiveConfig`] into a
//! [`QuoteResult`].
//!
//! # Pipeline
//!
//! ```text
//! per enabled area: evaluate -> area minimum (labour only) -> accumulate
//! subtotal > 0?   : whole-quote minimum
//! labour present? : trip charge (unless waived)
//! per-visit price : billing conversion -> monthly recurring, contract total
//! ```
//!
//! Aggregation is synchronous and pure: identical inputs always produce
//! identical results, and a quote with no active area prices at exactly zero.

use crate::domain::entities::effective_config::EffectiveConfig;
use crate::domain::entities::quote::{AreaLine, QuoteRequest, QuoteResult};
use crate::domain::services::billing::BillingConverter;
use crate::domain::services::minimum::{TripDecision, enforce_minimum, trip_charge};
use crate::domain::services::strategy::{AreaCost, evaluate_area};
use crate::domain::value_objects::Money;
use rust_decimal::Decimal;

/// Configuration for quote aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Whether to build human-readable breakdown lines.
    pub include_breakdown: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            include_breakdown: true,
        }
    }
}

impl AggregationConfig {
    /// Enables or disables breakdown lines.
    #[must_use]
    pub fn with_breakdown(mut self, include_breakdown: bool) -> Self {
        self.include_breakdown = include_breakdown;
        self
    }
}

/// Engine summing area costs into a priced visit and billing figures.
#[derive(Debug, Clone, Default)]
pub struct QuoteAggregator {
    config: AggregationConfig,
}

impl QuoteAggregator {
    /// Creates an aggregator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregator with the given configuration.
    #[must_use]
    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Prices one quote.
    ///
    /// # Examples
    ///
    /// ```
    /// use service_quote::application::services::QuoteAggregator;
    /// use service_quote::domain::entities::{catalog, AreaField, AreaState, BillingTerms, EffectiveConfig, QuoteRequest};
    /// use service_quote::domain::value_objects::{AreaKey, Frequency, Money, PricingType};
    /// use rust_decimal::Decimal;
    ///
    /// let schema = catalog::power_washing();
    /// let config = EffectiveConfig::from_fallback(&schema);
    /// let request = QuoteRequest::new(schema.service_id().clone())
    ///     .with_area(
    ///         AreaState::new(AreaKey::new("dumpster"), "Dumpster Pad")
    ///             .enabled()
    ///             .with_value(AreaField::Quantity, Decimal::ONE),
    ///     )
    ///     .with_terms(BillingTerms::new(Frequency::Monthly, 12));
    ///
    /// let result = QuoteAggregator::new().aggregate(&request, &config);
    /// assert_eq!(result.per_visit_price, Money::dollars(475));
    /// assert!(result.minimum_applied);
    /// ```
    #[must_use]
    pub fn aggregate(&self, request: &QuoteRequest, config: &EffectiveConfig) -> QuoteResult {
        let minimum = config.core().minimum_visit;

        let mut area_lines = Vec::new();
        let mut subtotal = Decimal::ZERO;
        let mut labour_subtotal = Decimal::ZERO;
        let mut has_labour_activity = false;

        for area in request.areas() {
            let evaluation = evaluate_area(area, config);
            let raw = evaluation.cost.amount();
            let cost = match evaluation.cost {
                AreaCost::Inactive => continue,
                AreaCost::Package { amount } => amount,
                AreaCost::Labour { amount, activity } => {
                    let lifted = enforce_minimum(amount, activity, minimum);
                    if activity {
                        has_labour_activity = true;
                        labour_subtotal = labour_subtotal.saturating_add(lifted);
                    }
                    lifted
                }
            };
            subtotal = subtotal.saturating_add(cost);

            area_lines.push(AreaLine {
                key: area.key().clone(),
                label: area.label().to_string(),
                pricing_type: evaluation.pricing_type,
                raw_cost: Money::new(raw),
                cost: Money::new(cost),
                minimum_applied: cost != raw,
                is_labour: evaluation.cost.is_labour(),
            });
        }

        let visit = if subtotal > Decimal::ZERO {
            enforce_minimum(subtotal, true, minimum)
        } else {
            Decimal::ZERO
        };
        let minimum_applied = visit != subtotal;

        let trip = trip_charge(
            config.core(),
            has_labour_activity,
            labour_subtotal,
            request.is_all_inclusive(),
        );
        let per_visit_price = Money::new(visit.saturating_add(trip.amount()));

        let figures = BillingConverter::new(config).convert(per_visit_price, request.terms());

        let mut result = QuoteResult {
            service_id: request.service_id().clone(),
            per_visit_price,
            subtotal: Money::new(subtotal),
            monthly_recurring: figures.monthly_recurring,
            contract_total: figures.contract_total,
            visits_in_contract: figures.visits_in_contract,
            frequency: request.terms().frequency,
            contract_months: figures.contract_months,
            minimum_applied,
            trip_charge: Money::new(trip.amount()),
            config_tier: config.tier(),
            area_lines,
            details_breakdown: Vec::new(),
        };

        if self.config.include_breakdown {
            result.details_breakdown = breakdown(&result, Money::new(minimum), trip);
        }

        tracing::debug!(
            service_id = %result.service_id,
            tier = %result.config_tier,
            per_visit = %result.per_visit_price,
            "quote aggregated"
        );

        result
    }
}

fn breakdown(result: &QuoteResult, minimum: Money, trip: TripDecision) -> Vec<String> {
    let mut lines: Vec<String> = result
        .area_lines
        .iter()
        .filter(|line| !line.cost.is_zero())
        .map(|line| {
            let mut text = format!(
                "{}: {} ({})",
                line.label,
                line.cost,
                line.pricing_type.description()
            );
            if line.minimum_applied {
                text.push_str(&format!(", raised from {} to the visit minimum", line.raw_cost));
            }
            text
        })
        .collect();

    if result.minimum_applied {
        lines.push(format!("Visit minimum applied: {minimum}"));
    }

    match trip {
        TripDecision::Charged { .. } => lines.push(format!("Trip charge: {}", result.trip_charge)),
        TripDecision::Waived { reason } => lines.push(format!("Trip charge waived ({reason})")),
        TripDecision::NotApplicable => {}
    }

    if result.per_visit_price.is_zero() {
        return lines;
    }

    lines.push(format!("Per visit: {}", result.per_visit_price));
    if result.frequency.is_one_time() {
        lines.push(format!("One-time total: {}", result.contract_total));
    } else {
        lines.push(format!(
            "Monthly recurring ({}): {}",
            result.frequency.key(),
            result.monthly_recurring
        ));
        lines.push(format!(
            "Contract total ({} months, {} visits): {}",
            result.contract_months,
            result.visits_in_contract.round_dp(2).normalize(),
            result.contract_total
        ));
    }
    lines
}
