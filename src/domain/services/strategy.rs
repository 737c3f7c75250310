//! # Pricing Strategies
//!
//! One evaluator per pricing strategy, each turning an area's state and the
//! effective configuration into a tagged [`AreaCost`].
//!
//! # Evaluation Order
//!
//! ```text
//! disabled?            -> Inactive
//! custom_amount > 0?   -> Package(custom_amount)
//! otherwise            -> strategy_for(pricing_type).evaluate(..)
//! ```
//!
//! Package costs already include trip and minimum bundling. Labour costs
//! are raw and go through minimum enforcement when they carry activity.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::entities::{catalog, AreaField, AreaState, EffectiveConfig};
//! use service_quote::domain::services::strategy::{evaluate_area, AreaCost};
//! use service_quote::domain::value_objects::{AreaKey, PricingType};
//! use rust_decimal::Decimal;
//!
//! let config = EffectiveConfig::from_fallback(&catalog::power_washing());
//! let area = AreaState::new(AreaKey::new("dumpster"), "Dumpster Pad")
//!     .enabled()
//!     .with_pricing_type(PricingType::PerWorker)
//!     .with_value(AreaField::Workers, Decimal::from(2));
//!
//! let evaluation = evaluate_area(&area, &config);
//! assert_eq!(evaluation.cost, AreaCost::labour(Decimal::from(400)));
//! ```

use crate::domain::entities::area_state::{AreaState, override_or};
use crate::domain::entities::effective_config::EffectiveConfig;
use crate::domain::value_objects::PricingType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged cost of one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AreaCost {
    /// Area is disabled; contributes nothing.
    Inactive,
    /// Bundled price, exempt from minimum and trip charge.
    Package {
        /// Package amount.
        amount: Decimal,
    },
    /// Raw labour or material cost.
    Labour {
        /// Computed amount.
        amount: Decimal,
        /// Whether a nonzero driving quantity produced a nonzero cost.
        activity: bool,
    },
}

impl AreaCost {
    /// Creates a package cost.
    #[must_use]
    pub fn package(amount: Decimal) -> Self {
        Self::Package { amount }
    }

    /// Creates a labour cost. Zero is "no service" and carries no activity.
    #[must_use]
    pub fn labour(amount: Decimal) -> Self {
        Self::Labour {
            amount,
            activity: amount > Decimal::ZERO,
        }
    }

    /// Returns the amount, zero when inactive.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Inactive => Decimal::ZERO,
            Self::Package { amount } | Self::Labour { amount, .. } => *amount,
        }
    }

    /// Returns true for labour costs.
    #[must_use]
    pub const fn is_labour(&self) -> bool {
        matches!(self, Self::Labour { .. })
    }

    /// Returns true for labour costs with activity.
    #[must_use]
    pub const fn has_activity(&self) -> bool {
        matches!(self, Self::Labour { activity: true, .. })
    }
}

impl fmt::Display for AreaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Package { amount } => write!(f, "package {amount}"),
            Self::Labour { amount, activity } => write!(f, "labour {amount} (active={activity})"),
        }
    }
}

/// Trait for pricing strategy evaluators.
///
/// Implementations are pure: the same area and configuration always yield
/// the same cost.
pub trait PricingStrategy: Send + Sync + fmt::Debug {
    /// Evaluates an enabled area without a custom amount.
    fn evaluate(&self, area: &AreaState, config: &EffectiveConfig) -> AreaCost;

    /// Returns the pricing type implemented.
    fn pricing_type(&self) -> PricingType;

    /// Returns the name of this strategy.
    fn name(&self) -> &'static str;

    /// Plain-language description used in breakdown lines.
    fn describe(&self) -> &'static str {
        self.pricing_type().description()
    }
}

/// Package price lookup with variant and add-ons.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetStrategy;

impl PricingStrategy for PresetStrategy {
    fn evaluate(&self, area: &AreaState, config: &EffectiveConfig) -> AreaCost {
        let Some(preset) = config.preset(area.key()) else {
            return AreaCost::package(Decimal::ZERO);
        };
        let addons = area
            .addons()
            .iter()
            .map(|addon| preset.addon_price(addon))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let unit = preset.unit_price(area.variant()).saturating_add(addons);
        AreaCost::package(unit.saturating_mul(area.quantity()))
    }

    fn pricing_type(&self) -> PricingType {
        PricingType::Preset
    }

    fn name(&self) -> &'static str {
        "Preset"
    }
}

/// `workers x worker rate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerWorkerStrategy;

impl PricingStrategy for PerWorkerStrategy {
    fn evaluate(&self, area: &AreaState, config: &EffectiveConfig) -> AreaCost {
        let workers = area.workers();
        if workers.is_zero() {
            return AreaCost::labour(Decimal::ZERO);
        }
        let rate = override_or(area.overrides().worker_rate, config.core().worker_rate);
        AreaCost::labour(workers.saturating_mul(rate))
    }

    fn pricing_type(&self) -> PricingType {
        PricingType::PerWorker
    }

    fn name(&self) -> &'static str {
        "PerWorker"
    }
}

/// `hours x hourly rate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerHourStrategy;

impl PricingStrategy for PerHourStrategy {
    fn evaluate(&self, area: &AreaState, config: &EffectiveConfig) -> AreaCost {
        let hours = area.hours();
        if hours.is_zero() {
            return AreaCost::labour(Decimal::ZERO);
        }
        let rate = override_or(area.overrides().hourly_rate, config.core().hourly_rate);
        AreaCost::labour(hours.saturating_mul(rate))
    }

    fn pricing_type(&self) -> PricingType {
        PricingType::PerHour
    }

    fn name(&self) -> &'static str {
        "PerHour"
    }
}

/// `fixed fee + inside x inside rate + outside x outside rate`.
///
/// The fixed fee only applies when some square footage is priced.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareFeetStrategy;

impl PricingStrategy for SquareFeetStrategy {
    fn evaluate(&self, area: &AreaState, config: &EffectiveConfig) -> AreaCost {
        let inside = area.inside_sq_ft();
        let outside = area.outside_sq_ft();
        if inside.is_zero() && outside.is_zero() {
            return AreaCost::labour(Decimal::ZERO);
        }

        let rates = config.square_footage();
        let overrides = area.overrides();
        let fixed_fee = override_or(overrides.fixed_fee, rates.fixed_fee);
        let inside_rate = override_or(overrides.inside_rate, rates.inside_rate);
        let outside_rate = override_or(overrides.outside_rate, rates.outside_rate);

        AreaCost::labour(
            fixed_fee
                .saturating_add(inside.saturating_mul(inside_rate))
                .saturating_add(outside.saturating_mul(outside_rate)),
        )
    }

    fn pricing_type(&self) -> PricingType {
        PricingType::SquareFeet
    }

    fn name(&self) -> &'static str {
        "SquareFeet"
    }
}

/// Salesperson-entered price.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomStrategy;

impl PricingStrategy for CustomStrategy {
    fn evaluate(&self, area: &AreaState, _config: &EffectiveConfig) -> AreaCost {
        AreaCost::package(area.custom_amount())
    }

    fn pricing_type(&self) -> PricingType {
        PricingType::Custom
    }

    fn name(&self) -> &'static str {
        "Custom"
    }
}

static PRESET: PresetStrategy = PresetStrategy;
static PER_WORKER: PerWorkerStrategy = PerWorkerStrategy;
static PER_HOUR: PerHourStrategy = PerHourStrategy;
static SQUARE_FEET: SquareFeetStrategy = SquareFeetStrategy;
static CUSTOM: CustomStrategy = CustomStrategy;

/// Returns the evaluator for a pricing type.
#[must_use]
pub fn strategy_for(pricing_type: PricingType) -> &'static dyn PricingStrategy {
    match pricing_type {
        PricingType::Preset => &PRESET,
        PricingType::PerWorker => &PER_WORKER,
        PricingType::PerHour => &PER_HOUR,
        PricingType::SquareFeet => &SQUARE_FEET,
        PricingType::Custom => &CUSTOM,
    }
}

/// Cost of one area together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Strategy that produced the cost; `Custom` when a custom amount won.
    pub pricing_type: PricingType,
    /// Tagged cost.
    pub cost: AreaCost,
}

/// Evaluates one area.
///
/// A disabled area is `Inactive` regardless of its quantities. A positive
/// custom amount wins over every strategy.
#[must_use]
pub fn evaluate_area(area: &AreaState, config: &EffectiveConfig) -> Evaluation {
    if !area.is_enabled() {
        return Evaluation {
            pricing_type: area.pricing_type(),
            cost: AreaCost::Inactive,
        };
    }

    let custom = area.custom_amount();
    if custom > Decimal::ZERO {
        return Evaluation {
            pricing_type: PricingType::Custom,
            cost: AreaCost::package(custom),
        };
    }

    let strategy = strategy_for(area.pricing_type());
    Evaluation {
        pricing_type: strategy.pricing_type(),
        cost: strategy.evaluate(area, config),
    }
}
