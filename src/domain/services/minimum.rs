//! # Minimum and Trip-Charge Enforcement
//!
//! The same floor function is applied at two scopes: once per labour area,
//! then once to the whole-quote subtotal. A bumped area contributes its
//! bumped value to the subtotal; the whole-quote floor only lifts the sum.
//!
//! The trip charge applies once per visit to quotes with labour activity.
//! Packages are trip-inclusive and never trigger it.

use crate::domain::entities::effective_config::CoreRates;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifts `cost` to `minimum` when there is activity and the cost is below it.
///
/// # Examples
///
/// ```
/// use service_quote::domain::services::minimum::enforce_minimum;
/// use rust_decimal::Decimal;
///
/// let minimum = Decimal::from(475);
/// assert_eq!(enforce_minimum(Decimal::from(200), true, minimum), minimum);
/// assert_eq!(enforce_minimum(Decimal::from(800), true, minimum), Decimal::from(800));
/// assert_eq!(enforce_minimum(Decimal::ZERO, false, minimum), Decimal::ZERO);
/// ```
#[inline]
#[must_use]
pub fn enforce_minimum(cost: Decimal, has_activity: bool, minimum: Decimal) -> Decimal {
    if has_activity && cost < minimum {
        minimum
    } else {
        cost
    }
}

/// Reason a trip charge was not added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripWaiver {
    /// The quote is all-inclusive.
    AllInclusive,
    /// The labour subtotal reached the volume threshold.
    VolumeThreshold,
}

impl fmt::Display for TripWaiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllInclusive => write!(f, "all-inclusive"),
            Self::VolumeThreshold => write!(f, "volume threshold reached"),
        }
    }
}

/// Outcome of the trip-charge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TripDecision {
    /// The service does not model a trip charge, or the quote has no labour.
    NotApplicable,
    /// Added once to the visit.
    Charged {
        /// Charge amount.
        amount: Decimal,
    },
    /// Would apply but was waived.
    Waived {
        /// Why it was waived.
        reason: TripWaiver,
    },
}

impl TripDecision {
    /// Returns the amount added to the visit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Charged { amount } => *amount,
            Self::NotApplicable | Self::Waived { .. } => Decimal::ZERO,
        }
    }
}

/// Decides the trip charge for one visit.
///
/// `labour_subtotal` is the sum of labour area costs after the per-area
/// minimum. A waive threshold of zero disables the volume waiver.
#[must_use]
pub fn trip_charge(
    core: &CoreRates,
    has_labour_activity: bool,
    labour_subtotal: Decimal,
    all_inclusive: bool,
) -> TripDecision {
    if core.trip_charge <= Decimal::ZERO || !has_labour_activity {
        return TripDecision::NotApplicable;
    }
    if all_inclusive {
        return TripDecision::Waived {
            reason: TripWaiver::AllInclusive,
        };
    }
    let threshold = core.trip_waive_threshold;
    if threshold > Decimal::ZERO && labour_subtotal >= threshold {
        return TripDecision::Waived {
            reason: TripWaiver::VolumeThreshold,
        };
    }
    TripDecision::Charged {
        amount: core.trip_charge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> CoreRates {
        CoreRates {
            worker_rate: Decimal::from(200),
            hourly_rate: Decimal::from(125),
            minimum_visit: Decimal::from(475),
            trip_charge: Decimal::from(75),
            trip_waive_threshold: Decimal::from(1500),
        }
    }

    mod minimum {
        use super::*;

        #[test]
        fn lifts_active_cost_below_floor() {
            let min = Decimal::from(475);
            assert_eq!(enforce_minimum(Decimal::from(200), true, min), min);
            assert_eq!(enforce_minimum(Decimal::from(475), true, min), min);
        }

        #[test]
        fn leaves_cost_at_or_above_floor() {
            let min = Decimal::from(475);
            assert_eq!(enforce_minimum(Decimal::from(476), true, min), Decimal::from(476));
        }

        #[test]
        fn ignores_inactive_cost() {
            let min = Decimal::from(475);
            assert_eq!(enforce_minimum(Decimal::ZERO, false, min), Decimal::ZERO);
            assert_eq!(enforce_minimum(Decimal::from(10), false, min), Decimal::from(10));
        }
    }

    mod trip {
        use super::*;

        #[test]
        fn charged_for_labour_below_threshold() {
            let decision = trip_charge(&core(), true, Decimal::from(600), false);
            assert_eq!(decision, TripDecision::Charged { amount: Decimal::from(75) });
            assert_eq!(decision.amount(), Decimal::from(75));
        }

        #[test]
        fn waived_when_all_inclusive() {
            let decision = trip_charge(&core(), true, Decimal::from(600), true);
            assert_eq!(
                decision,
                TripDecision::Waived { reason: TripWaiver::AllInclusive }
            );
            assert_eq!(decision.amount(), Decimal::ZERO);
        }

        #[test]
        fn waived_at_volume_threshold() {
            let decision = trip_charge(&core(), true, Decimal::from(1500), false);
            assert_eq!(
                decision,
                TripDecision::Waived { reason: TripWaiver::VolumeThreshold }
            );
        }

        #[test]
        fn zero_threshold_never_waives() {
            let mut core = core();
            core.trip_waive_threshold = Decimal::ZERO;
            let decision = trip_charge(&core, true, Decimal::from(1_000_000), false);
            assert_eq!(decision.amount(), Decimal::from(75));
        }

        #[test]
        fn not_applicable_without_labour_or_charge() {
            assert_eq!(
                trip_charge(&core(), false, Decimal::ZERO, false),
                TripDecision::NotApplicable
            );

            let mut core = core();
            core.trip_charge = Decimal::ZERO;
            assert_eq!(
                trip_charge(&core, true, Decimal::from(600), false),
                TripDecision::NotApplicable
            );
        }
    }
}
