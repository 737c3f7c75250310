//! # Domain Enums
//!
//! Enumeration types for pricing concepts.
//!
//! - [`PricingType`] - The strategy used to price one area
//! - [`Frequency`] - How often the service visit recurs
//! - [`ConfigTier`] - Which configuration source a rate table came from
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercases and strips separators so `"Bi-Weekly"`, `"bi weekly"` and
/// `"BIWEEKLY"` compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '\t'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Pricing strategy selected for one area.
///
/// # Examples
///
/// ```
/// use service_quote::domain::value_objects::enums::PricingType;
///
/// let strategy: PricingType = "per-worker".parse().unwrap();
/// assert_eq!(strategy, PricingType::PerWorker);
/// assert!(strategy.is_labour());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum PricingType {
    /// Named package price from the area-specific pricing table.
    #[default]
    Preset = 0,
    /// Number of workers times a per-worker rate.
    PerWorker = 1,
    /// Number of hours times an hourly rate.
    PerHour = 2,
    /// Fixed fee plus inside/outside square footage rates.
    SquareFeet = 3,
    /// Salesperson-entered amount.
    Custom = 4,
}

impl PricingType {
    /// All strategies, in display order.
    pub const ALL: [Self; 5] = [
        Self::Preset,
        Self::PerWorker,
        Self::PerHour,
        Self::SquareFeet,
        Self::Custom,
    ];

    /// Returns true for strategies whose cost is raw labour/material and
    /// therefore subject to the minimum visit charge.
    #[inline]
    #[must_use]
    pub const fn is_labour(self) -> bool {
        matches!(self, Self::PerWorker | Self::PerHour | Self::SquareFeet)
    }

    /// Plain-language name used in the quote breakdown.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Preset => "preset package",
            Self::PerWorker => "per worker",
            Self::PerHour => "per hour",
            Self::SquareFeet => "square footage",
            Self::Custom => "custom price",
        }
    }
}

impl fmt::Display for PricingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset => write!(f, "PRESET"),
            Self::PerWorker => write!(f, "PER_WORKER"),
            Self::PerHour => write!(f, "PER_HOUR"),
            Self::SquareFeet => write!(f, "SQUARE_FEET"),
            Self::Custom => write!(f, "CUSTOM"),
        }
    }
}

impl FromStr for PricingType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "preset" | "package" => Ok(Self::Preset),
            "perworker" | "worker" | "workers" => Ok(Self::PerWorker),
            "perhour" | "hourly" | "hours" => Ok(Self::PerHour),
            "squarefeet" | "sqft" | "squarefootage" => Ok(Self::SquareFeet),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseEnumError::InvalidValue("PricingType", s.to_string())),
        }
    }
}

/// Service visit frequency.
///
/// Labels are parsed case, hyphen, underscore and space insensitively.
///
/// # Examples
///
/// ```
/// use service_quote::domain::value_objects::enums::Frequency;
///
/// let freq: Frequency = "Bi-Weekly".parse().unwrap();
/// assert_eq!(freq, Frequency::Biweekly);
/// assert_eq!(Frequency::Quarterly.cycle_months(), Some(3));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case", try_from = "String")]
#[repr(u8)]
pub enum Frequency {
    /// Every week.
    Weekly = 0,
    /// Every two weeks.
    Biweekly = 1,
    /// Once a month.
    #[default]
    Monthly = 2,
    /// Every two months.
    Bimonthly = 3,
    /// Every three months.
    Quarterly = 4,
    /// Every six months.
    Biannual = 5,
    /// Once a year.
    Annual = 6,
    /// A single visit, no recurrence.
    OneTime = 7,
}

impl Frequency {
    /// All frequencies, most to least frequent.
    pub const ALL: [Self; 8] = [
        Self::Weekly,
        Self::Biweekly,
        Self::Monthly,
        Self::Bimonthly,
        Self::Quarterly,
        Self::Biannual,
        Self::Annual,
        Self::OneTime,
    ];

    /// Canonical config-table key (`"weekly"`, `"one-time"`, ...).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Bimonthly => "bimonthly",
            Self::Quarterly => "quarterly",
            Self::Biannual => "biannual",
            Self::Annual => "annual",
            Self::OneTime => "one-time",
        }
    }

    /// Static monthly-equivalent multiplier.
    #[must_use]
    pub fn default_monthly_multiplier(self) -> Decimal {
        match self {
            Self::Weekly => Decimal::new(433, 2),
            Self::Biweekly => Decimal::new(2165, 3),
            Self::Monthly => Decimal::ONE,
            Self::Bimonthly => Decimal::new(5, 1),
            Self::Quarterly => Decimal::new(333, 3),
            Self::Biannual => Decimal::new(167, 3),
            Self::Annual => Decimal::new(83, 3),
            Self::OneTime => Decimal::ZERO,
        }
    }

    /// Static visits-per-year multiplier.
    #[must_use]
    pub fn default_annual_multiplier(self) -> Decimal {
        match self {
            Self::Weekly => Decimal::from(52),
            Self::Biweekly => Decimal::from(26),
            Self::Monthly => Decimal::from(12),
            Self::Bimonthly => Decimal::from(6),
            Self::Quarterly => Decimal::from(4),
            Self::Biannual => Decimal::from(2),
            Self::Annual => Decimal::ONE,
            Self::OneTime => Decimal::ZERO,
        }
    }

    /// Cycle length in months for frequencies billed per discrete visit.
    ///
    /// Returns `None` for frequencies modeled as a smooth monthly rate.
    #[must_use]
    pub const fn cycle_months(self) -> Option<u32> {
        match self {
            Self::Quarterly => Some(3),
            Self::Biannual => Some(6),
            Self::Annual => Some(12),
            _ => None,
        }
    }

    /// Returns true if the contract total is computed from a visit count.
    #[inline]
    #[must_use]
    pub const fn is_visit_based(self) -> bool {
        self.cycle_months().is_some()
    }

    /// Returns true for a single, non-recurring visit.
    #[inline]
    #[must_use]
    pub const fn is_one_time(self) -> bool {
        matches!(self, Self::OneTime)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Frequency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "weekly" | "everyweek" => Ok(Self::Weekly),
            "biweekly" | "everytwoweeks" | "fortnightly" => Ok(Self::Biweekly),
            "monthly" | "everymonth" => Ok(Self::Monthly),
            "bimonthly" | "everytwomonths" => Ok(Self::Bimonthly),
            "quarterly" | "everythreemonths" => Ok(Self::Quarterly),
            "biannual" | "biannually" | "semiannual" | "semiannually" => Ok(Self::Biannual),
            "annual" | "annually" | "yearly" => Ok(Self::Annual),
            "onetime" | "once" => Ok(Self::OneTime),
            _ => Err(ParseEnumError::InvalidValue("Frequency", s.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Source tier a rate table was resolved from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ConfigTier {
    /// Freshly fetched active configuration.
    Remote = 0,
    /// Previously loaded configuration held by the shared services context.
    Cached = 1,
    /// Compiled-in fallback constants.
    Static = 2,
}

impl ConfigTier {
    /// Returns true when pricing may be stale.
    #[inline]
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        !matches!(self, Self::Remote)
    }
}

impl fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "REMOTE"),
            Self::Cached => write!(f, "CACHED"),
            Self::Static => write!(f, "STATIC"),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
