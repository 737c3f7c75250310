//! # Money Value Object
//!
//! Non-negative monetary amount rounded to cents.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::value_objects::Money;
//! use rust_decimal::Decimal;
//!
//! let amount = Money::new(Decimal::new(519600, 2));
//! assert_eq!(amount.to_string(), "$5,196.00");
//! ```

use crate::domain::value_objects::arithmetic::{MONEY_SCALE, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A monetary amount in the quote currency.
///
/// # Invariants
///
/// - Never negative (negative inputs become zero)
/// - Always carries exactly two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount, rounding to cents and flooring at zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            return Self::ZERO;
        }
        let mut rounded = round_money(amount);
        rounded.rescale(MONEY_SCALE);
        Self(rounded)
    }

    /// Creates an amount from whole dollars.
    #[must_use]
    pub fn dollars(amount: i64) -> Self {
        Self::new(Decimal::from(amount))
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by a factor and rounds back to cents.
    #[must_use]
    pub fn times(&self, factor: Decimal) -> Self {
        Self::new(self.0.saturating_mul(factor))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        write!(f, "${}.{}", grouped, cents)
    }
}
