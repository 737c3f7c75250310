//! # Input Clamping and Rounding
//!
//! Numeric boundary helpers for the quote engine.
//!
//! This module provides:
//! - [`clamp_input`] - Converts raw user input into a safe, non-negative [`Decimal`]
//! - [`non_negative`] - Clamps an already-decimal value into the accepted range
//! - [`round_money`] - Rounds an amount to cents
//! - [`div_ceil`] - Division rounded up to a whole number
//!
//! Every value entering a strategy evaluator passes through one of the clamp
//! functions, so evaluators never see NaN, infinities or negative quantities.
//!
//! # Examples
//!
//! ```
//! use service_quote::domain::value_objects::arithmetic::clamp_input;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(clamp_input(f64::NAN), Decimal::ZERO);
//! assert_eq!(clamp_input(-4.0), Decimal::ZERO);
//! assert_eq!(clamp_input(2.5), Decimal::new(25, 1));
//! ```

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Largest accepted input value.
///
/// Anything above is clamped down, which keeps every product of two inputs
/// far inside `Decimal`'s range.
pub const MAX_INPUT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Number of decimal places for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,

    /// Invalid value provided (e.g., negative when positive required).
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Divides and rounds the quotient up to a whole number.
///
/// # Examples
///
/// ```
/// use service_quote::domain::value_objects::arithmetic::div_ceil;
/// use rust_decimal::Decimal;
///
/// // 10 months of a quarterly contract bill 4 visits
/// let visits = div_ceil(Decimal::new(10, 0), Decimal::new(3, 0)).unwrap();
/// assert_eq!(visits, Decimal::new(4, 0));
/// ```
///
/// # Errors
///
/// Returns `ArithmeticError::DivisionByZero` if the denominator is zero.
#[inline]
#[must_use = "this returns the result of the operation, without modifying the original"]
pub fn div_ceil(numerator: Decimal, denominator: Decimal) -> ArithmeticResult<Decimal> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }

    numerator
        .checked_div(denominator)
        .map(|quotient| quotient.ceil())
        .ok_or(ArithmeticError::InvalidValue("quotient out of range"))
}

/// Converts a raw numeric input into a non-negative decimal.
///
/// Non-finite and negative values become zero; values above [`MAX_INPUT`]
/// are clamped to it.
#[must_use]
pub fn clamp_input(value: f64) -> Decimal {
    if !value.is_finite() || value <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).map_or(MAX_INPUT, non_negative)
}

/// Clamps a decimal into `0..=MAX_INPUT`.
#[inline]
#[must_use]
pub fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else if value > MAX_INPUT {
        MAX_INPUT
    } else {
        value.normalize()
    }
}

/// Rounds an amount to cents, midpoint away from zero.
#[inline]
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod arithmetic_error {
        use super::*;

        #[test]
        fn display_formats_correctly() {
            assert_eq!(
                ArithmeticError::DivisionByZero.to_string(),
                "division by zero"
            );
            assert_eq!(
                ArithmeticError::InvalidValue("negative").to_string(),
                "invalid value: negative"
            );
        }
    }

    mod div_ceil_tests {
        use super::*;

        #[test]
        fn exact_quotient_is_unchanged() {
            let result = div_ceil(Decimal::new(12, 0), Decimal::new(3, 0)).unwrap();
            assert_eq!(result, Decimal::new(4, 0));
        }

        #[test]
        fn partial_cycle_rounds_up() {
            let result = div_ceil(Decimal::new(2, 0), Decimal::new(3, 0)).unwrap();
            assert_eq!(result, Decimal::ONE);
        }

        #[test]
        fn by_zero_fails() {
            let result = div_ceil(Decimal::new(10, 0), Decimal::ZERO);
            assert_eq!(result, Err(ArithmeticError::DivisionByZero));
        }
    }

    mod clamping {
        use super::*;

        #[test]
        fn non_finite_becomes_zero() {
            assert_eq!(clamp_input(f64::NAN), Decimal::ZERO);
            assert_eq!(clamp_input(f64::INFINITY), Decimal::ZERO);
            assert_eq!(clamp_input(f64::NEG_INFINITY), Decimal::ZERO);
        }

        #[test]
        fn negative_becomes_zero() {
            assert_eq!(clamp_input(-0.01), Decimal::ZERO);
            assert_eq!(non_negative(Decimal::new(-5, 0)), Decimal::ZERO);
        }

        #[test]
        fn fractional_input_is_kept() {
            assert_eq!(clamp_input(0.6), Decimal::new(6, 1));
            assert_eq!(clamp_input(1000.0), Decimal::new(1000, 0));
        }

        #[test]
        fn huge_input_is_capped() {
            assert_eq!(clamp_input(1e30), MAX_INPUT);
            assert_eq!(non_negative(MAX_INPUT + Decimal::ONE), MAX_INPUT);
        }
    }

    #[test]
    fn round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_money(Decimal::new(12344, 3)), Decimal::new(1234, 2));
    }
}
