//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ServiceId`], [`AreaKey`]: String-based identifiers
//! - [`EventId`]: Change record identifier
//!
//! ## Numeric Types
//!
//! - [`Money`]: Non-negative amount rounded to cents
//! - [`arithmetic`]: Input clamping, rounding and division helpers
//!
//! ## Domain Enums
//!
//! - [`PricingType`]: Strategy used to price one area
//! - [`Frequency`]: Service visit frequency
//! - [`ConfigTier`]: Source tier of a resolved configuration

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod money;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, clamp_input, div_ceil};
pub use enums::{ConfigTier, Frequency, ParseEnumError, PricingType};
pub use ids::{AreaKey, EventId, ServiceId};
pub use money::Money;
pub use timestamp::Timestamp;
