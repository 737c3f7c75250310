//! # Domain Services
//!
//! Pure pricing rules that don't naturally belong to a single entity.
//!
//! ## Services
//!
//! - [`strategy`]: per-strategy area evaluators producing a tagged [`AreaCost`]
//! - [`minimum`]: minimum-visit floor and trip-charge decision
//! - [`billing`]: frequency to monthly and contract conversion

pub mod billing;
pub mod minimum;
pub mod strategy;

pub use billing::{BillingConverter, BillingFigures};
pub use minimum::{TripDecision, TripWaiver, enforce_minimum, trip_charge};
pub use strategy::{AreaCost, Evaluation, PricingStrategy, evaluate_area, strategy_for};
