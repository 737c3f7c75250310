//! # Quote Session
//!
//! Single-writer owner of one quote form.
//!
//! The session holds the form state, the configuration it is priced against
//! and the change sink. Every edit goes through `&mut self`; aggregation is
//! re-run on demand by [`QuoteSession::quote`].
//!
//! # Configuration Refresh
//!
//! [`QuoteSession::apply_resolution`] swaps the configuration and refreshes
//! each area's rate snapshot. Enablement, quantities and rate overrides are
//! preserved. A fresh remote configuration also clears every custom amount.
//! Stale or foreign resolutions are ignored.
//!
//! # Change Tracking
//!
//! Edits of price-relevant numeric fields emit one [`ChangeRecord`] when the
//! value in effect actually changes. Records carry the quantity driving the
//! area's strategy and the frequency in effect.
//!
//! # Examples
//!
//! ```
//! use service_quote::application::services::QuoteSession;
//! use service_quote::domain::entities::{catalog, AreaField, EffectiveConfig};
//! use service_quote::domain::value_objects::{AreaKey, Money, PricingType};
//! use service_quote::infrastructure::change_sink::InMemoryChangeLog;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let schema = Arc::new(catalog::drain_service());
//! let config = Arc::new(EffectiveConfig::from_fallback(&schema));
//! let log = InMemoryChangeLog::new();
//! let mut session = QuoteSession::new(schema, config, Arc::new(log.clone()));
//!
//! let drain = AreaKey::new("standard_drain");
//! session.set_enabled(&drain, true).unwrap();
//! session.set_value(&drain, AreaField::Quantity, Decimal::from(8)).unwrap();
//!
//! assert_eq!(session.quote().per_visit_price, Money::dollars(200));
//! assert_eq!(log.len(), 1);
//! ```

use crate::application::error::{SessionError, SessionResult};
use crate::application::services::config_resolver::Resolution;
use crate::application::services::quote_aggregation::QuoteAggregator;
use crate::domain::entities::area_state::{AreaField, AreaState};
use crate::domain::entities::effective_config::EffectiveConfig;
use crate::domain::entities::quote::{BillingTerms, QuoteRequest, QuoteResult};
use crate::domain::entities::service_schema::ServiceSchema;
use crate::domain::events::ChangeRecord;
use crate::domain::value_objects::arithmetic::clamp_input;
use crate::domain::value_objects::{AreaKey, Frequency, PricingType};
use crate::infrastructure::change_sink::ChangeSink;
use rust_decimal::Decimal;
use std::sync::Arc;

/// One quote form being edited.
#[derive(Debug)]
pub struct QuoteSession {
    schema: Arc<ServiceSchema>,
    config: Arc<EffectiveConfig>,
    request: QuoteRequest,
    sink: Arc<dyn ChangeSink>,
    aggregator: QuoteAggregator,
    applied_generation: Option<u64>,
}

impl QuoteSession {
    /// Creates a session with the schema's default form.
    #[must_use]
    pub fn new(
        schema: Arc<ServiceSchema>,
        config: Arc<EffectiveConfig>,
        sink: Arc<dyn ChangeSink>,
    ) -> Self {
        let request = QuoteRequest::from_schema(&schema, &config);
        Self {
            schema,
            config,
            request,
            sink,
            aggregator: QuoteAggregator::new(),
            applied_generation: None,
        }
    }

    /// Creates a session from a resolution.
    #[must_use]
    pub fn from_resolution(resolution: &Resolution, sink: Arc<dyn ChangeSink>) -> Self {
        let mut session = Self::new(
            Arc::clone(resolution.schema()),
            Arc::clone(resolution.config()),
            sink,
        );
        session.applied_generation = Some(resolution.generation());
        session
    }

    /// Replaces the initial billing terms.
    #[must_use]
    pub fn with_terms(mut self, terms: BillingTerms) -> Self {
        *self.request.terms_mut() = terms;
        self
    }

    /// Replaces the aggregator.
    #[must_use]
    pub fn with_aggregator(mut self, aggregator: QuoteAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Returns the form state.
    #[inline]
    #[must_use]
    pub fn request(&self) -> &QuoteRequest {
        &self.request
    }

    /// Returns the configuration in use.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Returns the service schema.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &ServiceSchema {
        &self.schema
    }

    /// Returns true when pricing may be stale.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.config.tier().is_degraded()
    }

    /// Returns the generation of the last applied resolution.
    #[inline]
    #[must_use]
    pub fn applied_generation(&self) -> Option<u64> {
        self.applied_generation
    }

    /// Prices the form in its current state.
    #[must_use]
    pub fn quote(&self) -> QuoteResult {
        self.aggregator.aggregate(&self.request, &self.config)
    }

    /// Applies a newly resolved configuration.
    ///
    /// Returns false, leaving the session untouched, when the resolution is
    /// for another service, has been superseded, or is older than the one
    /// already applied.
    pub fn apply_resolution(&mut self, resolution: &Resolution) -> bool {
        if resolution.service_id() != self.request.service_id() {
            tracing::debug!(
                service_id = %self.request.service_id(),
                other = %resolution.service_id(),
                "ignoring resolution for another service"
            );
            return false;
        }
        let generation = resolution.generation();
        if !resolution.is_current() || self.applied_generation.is_some_and(|g| g >= generation) {
            tracing::debug!(
                service_id = %self.request.service_id(),
                generation,
                "ignoring stale resolution"
            );
            return false;
        }

        self.config = Arc::clone(resolution.config());
        let cleared = self
            .request
            .apply_config(&self.config, resolution.clears_custom_overrides());
        self.applied_generation = Some(generation);

        tracing::info!(
            service_id = %self.request.service_id(),
            tier = %self.config.tier(),
            generation,
            custom_amounts_cleared = cleared,
            "config applied to session"
        );
        true
    }

    fn area_mut(&mut self, key: &AreaKey) -> SessionResult<&mut AreaState> {
        self.request
            .area_mut(key)
            .ok_or_else(|| SessionError::unknown_area(key.clone()))
    }

    /// Enables or disables an area.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownArea` if the form has no such area.
    pub fn set_enabled(&mut self, key: &AreaKey, enabled: bool) -> SessionResult<()> {
        self.area_mut(key)?.set_enabled(enabled);
        Ok(())
    }

    /// Selects an area's pricing strategy.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownArea` if the form has no such area and
    /// `SessionError::UnsupportedStrategy` if the schema does not offer the
    /// strategy for it.
    pub fn set_pricing_type(&mut self, key: &AreaKey, pricing_type: PricingType) -> SessionResult<()> {
        if let Some(definition) = self.schema.area(key)
            && !definition.supports(pricing_type)
        {
            return Err(SessionError::unsupported_strategy(key.clone(), pricing_type));
        }
        self.area_mut(key)?.set_pricing_type(pricing_type);
        Ok(())
    }

    /// Sets a numeric field, recording the change when the value in effect
    /// differs. Returns the value now in effect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownArea` if the form has no such area.
    pub fn set_value(&mut self, key: &AreaKey, field: AreaField, value: Decimal) -> SessionResult<Decimal> {
        let service_id = self.request.service_id().clone();
        let frequency = self.request.terms().frequency;
        let area = self.area_mut(key)?;

        let original = area.value(field);
        let updated = area.set_value(field, value);
        if original == updated {
            return Ok(updated);
        }

        let record = ChangeRecord::for_area_field(service_id, key.clone(), field, original, updated)
            .with_quantity(area.driving_quantity())
            .with_frequency(frequency);
        self.sink.record(record);
        Ok(updated)
    }

    /// Sets a numeric field from raw user input; non-finite and negative
    /// values become zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownArea` if the form has no such area.
    pub fn set_input(&mut self, key: &AreaKey, field: AreaField, value: f64) -> SessionResult<Decimal> {
        self.set_value(key, field, clamp_input(value))
    }

    /// Selects or clears an area's preset variant.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownArea` if the form has no such area.
    pub fn set_variant(&mut self, key: &AreaKey, variant: Option<&str>) -> SessionResult<()> {
        let config = Arc::clone(&self.config);
        let area = self.area_mut(key)?;
        area.set_variant(variant);
        area.refresh_rates(&config);
        Ok(())
    }

    /// Selects or deselects a preset add-on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownArea` if the form has no such area.
    pub fn set_addon(&mut self, key: &AreaKey, addon: &str, selected: bool) -> SessionResult<()> {
        self.area_mut(key)?.set_addon(addon, selected);
        Ok(())
    }

    /// Sets the visit frequency.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.request.terms_mut().frequency = frequency;
    }

    /// Sets the contract length, recording the change. Zero restores the
    /// configured default. Returns the length now in effect.
    pub fn set_contract_months(&mut self, months: u32) -> u32 {
        let default = self.config.default_contract_months();
        let original = self.request.terms().contract_months_or(default);

        let terms = self.request.terms_mut();
        terms.contract_months = (months > 0).then_some(months);
        let updated = terms.contract_months_or(default);
        let frequency = terms.frequency;

        if original != updated {
            let record =
                ChangeRecord::for_contract_months(self.request.service_id().clone(), original, updated)
                    .with_frequency(frequency);
            self.sink.record(record);
        }
        updated
    }

    /// Marks the quote as all-inclusive.
    pub fn set_all_inclusive(&mut self, all_inclusive: bool) {
        self.request.set_all_inclusive(all_inclusive);
    }
}
